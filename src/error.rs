//! Our error types for servo control-table operations.

use thiserror::Error;

use crate::transport::CommStatus;

pub type Result<T> = core::result::Result<T, Error>;

/// Failure of a single control-table operation.
///
/// Link failures and device-reported faults are separate variants: a
/// [`Error::Transport`] means the exchange itself never completed, while a
/// [`Error::Device`] means the servo answered and flagged a fault of its own.
#[derive(Error, Debug)]
pub enum Error {
    /// The name is not part of the control table. Returned before any
    /// transport call is made.
    #[error("unknown register `{0}`")]
    UnknownRegister(String),
    /// The link failed. The device fault byte carries no meaning in this
    /// case and is discarded.
    #[error("transport failure: {0}")]
    Transport(CommStatus),
    /// The device acknowledged the request but reported a fault. The raw
    /// code is preserved as received; see
    /// [`FaultFlags`](crate::transport::FaultFlags) for a decoded view.
    #[error("device fault (code {0:#04x})")]
    Device(u8),
    /// The value does not fit the register width. Rejected before any
    /// transport call is made.
    #[error("value {value} does not fit single-byte register `{register}`")]
    ValueOutOfRange {
        register: &'static str,
        value: u16,
    },
    /// The port could not be opened. Fatal to session creation.
    #[error("failed to open the port")]
    PortOpen,
    /// Baud-rate negotiation failed. Fatal to session creation.
    #[error("failed to set the baud rate")]
    BaudRate,
}
