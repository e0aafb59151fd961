//! Width and byte-order aware dispatch of single register transactions.

use tracing::debug;

use crate::error::{Error, Result};
use crate::registers::{RegisterDescriptor, Width};
use crate::transport::Transport;

/// Wire byte order of 16-bit register values.
///
/// Firmware variants disagree on which byte of a 16-bit register travels
/// first. The setting applies to every two-byte register of a session
/// uniformly; single-byte registers have no byte order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Take 16-bit values as the transport composes them.
    #[default]
    Native,
    /// Swap the two bytes of every 16-bit value.
    Swapped,
}

impl ByteOrder {
    /// Apply the byte-order correction to a 16-bit value.
    ///
    /// Self-inverse: correcting twice returns the original value.
    pub fn correct(self, value: u16) -> u16 {
        match self {
            ByteOrder::Native => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }
}

/// Read one register.
///
/// The descriptor width selects the transport primitive; 16-bit payloads get
/// the byte-order correction after they arrive. The transaction either fully
/// succeeds or fails with one [`Error`] kind, there are no partial results.
pub fn read<T: Transport>(
    port: &mut T,
    id: u8,
    descriptor: &RegisterDescriptor,
    order: ByteOrder,
) -> Result<u16> {
    let (raw, comm, fault) = match descriptor.width {
        Width::One => {
            let reply = port.read_u8(id, descriptor.address);
            (u16::from(reply.value), reply.comm, reply.fault)
        }
        Width::Two => {
            let reply = port.read_u16(id, descriptor.address);
            (reply.value, reply.comm, reply.fault)
        }
    };
    // The link result wins over the fault byte: a fault code from a failed
    // exchange is garbage and must not be surfaced.
    if !comm.is_success() {
        return Err(Error::Transport(comm));
    }
    if fault != 0 {
        return Err(Error::Device(fault));
    }
    let value = match descriptor.width {
        Width::One => raw,
        Width::Two => order.correct(raw),
    };
    debug!(
        register = descriptor.register.name(),
        address = descriptor.address,
        value,
        "read"
    );
    Ok(value)
}

/// Write one register.
///
/// 16-bit values get the byte-order correction before they reach the
/// transport. A value that does not fit a single-byte register is rejected
/// without any transport call.
pub fn write<T: Transport>(
    port: &mut T,
    id: u8,
    descriptor: &RegisterDescriptor,
    value: u16,
    order: ByteOrder,
) -> Result<()> {
    let reply = match descriptor.width {
        Width::One => {
            let byte = u8::try_from(value).map_err(|_| Error::ValueOutOfRange {
                register: descriptor.register.name(),
                value,
            })?;
            port.write_u8(id, descriptor.address, byte)
        }
        Width::Two => port.write_u16(id, descriptor.address, order.correct(value)),
    };
    if !reply.comm.is_success() {
        return Err(Error::Transport(reply.comm));
    }
    if reply.fault != 0 {
        return Err(Error::Device(reply.fault));
    }
    debug!(
        register = descriptor.register.name(),
        address = descriptor.address,
        value,
        "write"
    );
    Ok(())
}
