//! This crate provides a control-table access layer for the Feetech SCS series of serial bus servos.
//!
//! It exposes the control table as named logical registers (position, speed,
//! torque limits, compliance gains, temperature and voltage telemetry, the
//! EEPROM lock) and hides the per-register byte width, the wire byte-order
//! quirks of different firmware revisions, and the EEPROM lock handshake
//! behind a uniform read/write contract.
//!
//! Example servo models this should work with:
//! * SCS009
//! * SCS15
//! * SCS115
//! * SCS215
//! * SCS40
//!
//! The physical link is half-duplex TTL serial at 1 Mbaud by default (8 data
//! bits, 1 stop bit, no parity). Packet framing, checksums, timeouts and
//! retries are owned by the [`transport::Transport`] implementation; this
//! crate only issues register-level transactions against that seam, strictly
//! one at a time.
//!
//! A session wraps one transport for its whole lifetime: connecting unlocks
//! the EEPROM, closing disables actuation torque and always releases the
//! port. See [`session::ServoSession`].

pub mod error;
pub mod registers;
pub mod session;
pub mod transaction;
pub mod transport;

#[cfg(test)]
mod mock_transport;
