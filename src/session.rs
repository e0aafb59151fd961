//! Session lifecycle: connect, register operations, teardown.

use strum::IntoEnumIterator;
use tracing::warn;

use crate::error::{Error, Result};
use crate::registers::{self, ServoRegister};
use crate::transaction::{self, ByteOrder};
use crate::transport::Transport;

/// Value written to the EEPROM lock register to open it for writes.
const EEPROM_UNLOCKED: u16 = 0;
/// Value written to the torque-enable register on teardown.
const TORQUE_DISABLED: u16 = 0;

/// Connection settings for one servo session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Servo addressed by subsequent operations. Can be changed later with
    /// [`ServoSession::set_servo_id`].
    pub servo_id: u8,
    /// Bus baud rate negotiated on connect.
    pub baud_rate: u32,
    /// Byte-order correction applied to every two-byte register.
    pub byte_order: ByteOrder,
}

impl Default for SessionConfig {
    /// Factory defaults of the SCS series: servo 1 at 1 Mbaud, no swap.
    fn default() -> Self {
        Self {
            servo_id: 1,
            baud_rate: 1_000_000,
            byte_order: ByteOrder::Native,
        }
    }
}

/// One exclusive, strictly sequential session with the servo bus.
///
/// The session owns its transport for its whole lifetime and issues at most
/// one transaction at a time. Closing the session disables actuation torque
/// (best effort) and releases the port; the release happens on every exit
/// path, including drops, and exactly once.
#[derive(Debug)]
pub struct ServoSession<T: Transport> {
    port: T,
    servo_id: u8,
    byte_order: ByteOrder,
    unlocked: bool,
    released: bool,
}

impl<T: Transport> ServoSession<T> {
    /// Open the port, negotiate the baud rate and unlock the EEPROM.
    ///
    /// Port-open and baud-rate failures are fatal: no session is returned,
    /// and a port that opened before the baud rate failed is closed again.
    /// A failed unlock write is logged and the session is still returned,
    /// since SRAM registers stay writable; [`Self::unlock`] can retry.
    pub fn connect(mut port: T, config: SessionConfig) -> Result<Self> {
        if !port.open() {
            return Err(Error::PortOpen);
        }
        if !port.set_baud_rate(config.baud_rate) {
            port.close();
            return Err(Error::BaudRate);
        }
        let mut session = Self {
            port,
            servo_id: config.servo_id,
            byte_order: config.byte_order,
            unlocked: false,
            released: false,
        };
        if let Err(err) = session.unlock() {
            warn!(servo_id = session.servo_id, "EEPROM unlock failed, continuing locked: {err}");
        }
        Ok(session)
    }

    /// Write the unlock value to the EEPROM lock register.
    pub fn unlock(&mut self) -> Result<()> {
        self.write(ServoRegister::EepromLock, EEPROM_UNLOCKED)?;
        self.unlocked = true;
        Ok(())
    }

    /// Whether an EEPROM unlock write has succeeded in this session.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Read one register from the current servo.
    pub fn read(&mut self, register: ServoRegister) -> Result<u16> {
        transaction::read(
            &mut self.port,
            self.servo_id,
            &register.descriptor(),
            self.byte_order,
        )
    }

    /// Write one register on the current servo.
    pub fn write(&mut self, register: ServoRegister, value: u16) -> Result<()> {
        transaction::write(
            &mut self.port,
            self.servo_id,
            &register.descriptor(),
            value,
            self.byte_order,
        )
    }

    /// Read a register by its control-table name.
    pub fn read_named(&mut self, name: &str) -> Result<u16> {
        let descriptor = registers::lookup(name)?;
        transaction::read(&mut self.port, self.servo_id, &descriptor, self.byte_order)
    }

    /// Write a register by its control-table name.
    pub fn write_named(&mut self, name: &str, value: u16) -> Result<()> {
        let descriptor = registers::lookup(name)?;
        transaction::write(
            &mut self.port,
            self.servo_id,
            &descriptor,
            value,
            self.byte_order,
        )
    }

    /// Sweep the whole control table, one transaction per register.
    ///
    /// Failures are reported per register so a partially responsive servo
    /// still yields the readable part of the table.
    pub fn read_all(&mut self) -> Vec<(ServoRegister, Result<u16>)> {
        ServoRegister::iter()
            .map(|register| (register, self.read(register)))
            .collect()
    }

    /// The servo addressed by subsequent operations.
    pub fn servo_id(&self) -> u8 {
        self.servo_id
    }

    /// Address a different servo on the same bus.
    pub fn set_servo_id(&mut self, servo_id: u8) {
        self.servo_id = servo_id;
    }

    /// The byte-order correction currently applied to two-byte registers.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Change the byte-order correction.
    ///
    /// Takes effect immediately for every subsequent two-byte transaction.
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Disable torque (best effort) and release the port.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.write(ServoRegister::TorqueEnable, TORQUE_DISABLED) {
            warn!(servo_id = self.servo_id, "torque disable on close failed: {err}");
        }
        self.port.close();
    }
}

impl<T: Transport> Drop for ServoSession<T> {
    fn drop(&mut self) {
        self.release();
    }
}
