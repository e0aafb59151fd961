//! This module defines the control table of the SCS series servos.
//!
//! Every register has a symbolic name, a physical address and a wire width
//! of one or two bytes. Width resolution is two-stage: an explicit per-name
//! override table is consulted first, then an address classifier. The two
//! stages must stay separate, see `resolve_width`.

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Addresses that carry a single byte on the wire. Every other address in
/// the control table is the low byte of a 16-bit pair.
const SINGLE_BYTE_ADDRESSES: &[u8] = &[
    3, 4, 5, 6, 7, 8, 13, 14, 15, 19, 20, 21, 22, 23, 31, 35, 36, 40, 41, 48, 62, 63, 64, 66,
];

/// All control-table registers of the SCS series servos.
///
/// The discriminant is the physical address of the register (for two-byte
/// registers, the address of the low byte). The snake_case form of each
/// variant name is the stable name set presented to callers, e.g.
/// `"goal_position"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ServoRegister {
    /// __R__ - Firmware version number.
    FirmwareVersion = 3,
    /// __R/W__ - Servo ID on the bus.
    ///
    /// `0xFE` is reserved as the broadcast ID.
    Id = 5,
    /// __R/W__ - Baud rate code.
    ///
    /// `0` is the factory default of 1 Mbaud; higher codes select slower
    /// rates.
    BaudRate = 6,
    /// __R/W__ - Delay between receiving an instruction and answering, in
    /// units of 2 us.
    ReturnDelayTime = 7,
    /// __R/W__ - Which instructions get a status packet in reply.
    ReturnLevel = 8,
    /// __R/W__ - Clockwise angle limit in position units.
    MinAngleLimit = 9,
    /// __R/W__ - Counter-clockwise angle limit in position units.
    MaxAngleLimit = 11,
    /// __R/W__ - Shutdown temperature threshold in degrees Celsius.
    TemperatureLimit = 13,
    /// __R/W__ - Upper supply voltage limit in deci-volts.
    MaxVoltageLimit = 14,
    /// __R/W__ - Lower supply voltage limit in deci-volts.
    MinVoltageLimit = 15,
    /// __R/W__ - Torque ceiling as a fraction of the stall torque.
    MaxTorque = 16,
    /// __R/W__ - Fault conditions that light the alarm LED.
    AlarmLed = 19,
    /// __R/W__ - Fault conditions that shut torque off.
    AlarmShutdown = 20,
    /// __R/W__ - Compliance proportional gain.
    ComplianceP = 21,
    /// __R/W__ - Compliance derivative gain.
    ComplianceD = 22,
    /// __R/W__ - Compliance integral gain.
    ComplianceI = 23,
    /// __R/W__ - Minimum drive applied once inside the compliance margin.
    Punch = 24,
    /// __R/W__ - Clockwise dead zone.
    ///
    /// Single byte despite the address falling in the two-byte range; this
    /// is one of the two name-keyed width overrides.
    CwDeadZone = 26,
    /// __R/W__ - Counter-clockwise dead zone.
    ///
    /// Single byte despite the address falling in the two-byte range; this
    /// is one of the two name-keyed width overrides.
    CcwDeadZone = 27,
    /// __R/W__ - Protection current threshold.
    ProtectCurrent = 28,
    /// __R/W__ - Over-current protection time.
    OvercurrentProtection = 31,
    /// __R/W__ - Overload current threshold.
    OverloadCurrent = 32,
    /// __R/W__ - Continuous-rotation (wheel) mode switch.
    RotationRun = 35,
    /// __R/W__ - Angle mode selector.
    AngleMode = 36,
    /// __R/W__ - Torque output switch.
    ///
    /// * `0` - Torque off, the horn turns freely.
    /// * `1` - Torque on.
    TorqueEnable = 40,
    /// __R/W__ - LED switch.
    Led = 41,
    /// __R/W__ - Target position in position units.
    GoalPosition = 42,
    /// __R/W__ - Time budget for reaching the goal position.
    GoalTime = 44,
    /// __R/W__ - Target speed.
    GoalSpeed = 46,
    /// __R/W__ - EEPROM write protection.
    ///
    /// * `0` - Unlocked, EEPROM registers are writable.
    /// * `1` - Locked.
    EepromLock = 48,
    /// __R__ - Measured position in position units.
    PresentPosition = 56,
    /// __R__ - Measured speed.
    PresentSpeed = 58,
    /// __R__ - Measured load.
    PresentLoad = 60,
    /// __R__ - Measured supply voltage in deci-volts.
    PresentVoltage = 62,
    /// __R__ - Measured temperature in degrees Celsius.
    PresentTemperature = 63,
    /// __R__ - Whether a registered instruction is pending.
    RegisteredInstruction = 64,
    /// __R__ - Whether the servo is moving towards a goal.
    Moving = 66,
}

impl From<ServoRegister> for u8 {
    fn from(value: ServoRegister) -> Self {
        value as u8
    }
}

/// Wire width of one register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Width {
    /// One byte. Byte order is undefined for these.
    One,
    /// Two bytes, low byte at the register address.
    Two,
}

/// Access class of one register.
///
/// Informational only: telemetry registers reject writes in firmware, this
/// layer does not enforce the distinction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// One resolved catalog entry: name, address, width and access class.
///
/// Descriptors are value types derived from static data; width and access
/// never change at runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub register: ServoRegister,
    pub address: u8,
    pub width: Width,
    pub access: Access,
}

impl ServoRegister {
    /// The snake_case control-table name of this register.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The physical address of this register.
    pub fn address(self) -> u8 {
        self as u8
    }

    /// The wire width of this register, override table already applied.
    pub fn width(self) -> Width {
        resolve_width(width_override(self), self.address())
    }

    /// The access class of this register.
    pub fn access(self) -> Access {
        match self {
            Self::FirmwareVersion
            | Self::PresentPosition
            | Self::PresentSpeed
            | Self::PresentLoad
            | Self::PresentVoltage
            | Self::PresentTemperature
            | Self::RegisteredInstruction
            | Self::Moving => Access::ReadOnly,
            _ => Access::ReadWrite,
        }
    }

    /// The fully resolved catalog entry for this register.
    pub fn descriptor(self) -> RegisterDescriptor {
        RegisterDescriptor {
            register: self,
            address: self.address(),
            width: self.width(),
            access: self.access(),
        }
    }
}

/// Look a register up by its control-table name.
///
/// Pure catalog access: an unknown name is rejected here and never reaches
/// the transport.
pub fn lookup(name: &str) -> Result<RegisterDescriptor> {
    name.parse::<ServoRegister>()
        .map(ServoRegister::descriptor)
        .map_err(|_| Error::UnknownRegister(name.to_owned()))
}

/// Per-name width overrides.
///
/// The dead-zone registers are single-byte even though their addresses fall
/// outside [`SINGLE_BYTE_ADDRESSES`].
fn width_override(register: ServoRegister) -> Option<Width> {
    match register {
        ServoRegister::CwDeadZone | ServoRegister::CcwDeadZone => Some(Width::One),
        _ => None,
    }
}

/// Two-stage width resolution: the name-keyed override wins, the address
/// classifier is only the fallback.
///
/// The override must be checked first. A future catalog revision may assign
/// an overridden name to an address the classifier also knows about, and the
/// classifier must not win that disagreement.
fn resolve_width(name_override: Option<Width>, address: u8) -> Width {
    if let Some(width) = name_override {
        return width;
    }
    if SINGLE_BYTE_ADDRESSES.contains(&address) {
        Width::One
    } else {
        Width::Two
    }
}
