//! Interactive control-table editor for a servo bus on a USB serial adapter.
//!
//! Everything the library treats as external lives here: the menu loop and
//! an SCS protocol 1.0 transport over `serialport`. Instruction packets are
//! `FF FF id len inst params.. checksum`, status packets are
//! `FF FF id len error params.. checksum`, checksum is the inverted byte sum
//! over everything after the header.
//!
//! Run with the device path as the first argument:
//! `cargo run --example table-editor -- /dev/ttyUSB0`

use std::io::{Read, Write};
use std::time::Duration;

use inquire::{Select, Text};
use strum::IntoEnumIterator;

use feetech_scs::error::Error;
use feetech_scs::registers::ServoRegister;
use feetech_scs::session::{ServoSession, SessionConfig};
use feetech_scs::transaction::ByteOrder;
use feetech_scs::transport::{
    BROADCAST_ID, CommStatus, FaultFlags, ReadReply, Transport, WriteReply,
};

const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";
// The servos answer within a few ms; the adapter can add more.
const SERIAL_TIMEOUT_MS: u64 = 300;

const HEADER: [u8; 2] = [0xFF, 0xFF];
const INST_READ: u8 = 2;
const INST_WRITE: u8 = 3;

fn checksum(bytes: &[u8]) -> u8 {
    let sum: u32 = bytes.iter().map(|&b| u32::from(b)).sum();
    !(sum as u8)
}

/// SCS 1.0 half-duplex transport over a `serialport` handle.
struct ScsSerialPort {
    path: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl ScsSerialPort {
    fn new(path: String) -> Self {
        Self { path, port: None }
    }

    /// One request/response exchange. `reply_len` is the expected parameter
    /// count of the status packet.
    fn transact(
        &mut self,
        id: u8,
        instruction: u8,
        params: &[u8],
        reply_len: usize,
    ) -> Result<(u8, Vec<u8>), CommStatus> {
        let Some(port) = self.port.as_mut() else {
            return Err(CommStatus::PortBusy);
        };

        let mut frame = Vec::with_capacity(6 + params.len());
        frame.extend_from_slice(&HEADER);
        frame.push(id);
        frame.push(params.len() as u8 + 2);
        frame.push(instruction);
        frame.extend_from_slice(params);
        frame.push(checksum(&frame[2..]));

        port.clear(serialport::ClearBuffer::Input).ok();
        if port.write_all(&frame).is_err() {
            return Err(CommStatus::TxFail);
        }
        if id == BROADCAST_ID {
            // Broadcast exchanges produce no status packet.
            return Ok((0, Vec::new()));
        }

        let mut head = [0u8; 4];
        if port.read_exact(&mut head).is_err() {
            return Err(CommStatus::RxTimeout);
        }
        if head[0..2] != HEADER || head[2] != id {
            return Err(CommStatus::RxCorrupt);
        }
        let len = head[3] as usize;
        if len != reply_len + 2 {
            return Err(CommStatus::RxCorrupt);
        }
        let mut rest = vec![0u8; len];
        if port.read_exact(&mut rest).is_err() {
            return Err(CommStatus::RxTimeout);
        }
        let (body, check) = rest.split_at(len - 1);
        let mut summed = vec![head[2], head[3]];
        summed.extend_from_slice(body);
        if checksum(&summed) != check[0] {
            return Err(CommStatus::RxCorrupt);
        }
        Ok((body[0], body[1..].to_vec()))
    }
}

impl Transport for ScsSerialPort {
    fn open(&mut self) -> bool {
        match serialport::new(self.path.as_str(), 1_000_000)
            .timeout(Duration::from_millis(SERIAL_TIMEOUT_MS))
            .open()
        {
            Ok(port) => {
                self.port = Some(port);
                true
            }
            Err(err) => {
                eprintln!("failed to open {}: {err}", self.path);
                false
            }
        }
    }

    fn set_baud_rate(&mut self, baud: u32) -> bool {
        match self.port.as_mut() {
            Some(port) => port.set_baud_rate(baud).is_ok(),
            None => false,
        }
    }

    fn read_u8(&mut self, id: u8, address: u8) -> ReadReply<u8> {
        match self.transact(id, INST_READ, &[address, 1], 1) {
            Ok((fault, params)) => ReadReply {
                value: params.first().copied().unwrap_or(0),
                comm: CommStatus::Success,
                fault,
            },
            Err(comm) => ReadReply {
                value: 0,
                comm,
                fault: 0,
            },
        }
    }

    fn read_u16(&mut self, id: u8, address: u8) -> ReadReply<u16> {
        match self.transact(id, INST_READ, &[address, 2], 2) {
            Ok((fault, params)) => {
                // Low byte first. Firmware that answers high byte first is
                // what the byte-order toggle in the session is for.
                let value = u16::from(params[0]) | (u16::from(params[1]) << 8);
                ReadReply {
                    value,
                    comm: CommStatus::Success,
                    fault,
                }
            }
            Err(comm) => ReadReply {
                value: 0,
                comm,
                fault: 0,
            },
        }
    }

    fn write_u8(&mut self, id: u8, address: u8, value: u8) -> WriteReply {
        match self.transact(id, INST_WRITE, &[address, value], 0) {
            Ok((fault, _)) => WriteReply {
                comm: CommStatus::Success,
                fault,
            },
            Err(comm) => WriteReply { comm, fault: 0 },
        }
    }

    fn write_u16(&mut self, id: u8, address: u8, value: u16) -> WriteReply {
        let params = [address, value as u8, (value >> 8) as u8];
        match self.transact(id, INST_WRITE, &params, 0) {
            Ok((fault, _)) => WriteReply {
                comm: CommStatus::Success,
                fault,
            },
            Err(comm) => WriteReply { comm, fault: 0 },
        }
    }

    fn close(&mut self) {
        self.port = None;
    }
}

fn describe_failure(err: &Error) -> String {
    if let Error::Device(code) = err {
        let flags = FaultFlags::from_code(*code);
        let mut names = Vec::new();
        if flags.input_voltage() {
            names.push("input voltage");
        }
        if flags.angle_limit() {
            names.push("angle limit");
        }
        if flags.overheat() {
            names.push("overheat");
        }
        if flags.overcurrent() {
            names.push("overcurrent");
        }
        if flags.overload() {
            names.push("overload");
        }
        if !names.is_empty() {
            return format!("{err} [{}]", names.join(", "));
        }
    }
    err.to_string()
}

fn prompt_register() -> Result<ServoRegister, inquire::InquireError> {
    let names: Vec<&str> = ServoRegister::iter().map(ServoRegister::name).collect();
    let name = Select::new("Register:", names).prompt()?;
    Ok(name.parse().expect("menu only offers catalog names"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DEVICE.to_string());
    let mut session = ServoSession::connect(ScsSerialPort::new(path), SessionConfig::default())?;
    if !session.is_unlocked() {
        println!("warning: EEPROM is still locked, persistent registers may reject writes");
    }

    loop {
        let swap = match session.byte_order() {
            ByteOrder::Native => "off",
            ByteOrder::Swapped => "on",
        };
        let choice = Select::new(
            &format!("Servo {} (byte swap {swap}):", session.servo_id()),
            vec![
                "Read all registers",
                "Read register",
                "Write register",
                "Change servo ID",
                "Toggle byte swap",
                "Quit",
            ],
        )
        .prompt()?;

        match choice {
            "Read all registers" => {
                for (register, result) in session.read_all() {
                    match result {
                        Ok(value) => {
                            println!(
                                "{:>24} (addr {:>2}): {value}",
                                register.name(),
                                register.address()
                            );
                        }
                        Err(err) => {
                            println!(
                                "{:>24} (addr {:>2}): {}",
                                register.name(),
                                register.address(),
                                describe_failure(&err)
                            );
                        }
                    }
                }
            }
            "Read register" => {
                let register = prompt_register()?;
                match session.read(register) {
                    Ok(value) => println!("{} = {value}", register.name()),
                    Err(err) => println!("read failed: {}", describe_failure(&err)),
                }
            }
            "Write register" => {
                let register = prompt_register()?;
                let input = Text::new("New value:").prompt()?;
                let Ok(value) = input.trim().parse::<u16>() else {
                    println!("not a number: {input}");
                    continue;
                };
                match session.write(register, value) {
                    Ok(()) => match session.read(register) {
                        Ok(now) => println!("write ok, {} = {now}", register.name()),
                        Err(err) => println!("write ok, read-back failed: {}", describe_failure(&err)),
                    },
                    Err(err) => println!("write failed: {}", describe_failure(&err)),
                }
            }
            "Change servo ID" => {
                let input = Text::new("Servo ID (0-255):").prompt()?;
                match input.trim().parse::<u8>() {
                    Ok(id) => session.set_servo_id(id),
                    Err(_) => println!("ID must be between 0 and 255"),
                }
            }
            "Toggle byte swap" => {
                let next = match session.byte_order() {
                    ByteOrder::Native => ByteOrder::Swapped,
                    ByteOrder::Swapped => ByteOrder::Native,
                };
                session.set_byte_order(next);
            }
            _ => break,
        }
    }

    session.close();
    Ok(())
}
