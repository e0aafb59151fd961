//! We use this mocking module in unit tests to emulate the transport port.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::transport::{CommStatus, ReadReply, Transport, WriteReply};

/// Scripted register-level transport.
///
/// Values land in a flat backing store exactly as the transport receives
/// them, so the store doubles as the simulated wire: a byte-order test can
/// assert what actually crossed it. Link failures and fault bytes are
/// injected per address. The close counter and wire log are shared handles
/// so tests can keep observing them after the mock moves into a session.
#[derive(Debug)]
pub struct MockTransport {
    /// Backing store keyed by (servo id, address), in wire order.
    store: HashMap<(u8, u8), u16>,
    /// Comm status reported for operations touching these addresses.
    comm_failures: HashMap<u8, CommStatus>,
    /// Fault byte reported for operations touching these addresses.
    faults: HashMap<u8, u8>,
    pub reads: usize,
    pub writes: usize,
    pub open_calls: usize,
    pub open_result: bool,
    pub baud_result: bool,
    /// Baud rate passed to the last `set_baud_rate` call.
    pub baud_rate: Option<u32>,
    pub close_count: Rc<Cell<usize>>,
    /// Every write that reached the wire, as (id, address, value).
    pub wire_log: Rc<RefCell<Vec<(u8, u8, u16)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            comm_failures: HashMap::new(),
            faults: HashMap::new(),
            reads: 0,
            writes: 0,
            open_calls: 0,
            open_result: true,
            baud_result: true,
            baud_rate: None,
            close_count: Rc::new(Cell::new(0)),
            wire_log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Seed the backing store with a wire-order value.
    pub fn preload(&mut self, id: u8, address: u8, value: u16) {
        self.store.insert((id, address), value);
    }

    /// The wire-order value currently stored at (id, address).
    pub fn wire_value(&self, id: u8, address: u8) -> Option<u16> {
        self.store.get(&(id, address)).copied()
    }

    /// Report `comm` for every operation touching `address`.
    pub fn fail_address(&mut self, address: u8, comm: CommStatus) {
        self.comm_failures.insert(address, comm);
    }

    /// Report `fault` for every operation touching `address`.
    pub fn fault_address(&mut self, address: u8, fault: u8) {
        self.faults.insert(address, fault);
    }

    /// Drop all injected comm failures and fault bytes.
    pub fn clear_failures(&mut self) {
        self.comm_failures.clear();
        self.faults.clear();
    }

    /// Total count of read and write exchanges issued against this mock.
    pub fn transaction_count(&self) -> usize {
        self.reads + self.writes
    }

    fn comm_for(&self, address: u8) -> CommStatus {
        self.comm_failures
            .get(&address)
            .copied()
            .unwrap_or(CommStatus::Success)
    }

    fn fault_for(&self, address: u8) -> u8 {
        self.faults.get(&address).copied().unwrap_or(0)
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> bool {
        self.open_calls += 1;
        self.open_result
    }

    fn set_baud_rate(&mut self, baud: u32) -> bool {
        self.baud_rate = Some(baud);
        self.baud_result
    }

    fn read_u8(&mut self, id: u8, address: u8) -> ReadReply<u8> {
        self.reads += 1;
        ReadReply {
            value: self.store.get(&(id, address)).copied().unwrap_or(0) as u8,
            comm: self.comm_for(address),
            fault: self.fault_for(address),
        }
    }

    fn read_u16(&mut self, id: u8, address: u8) -> ReadReply<u16> {
        self.reads += 1;
        ReadReply {
            value: self.store.get(&(id, address)).copied().unwrap_or(0),
            comm: self.comm_for(address),
            fault: self.fault_for(address),
        }
    }

    fn write_u8(&mut self, id: u8, address: u8, value: u8) -> WriteReply {
        self.writes += 1;
        let comm = self.comm_for(address);
        if comm.is_success() {
            self.store.insert((id, address), u16::from(value));
            self.wire_log.borrow_mut().push((id, address, u16::from(value)));
        }
        WriteReply {
            comm,
            fault: self.fault_for(address),
        }
    }

    fn write_u16(&mut self, id: u8, address: u8, value: u16) -> WriteReply {
        self.writes += 1;
        let comm = self.comm_for(address);
        if comm.is_success() {
            self.store.insert((id, address), value);
            self.wire_log.borrow_mut().push((id, address, value));
        }
        WriteReply {
            comm,
            fault: self.fault_for(address),
        }
    }

    fn close(&mut self) {
        self.close_count.set(self.close_count.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_round_trips_per_id_and_address() {
        let mut mock = MockTransport::new();
        mock.write_u16(1, 42, 0x1234);
        mock.write_u8(2, 42, 7);

        assert_eq!(mock.read_u16(1, 42).value, 0x1234);
        assert_eq!(mock.read_u8(2, 42).value, 7);
        assert_eq!(mock.read_u16(3, 42).value, 0);
        assert_eq!(mock.transaction_count(), 5);
    }

    #[test]
    fn injected_failures_are_scoped_to_their_address() {
        let mut mock = MockTransport::new();
        mock.fail_address(42, CommStatus::RxTimeout);
        mock.fault_address(56, 0x20);

        assert_eq!(mock.read_u16(1, 42).comm, CommStatus::RxTimeout);
        assert_eq!(mock.read_u16(1, 56).comm, CommStatus::Success);
        assert_eq!(mock.read_u16(1, 56).fault, 0x20);
        assert_eq!(mock.read_u16(1, 44).comm, CommStatus::Success);
        assert_eq!(mock.read_u16(1, 44).fault, 0);
    }

    #[test]
    fn failed_writes_do_not_reach_the_wire() {
        let mut mock = MockTransport::new();
        mock.preload(1, 42, 100);
        mock.fail_address(42, CommStatus::TxFail);

        mock.write_u16(1, 42, 200);
        assert_eq!(mock.wire_value(1, 42), Some(100));
        assert!(mock.wire_log.borrow().is_empty());
    }

    #[test]
    fn close_counter_is_shared() {
        let mut mock = MockTransport::new();
        let closes = mock.close_count.clone();
        mock.close();
        mock.close();
        assert_eq!(closes.get(), 2);
    }
}
