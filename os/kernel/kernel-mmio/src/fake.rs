//! In-memory register file.
//!
//! Stands in for a real board in tests and host-side emulation. Registers
//! that were never loaded read back as the open-bus value (`0xFF` by
//! default, like an undriven ISA data bus). Every access is recorded.

use crate::{BusError, IoAddress, RegisterIo};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::cell::RefCell;

/// One recorded bus cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Read(IoAddress, u8),
    Write(IoAddress, u8),
}

#[derive(Debug)]
struct State {
    registers: BTreeMap<IoAddress, u8>,
    faults: BTreeSet<IoAddress>,
    log: Vec<Access>,
    open_bus: u8,
}

/// [`RegisterIo`] backed by a sparse in-memory register map.
#[derive(Debug)]
pub struct FakeBus {
    state: RefCell<State>,
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBus {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_open_bus(0xFF)
    }

    /// A bus whose unpopulated addresses read back as `open_bus`.
    #[must_use]
    pub const fn with_open_bus(open_bus: u8) -> Self {
        Self {
            state: RefCell::new(State {
                registers: BTreeMap::new(),
                faults: BTreeSet::new(),
                log: Vec::new(),
                open_bus,
            }),
        }
    }

    /// Set the register at `address` without recording an access.
    pub fn poke(&self, address: IoAddress, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Set consecutive registers starting at `base`.
    pub fn load(&self, base: IoAddress, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (offset, value) in (0u32..).zip(values) {
            state.registers.insert(base + offset, *value);
        }
    }

    /// Current register value without recording an access.
    #[must_use]
    pub fn peek(&self, address: IoAddress) -> u8 {
        let state = self.state.borrow();
        state.registers.get(&address).copied().unwrap_or(state.open_bus)
    }

    /// Make every subsequent access to `address` fail.
    pub fn inject_fault(&self, address: IoAddress) {
        self.state.borrow_mut().faults.insert(address);
    }

    pub fn clear_fault(&self, address: IoAddress) {
        self.state.borrow_mut().faults.remove(&address);
    }

    /// All completed accesses, oldest first.
    #[must_use]
    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().log.clone()
    }

    pub fn clear_accesses(&self) {
        self.state.borrow_mut().log.clear();
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|a| matches!(a, Access::Read(..)))
            .count()
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|a| matches!(a, Access::Write(..)))
            .count()
    }
}

impl RegisterIo for FakeBus {
    fn read_register(&self, address: IoAddress) -> Result<u8, BusError> {
        let mut state = self.state.borrow_mut();
        if state.faults.contains(&address) {
            return Err(BusError::Fault { address });
        }
        let value = state.registers.get(&address).copied().unwrap_or(state.open_bus);
        state.log.push(Access::Read(address, value));
        Ok(value)
    }

    fn write_register(&self, address: IoAddress, value: u8) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        if state.faults.contains(&address) {
            return Err(BusError::Fault { address });
        }
        state.registers.insert(address, value);
        state.log.push(Access::Write(address, value));
        Ok(())
    }
}
