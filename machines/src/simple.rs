//! Flat-RAM development board: 64KB of RAM in each mode, no devices.
//!
//! This is the harness machine for instruction-level tests; programs are
//! loaded straight into RAM and run one cycle at a time.

use gbx_core::core::{CoreError, MemoryError};
use gbx_core::cpu::{RegisterBank, Z80X};
use gbx_core::memory::{AddressRange, MemoryController, Mode, Ram, RangeType};

use crate::registry::MachineEntry;
use crate::System;

const ADDRESS_SPACE_SIZE: usize = 0x10000;

pub struct SimpleGbxSystem {
    cpu: Z80X,
    memory: MemoryController,
}

impl SimpleGbxSystem {
    pub fn new() -> Result<Self, MemoryError> {
        let mut memory = MemoryController::new();
        let full_range = AddressRange::new(0x0000, 0xFFFF, RangeType::AllInclusive);

        memory.register_resource(
            Box::new(Ram::new(ADDRESS_SPACE_SIZE)),
            full_range,
            Mode::System,
        )?;
        memory.register_resource(
            Box::new(Ram::new(ADDRESS_SPACE_SIZE)),
            full_range,
            Mode::User,
        )?;

        Ok(Self {
            cpu: Z80X::new(),
            memory,
        })
    }

    /// Load a program block at `address` into the active mode's RAM.
    pub fn load_program(&mut self, address: usize, data: &[u8]) -> Result<(), MemoryError> {
        self.memory.load(data, address, Some(address))
    }

    pub fn cpu(&self) -> &Z80X {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Z80X {
        &mut self.cpu
    }
}

impl System for SimpleGbxSystem {
    fn run_cycle(&mut self) -> Result<(), CoreError> {
        self.cpu.run_cycle(&mut self.memory)
    }

    fn registers(&self) -> &RegisterBank {
        self.cpu.registers()
    }

    fn registers_mut(&mut self) -> &mut RegisterBank {
        self.cpu.registers_mut()
    }

    fn memory(&self) -> &MemoryController {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut MemoryController {
        &mut self.memory
    }
}

fn create() -> Result<Box<dyn System>, CoreError> {
    Ok(Box::new(SimpleGbxSystem::new()?))
}

inventory::submit! {
    MachineEntry::new("simple", "Flat-RAM development board", create)
}
