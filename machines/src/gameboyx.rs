//! The GameBoyX machine: DMG memory map in User mode plus a privileged
//! kernel region in System mode.
//!
//! The machine boots in System mode executing kernel code; a `jpu` in the
//! kernel drops the memory controller to User mode and enters the
//! cartridge. `ldu` instructions let kernel code inspect user memory
//! without leaving System mode.

use log::debug;

use gbx_core::core::{CoreError, MemoryError};
use gbx_core::cpu::{RegisterBank, Z80X};
use gbx_core::memory::{
    AddressRange, BankedRom, MemoryController, Mode, Ram, RangeType, Rom,
};

use crate::registry::MachineEntry;
use crate::System;

// GB & GBC default ROM bank size of 16KB.
pub const DEFAULT_ROM_BANK_SIZE: usize = 0x4000;
// Kernel boot code + cartridge fixed bank.
pub const FIXED_BANK_ROM_SIZE: usize = 0x8000;
// MBC1-style switchable region: 48KB image, 16KB visible.
pub const DYNAMIC_BANK_ROM_SIZE: usize = 0xC000;

pub const USER_FIXED_ROM_INITIAL_ADDRESS: usize = 0x0000;
pub const USER_FIXED_ROM_SIZE: usize = 0x4000;
pub const USER_BANKED_ROM_INITIAL_ADDRESS: usize = 0x4000;
pub const USER_BANKED_ROM_SIZE: usize = 0x4000;
pub const VIDEO_RAM_INITIAL_ADDRESS: usize = 0x8000;
pub const VIDEO_RAM_SIZE: usize = 0x2000;
pub const EXTERNAL_RAM_INITIAL_ADDRESS: usize = 0xA000;
pub const EXTERNAL_RAM_SIZE: usize = 0x2000;
pub const WORK_RAM_BANK0_INITIAL_ADDRESS: usize = 0xC000;
pub const WORK_RAM_BANK0_SIZE: usize = 0x1000;
pub const WORK_RAM_BANK1_INITIAL_ADDRESS: usize = 0xD000;
pub const WORK_RAM_BANK1_SIZE: usize = 0x1000;
pub const MIRROR_RAM_INITIAL_ADDRESS: usize = 0xE000;
pub const MIRROR_RAM_SIZE: usize = 0x1E00;
pub const IO_RAM_INITIAL_ADDRESS: usize = 0xFF00;
pub const IO_RAM_SIZE: usize = 0x80;
pub const HIGH_RAM_INITIAL_ADDRESS: usize = 0xFF80;
pub const HIGH_RAM_SIZE: usize = 0x7F;
pub const INTERRUPT_ENABLE_ADDRESS: usize = 0xFFFF;

// Kernel (System mode) address space: ROM low half, RAM high half.
pub const KERNEL_ROM_INITIAL_ADDRESS: usize = 0x0000;
pub const KERNEL_ROM_SIZE: usize = 0x8000;
pub const KERNEL_RAM_INITIAL_ADDRESS: usize = 0x8000;
pub const KERNEL_RAM_SIZE: usize = 0x8000;

pub struct GameBoyX {
    cpu: Z80X,
    memory: MemoryController,
    halted: bool,
    stopped: bool,
}

impl GameBoyX {
    pub fn new() -> Result<Self, MemoryError> {
        let mut memory = MemoryController::new();

        // Kernel resources, visible in System mode only.
        memory.register_resource(
            Box::new(Rom::new(KERNEL_ROM_SIZE)),
            range(KERNEL_ROM_INITIAL_ADDRESS, KERNEL_ROM_SIZE),
            Mode::System,
        )?;
        memory.register_resource(
            Box::new(Ram::new(KERNEL_RAM_SIZE)),
            range(KERNEL_RAM_INITIAL_ADDRESS, KERNEL_RAM_SIZE),
            Mode::System,
        )?;

        // The user-mode DMG map.
        memory.register_resource(
            Box::new(BankedRom::new(FIXED_BANK_ROM_SIZE, DEFAULT_ROM_BANK_SIZE)),
            range(USER_FIXED_ROM_INITIAL_ADDRESS, USER_FIXED_ROM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(BankedRom::new(DYNAMIC_BANK_ROM_SIZE, DEFAULT_ROM_BANK_SIZE)),
            range(USER_BANKED_ROM_INITIAL_ADDRESS, USER_BANKED_ROM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(VIDEO_RAM_SIZE)),
            range(VIDEO_RAM_INITIAL_ADDRESS, VIDEO_RAM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(EXTERNAL_RAM_SIZE)),
            range(EXTERNAL_RAM_INITIAL_ADDRESS, EXTERNAL_RAM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(WORK_RAM_BANK0_SIZE)),
            range(WORK_RAM_BANK0_INITIAL_ADDRESS, WORK_RAM_BANK0_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(WORK_RAM_BANK1_SIZE)),
            range(WORK_RAM_BANK1_INITIAL_ADDRESS, WORK_RAM_BANK1_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(MIRROR_RAM_SIZE)),
            range(MIRROR_RAM_INITIAL_ADDRESS, MIRROR_RAM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(IO_RAM_SIZE)),
            range(IO_RAM_INITIAL_ADDRESS, IO_RAM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(HIGH_RAM_SIZE)),
            range(HIGH_RAM_INITIAL_ADDRESS, HIGH_RAM_SIZE),
            Mode::User,
        )?;
        memory.register_resource(
            Box::new(Ram::new(1)),
            AddressRange::new(
                INTERRUPT_ENABLE_ADDRESS,
                INTERRUPT_ENABLE_ADDRESS,
                RangeType::AllInclusive,
            ),
            Mode::User,
        )?;

        debug!("GameBoyX memory map registered");

        Ok(Self {
            cpu: Z80X::new(),
            memory,
            halted: false,
            stopped: false,
        })
    }

    /// Load kernel code into the System-mode ROM. Only valid before the
    /// machine has dropped to User mode.
    pub fn load_kernel(&mut self, data: &[u8]) -> Result<(), MemoryError> {
        let previous = self.memory.mode();
        self.memory.set_mode(Mode::System);
        let result = self.memory.load(data, KERNEL_ROM_INITIAL_ADDRESS, None);
        self.memory.set_mode(previous);
        result
    }

    /// Load a cartridge image into the user fixed ROM (bank 0 onward).
    pub fn load_cartridge(&mut self, data: &[u8]) -> Result<(), MemoryError> {
        let previous = self.memory.mode();
        self.memory.set_mode(Mode::User);
        let result = self
            .memory
            .load(data, USER_FIXED_ROM_INITIAL_ADDRESS, None);
        self.memory.set_mode(previous);
        result
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.cpu.interrupts_enabled()
    }

    pub fn mode(&self) -> Mode {
        self.memory.mode()
    }

    pub fn cpu(&self) -> &Z80X {
        &self.cpu
    }
}

fn range(begin: usize, size: usize) -> AddressRange {
    AddressRange::new(begin, begin + size, RangeType::BeginInclusive)
}

impl System for GameBoyX {
    /// One instruction cycle. HALT/STOP latch the machine; further cycles
    /// are no-ops until reset (interrupt wake-up is the runner's concern).
    fn run_cycle(&mut self) -> Result<(), CoreError> {
        if self.halted || self.stopped {
            return Ok(());
        }

        self.cpu.run_cycle(&mut self.memory)?;

        if self.cpu.halt_signal() {
            debug!("cpu halted");
            self.halted = true;
        }
        if self.cpu.stop_signal() {
            debug!("cpu stopped");
            self.stopped = true;
        }
        Ok(())
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
    Ok(Box::new(GameBoyX::new()?))
}

inventory::submit! {
    MachineEntry::new("gameboyx", "GameBoyX with DMG memory map and kernel region", create)
}
