use gbx_core::core::CoreError;
use gbx_core::cpu::{Flag, Register, Z80X};
use gbx_core::memory::{AddressRange, MemoryController, Mode, Ram, RangeType};

/// Minimal system for instruction tests: 64KB flat RAM in each mode, the
/// CPU starting at PC = 0 in System mode.
pub struct TestSystem {
    pub cpu: Z80X,
    pub memory: MemoryController,
}

impl TestSystem {
    pub fn new() -> Self {
        let mut memory = MemoryController::new();
        let full_range = AddressRange::new(0x0000, 0xFFFF, RangeType::AllInclusive);
        memory
            .register_resource(Box::new(Ram::new(0x10000)), full_range, Mode::System)
            .unwrap();
        memory
            .register_resource(Box::new(Ram::new(0x10000)), full_range, Mode::User)
            .unwrap();

        Self {
            cpu: Z80X::new(),
            memory,
        }
    }

    /// Store bytes into the System-mode RAM.
    pub fn load(&mut self, address: usize, data: &[u8]) {
        self.memory.load(data, address, Some(address)).unwrap();
    }

    /// Store bytes into the User-mode RAM.
    pub fn load_user(&mut self, address: usize, data: &[u8]) {
        let previous = self.memory.mode();
        self.memory.set_mode(Mode::User);
        self.memory.load(data, address, Some(address)).unwrap();
        self.memory.set_mode(previous);
    }

    /// Run exactly one instruction; panics on any core error.
    pub fn run_instruction(&mut self) {
        self.cpu.run_cycle(&mut self.memory).unwrap();
    }

    pub fn try_run_instruction(&mut self) -> Result<(), CoreError> {
        self.cpu.run_cycle(&mut self.memory)
    }

    pub fn read_byte(&self, address: usize) -> u8 {
        self.memory.read_byte(address).unwrap()
    }

    pub fn write_reg(&mut self, reg: Register, value: u8) {
        self.cpu.registers_mut().write(reg, value);
    }

    pub fn write_pair(&mut self, reg: Register, value: u16) {
        self.cpu.registers_mut().write_pair(reg, value);
    }

    pub fn reg(&self, reg: Register) -> u8 {
        self.cpu.registers().read(reg)
    }

    pub fn pair(&self, reg: Register) -> u16 {
        self.cpu.registers().read_pair(reg)
    }

    pub fn flag(&self, flag: Flag) -> u8 {
        self.cpu.registers().read_flag(flag)
    }

    pub fn set_flags(&mut self, value: u8) {
        self.cpu.registers_mut().write(Register::F, value);
    }
}
