pub mod alu;
pub mod control_unit;
pub mod decoder;
pub mod instruction;
pub mod instructions;
pub mod registers;

pub use alu::ArithmeticLogicUnit;
pub use control_unit::ControlUnit;
pub use instruction::{
    is_pre_opcode, AddressingMode, DecodedInstruction, OpcodeType, PRE_OPCODE_CB, PRE_OPCODE_DD,
    PRE_OPCODE_FC, PRE_OPCODE_FD,
};
pub use registers::{Flag, Register, RegisterBank};

use crate::core::error::CoreError;
use crate::memory::MemoryController;

/// The assembled CPU: register bank, ALU and control unit. One call to
/// [`Z80X::run_cycle`] executes exactly one instruction against the given
/// memory controller; there is no internal suspension point and no state
/// carried across cycles outside the register bank.
pub struct Z80X {
    control_unit: ControlUnit,
    alu: ArithmeticLogicUnit,
    registers: RegisterBank,
}

impl Default for Z80X {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80X {
    pub fn new() -> Self {
        let alu = ArithmeticLogicUnit::new();
        let mut registers = RegisterBank::new();
        alu.initialize_registers(&mut registers);

        Self {
            control_unit: ControlUnit::new(),
            alu,
            registers,
        }
    }

    /// Execute one instruction cycle. On error no retry is attempted and
    /// the caller must not assume partial state was written.
    pub fn run_cycle(&mut self, memory: &mut MemoryController) -> Result<(), CoreError> {
        self.control_unit
            .run_cycle(&mut self.alu, &mut self.registers, memory)
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterBank {
        &mut self.registers
    }

    pub fn alu(&self) -> &ArithmeticLogicUnit {
        &self.alu
    }

    /// HALT executed this cycle.
    pub fn halt_signal(&self) -> bool {
        self.alu.halt_signal()
    }

    /// STOP executed this cycle.
    pub fn stop_signal(&self) -> bool {
        self.alu.stop_signal()
    }

    /// RETI executed this cycle.
    pub fn clear_interrupt_status_signal(&self) -> bool {
        self.alu.clear_interrupt_status_signal()
    }

    /// Current interrupt-master-enable latch (EI/DI).
    pub fn interrupts_enabled(&self) -> bool {
        self.alu.interrupt_master_enable()
    }
}
