//! The control unit: sequences one instruction cycle.
//!
//! States run strictly in order — Fetch, Decode, AcquireOperand1..3
//! (each gated by the addressing-mode traits), Execute, WriteBack (skipped
//! when execution aborted). Operands sourced from the user program are
//! acquired with the memory controller scoped to User mode; the scope
//! guard restores the prior mode on every exit path, including errors.

use crate::core::error::CoreError;
use crate::cpu::alu::ArithmeticLogicUnit;
use crate::cpu::instruction::AddressingModeTraits;
use crate::cpu::registers::RegisterBank;
use crate::memory::{MemoryController, Mode};

/// Restores the memory controller's previous mode on drop.
struct ModeScope<'a> {
    memory: &'a mut MemoryController,
    previous: Mode,
}

impl<'a> ModeScope<'a> {
    fn enter(memory: &'a mut MemoryController, mode: Mode) -> Self {
        let previous = memory.mode();
        memory.set_mode(mode);
        Self { memory, previous }
    }

    fn memory(&mut self) -> &mut MemoryController {
        self.memory
    }
}

impl Drop for ModeScope<'_> {
    fn drop(&mut self) {
        self.memory.set_mode(self.previous);
    }
}

#[derive(Default)]
pub struct ControlUnit;

impl ControlUnit {
    pub fn new() -> Self {
        Self
    }

    /// Run one full fetch-decode-execute-writeback cycle.
    pub fn run_cycle(
        &mut self,
        alu: &mut ArithmeticLogicUnit,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), CoreError> {
        // 1 Fetch
        alu.acquire_instruction(registers, memory)?;

        // 2 Decode
        alu.decode(registers)?;
        let traits = alu.addressing_mode_traits();

        // 2.1 Acquire operand 1 or displacement
        if traits.acquire_operand1 {
            Self::acquire_operand1(alu, registers, memory, traits)?;
        }

        // 2.2 Acquire operand 2 (immediate MSB, composed-address or
        //     popped operand)
        if traits.acquire_operand2 {
            Self::acquire_operand2(alu, registers, memory, traits)?;
        }

        // 2.3 Acquire operand 3 (extended source)
        if traits.acquire_operand3 {
            Self::acquire_operand3(alu, registers, memory)?;
        }

        // 3 Execute
        alu.execute(registers)?;
        if alu.user_mode_requested() {
            // Mode-changing instruction: the switch to User mode persists.
            memory.set_mode(Mode::User);
        }

        // 4 WriteBack
        if traits.write_back && !alu.is_execution_aborted() {
            Self::write_back(alu, registers, memory, traits)?;
        }

        Ok(())
    }

    fn acquire_operand1(
        alu: &mut ArithmeticLogicUnit,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
        traits: &AddressingModeTraits,
    ) -> Result<(), CoreError> {
        if traits.acquire_operand1_from_pc {
            alu.acquire_operand1_at_pc(registers, memory)?;
        } else if alu.user_source_operand_requested() {
            let mut scope = ModeScope::enter(memory, Mode::User);
            if traits.acquire_operand1_directly {
                alu.acquire_operand1_at_register(registers, scope.memory())?;
            } else if traits.acquire_operand1_implicitly {
                alu.acquire_operand1_implicitly(registers, scope.memory())?;
            }
        } else if traits.acquire_operand1_directly {
            alu.acquire_operand1_at_register(registers, memory)?;
        } else if traits.acquire_operand1_implicitly {
            alu.acquire_operand1_implicitly(registers, memory)?;
        }
        Ok(())
    }

    fn acquire_operand2(
        alu: &mut ArithmeticLogicUnit,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
        traits: &AddressingModeTraits,
    ) -> Result<(), CoreError> {
        if traits.acquire_operand2_from_pc {
            alu.acquire_operand2_at_pc(registers, memory)?;
        } else if alu.user_source_operand_requested() {
            let mut scope = ModeScope::enter(memory, Mode::User);
            if traits.acquire_operand2_at_composed_address {
                alu.acquire_operand2_at_composed_address(registers, scope.memory())?;
            } else if traits.acquire_operand2_implicitly {
                alu.acquire_operand2_implicitly(registers, scope.memory())?;
            } else if traits.acquire_operand2_directly {
                alu.acquire_operand2_directly(registers, scope.memory())?;
            }
        } else if traits.acquire_operand2_at_composed_address {
            alu.acquire_operand2_at_composed_address(registers, memory)?;
        } else if traits.acquire_operand2_implicitly {
            alu.acquire_operand2_implicitly(registers, memory)?;
        } else if traits.acquire_operand2_directly {
            alu.acquire_operand2_directly(registers, memory)?;
        }
        Ok(())
    }

    fn acquire_operand3(
        alu: &mut ArithmeticLogicUnit,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), CoreError> {
        if alu.user_source_operand_requested() {
            let mut scope = ModeScope::enter(memory, Mode::User);
            alu.acquire_operand3(registers, scope.memory())?;
        } else {
            alu.acquire_operand3(registers, memory)?;
        }
        Ok(())
    }

    fn write_back(
        alu: &mut ArithmeticLogicUnit,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
        traits: &AddressingModeTraits,
    ) -> Result<(), CoreError> {
        if traits.write_back_at_operand_address {
            alu.write_back_at_operand_address(registers, memory)?;
        } else if traits.write_back_at_register_address {
            alu.write_back_at_register_address(registers, memory)?;
        } else if traits.write_back_at_composed_address {
            alu.write_back_at_composed_address(registers, memory)?;
        } else if traits.write_back_at_implicit_register {
            alu.write_back_at_implicit_register_address(registers, memory)?;
        } else if traits.write_back_at_implicit_immediate {
            alu.write_back_at_implicit_immediate_address(registers, memory)?;
        } else if traits.write_back_pair_at_register_address {
            alu.write_back_pair_at_register_address(registers, memory)?;
        } else if traits.write_back_pair_at_immediate_address {
            alu.write_back_pair_at_immediate_address(registers, memory)?;
        }
        Ok(())
    }
}
