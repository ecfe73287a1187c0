//! The arithmetic logic unit.
//!
//! Owns the decoded-instruction scratch record and the handler selection
//! for the current cycle, and implements the primitive steps the control
//! unit sequences: instruction fetch, decode, the operand-acquisition
//! variants and the seven writeback paths. Instruction effects that reach
//! beyond the register file (halt, stop, interrupt enable, mode change)
//! surface here as execution signals for the machine layer.

use log::trace;

use crate::core::error::{InstructionError, MemoryError};
use crate::cpu::decoder::decode_opcode;
use crate::cpu::instruction::{
    is_pre_opcode, AddressingMode, AddressingModeTraits, DecodedInstruction, OpcodeType,
};
use crate::cpu::instructions::{sign_extend, Handler};
use crate::cpu::registers::{Register, RegisterBank};
use crate::memory::MemoryController;

pub struct ArithmeticLogicUnit {
    decoded: DecodedInstruction,
    handler: Option<Handler>,
    execution_aborted: bool,
    clear_interrupt_status: bool,
    halt_signal: bool,
    stop_signal: bool,
    interrupt_master_enable: bool,
    user_mode_requested: bool,
    user_source_operand_requested: bool,
}

impl Default for ArithmeticLogicUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl ArithmeticLogicUnit {
    pub fn new() -> Self {
        Self {
            decoded: DecodedInstruction::default(),
            handler: None,
            execution_aborted: false,
            clear_interrupt_status: false,
            halt_signal: false,
            stop_signal: false,
            interrupt_master_enable: false,
            user_mode_requested: false,
            user_source_operand_requested: false,
        }
    }

    pub fn initialize_registers(&self, registers: &mut RegisterBank) {
        registers.write(Register::IR, 0x00);
        registers.write_pair(Register::PC, 0x0000);
        registers.write(Register::F, 0x00);
    }

    /// The decoded instruction of the current cycle.
    pub fn decoded_instruction(&self) -> &DecodedInstruction {
        &self.decoded
    }

    // --- Fetch ---

    /// Read the next opcode (and a pre-opcode, if present) at PC into
    /// IR/PIR. PIR is 0x00 for unprefixed instructions.
    pub fn acquire_instruction(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let instruction = self.read_at_register(registers, Register::PC, memory)?;
        Self::increment_pc(registers);

        if is_pre_opcode(instruction) {
            let second = self.read_at_register(registers, Register::PC, memory)?;
            Self::increment_pc(registers);

            registers.write(Register::PIR, instruction);
            registers.write(Register::IR, second);
        } else {
            registers.write(Register::PIR, 0x00);
            registers.write(Register::IR, instruction);
        }
        Ok(())
    }

    // --- Decode ---

    /// Select and run the handler's decode for the opcode in IR/PIR.
    pub fn decode(&mut self, registers: &RegisterBank) -> Result<(), InstructionError> {
        self.clear_execution_signals();

        let opcode = registers.read(Register::IR);
        let complement = registers.read(Register::PIR);
        let pre_opcode = if is_pre_opcode(complement) {
            Some(complement)
        } else {
            None
        };

        let handler = decode_opcode(opcode, pre_opcode)?;
        handler.decode(opcode, pre_opcode, &mut self.decoded)?;
        self.handler = Some(handler);
        self.resolve_memory_access_signals();

        trace!(
            "decoded {:#04X} (pre {:?}) -> {:?} / {:?}",
            opcode,
            pre_opcode,
            self.decoded.opcode,
            self.decoded.addressing_mode
        );
        Ok(())
    }

    /// Static trait record of the decoded instruction's addressing mode.
    pub fn addressing_mode_traits(&self) -> &'static AddressingModeTraits {
        self.decoded.addressing_mode.traits()
    }

    // --- Operand acquisition ---

    pub fn acquire_operand1_at_pc(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        self.decoded.memory_operand1 = self.read_at_register(registers, Register::PC, memory)?;
        Self::increment_pc(registers);
        Ok(())
    }

    pub fn acquire_operand1_at_register(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        self.decoded.memory_operand1 =
            self.read_at_register(registers, self.decoded.source, memory)?;

        let traits = self.addressing_mode_traits();
        if traits.increment_source {
            Self::increment_register_pair(registers, self.decoded.source);
        } else if traits.decrement_source {
            Self::decrement_register_pair(registers, self.decoded.source);
        }
        Ok(())
    }

    /// Operand 1 from the 0xFF00 page, indexed by the source register.
    pub fn acquire_operand1_implicitly(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address = 0xFF00 | registers.read(self.decoded.source) as usize;
        self.decoded.memory_operand1 = memory.read_byte(address)?;
        Ok(())
    }

    pub fn acquire_operand2_at_pc(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        self.decoded.memory_operand2 = self.read_at_register(registers, Register::PC, memory)?;
        Self::increment_pc(registers);
        Ok(())
    }

    /// Operand 2 at source pair + signed displacement (operand 1).
    pub fn acquire_operand2_at_composed_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let base = registers.read_pair(self.decoded.source);
        let address = base.wrapping_add(sign_extend(self.decoded.memory_operand1));
        self.decoded.memory_operand2 = memory.read_byte(address as usize)?;
        Ok(())
    }

    /// Operand 2 from the 0xFF00 page, indexed by operand 1.
    pub fn acquire_operand2_implicitly(
        &mut self,
        _registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address = 0xFF00 | self.decoded.memory_operand1 as usize;
        self.decoded.memory_operand2 = memory.read_byte(address)?;
        Ok(())
    }

    pub fn acquire_operand2_directly(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        self.decoded.memory_operand2 =
            self.read_at_register(registers, self.decoded.source, memory)?;

        if self.addressing_mode_traits().increment_source_operand2 {
            Self::increment_register_pair(registers, self.decoded.source);
        }
        Ok(())
    }

    /// Operand 3 at the address composed from operands 1 (low) and 2 (high).
    pub fn acquire_operand3(
        &mut self,
        _registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address =
            self.decoded.memory_operand1 as usize | ((self.decoded.memory_operand2 as usize) << 8);
        self.decoded.memory_operand3 = memory.read_byte(address)?;
        Ok(())
    }

    // --- Execute ---

    pub fn execute(&mut self, registers: &mut RegisterBank) -> Result<(), InstructionError> {
        let Some(handler) = self.handler else {
            return Err(InstructionError::MalformedInstruction(
                "execute requested with no decoded instruction",
            ));
        };

        self.execution_aborted = handler.execute(registers, &mut self.decoded)?;
        self.resolve_execution_signals();
        Ok(())
    }

    // --- Writeback paths ---

    /// Result 1 to destination pair + signed displacement (operand 1).
    pub fn write_back_at_operand_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let base = registers.read_pair(self.decoded.destination);
        let address = base.wrapping_add(sign_extend(self.decoded.memory_operand1));
        memory.write_byte(self.decoded.memory_result1, address as usize)
    }

    /// Result 1 to the address held in the destination pair, with the
    /// post-increment/decrement of the HL+/HL- forms.
    pub fn write_back_at_register_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address = registers.read_pair(self.decoded.destination);
        memory.write_byte(self.decoded.memory_result1, address as usize)?;

        let traits = self.addressing_mode_traits();
        if traits.increment_destination {
            Self::increment_register_pair(registers, self.decoded.destination);
        } else if traits.decrement_destination {
            Self::decrement_register_pair(registers, self.decoded.destination);
        }
        Ok(())
    }

    /// Result 1 to the address composed from operands 1 and 2.
    pub fn write_back_at_composed_address(
        &mut self,
        _registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address =
            self.decoded.memory_operand1 as usize | ((self.decoded.memory_operand2 as usize) << 8);
        memory.write_byte(self.decoded.memory_result1, address)
    }

    /// Result 1 to the 0xFF00 page, indexed by the destination register.
    pub fn write_back_at_implicit_register_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address = 0xFF00 | registers.read(self.decoded.destination) as usize;
        memory.write_byte(self.decoded.memory_result1, address)
    }

    /// Source register to the 0xFF00 page, indexed by operand 1.
    pub fn write_back_at_implicit_immediate_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address = 0xFF00 | self.decoded.memory_operand1 as usize;
        memory.write_byte(registers.read(self.decoded.source), address)
    }

    /// Push results 1 (high) and 2 (low) below SP and move SP down.
    pub fn write_back_pair_at_register_address(
        &mut self,
        registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let stack_pointer = registers.read_pair(Register::SP);
        memory.write_byte(
            self.decoded.memory_result1,
            stack_pointer.wrapping_sub(1) as usize,
        )?;
        memory.write_byte(
            self.decoded.memory_result2,
            stack_pointer.wrapping_sub(2) as usize,
        )?;
        registers.write_pair(Register::SP, stack_pointer.wrapping_sub(2));
        Ok(())
    }

    /// Results 1 (low) and 2 (high) to the address composed from operands
    /// 1 and 2 (LD (nn), SP).
    pub fn write_back_pair_at_immediate_address(
        &mut self,
        _registers: &mut RegisterBank,
        memory: &mut MemoryController,
    ) -> Result<(), MemoryError> {
        let address =
            self.decoded.memory_operand1 as usize | ((self.decoded.memory_operand2 as usize) << 8);
        memory.write_byte(self.decoded.memory_result1, address)?;
        memory.write_byte(self.decoded.memory_result2, address + 1)
    }

    // --- Execution signals ---

    pub fn is_execution_aborted(&self) -> bool {
        self.execution_aborted
    }

    /// RETI completed this cycle.
    pub fn clear_interrupt_status_signal(&self) -> bool {
        self.clear_interrupt_status
    }

    pub fn halt_signal(&self) -> bool {
        self.halt_signal
    }

    pub fn stop_signal(&self) -> bool {
        self.stop_signal
    }

    /// Interrupt master enable latch; EI sets it, DI clears it.
    pub fn interrupt_master_enable(&self) -> bool {
        self.interrupt_master_enable
    }

    /// A mode-changing instruction (jpu) asked to leave the memory
    /// controller in User mode after this cycle.
    pub fn user_mode_requested(&self) -> bool {
        self.user_mode_requested
    }

    /// The instruction sources its operands from the *user* program (ldu
    /// with a memory-sourced addressing mode): acquisition must run with
    /// the memory controller temporarily in User mode.
    pub fn user_source_operand_requested(&self) -> bool {
        self.user_source_operand_requested
    }

    fn clear_execution_signals(&mut self) {
        self.execution_aborted = false;
        self.clear_interrupt_status = false;
        self.halt_signal = false;
        self.stop_signal = false;
        self.user_mode_requested = false;
        self.user_source_operand_requested = false;
    }

    fn resolve_execution_signals(&mut self) {
        if self.execution_aborted {
            return;
        }

        match self.decoded.opcode {
            OpcodeType::Reti => self.clear_interrupt_status = true,
            OpcodeType::Halt => self.halt_signal = true,
            OpcodeType::Stop => self.stop_signal = true,
            OpcodeType::Ei => self.interrupt_master_enable = true,
            OpcodeType::Di => self.interrupt_master_enable = false,
            OpcodeType::Jpu => self.user_mode_requested = true,
            _ => {}
        }
    }

    fn resolve_memory_access_signals(&mut self) {
        let user_sourced = matches!(
            self.decoded.addressing_mode,
            AddressingMode::RegisterIndirectSourcePair
                | AddressingMode::RegisterIndirectSource
                | AddressingMode::RegisterIndirectSourceAndDestination
                | AddressingMode::RegisterIndirectSourceIncrement
                | AddressingMode::RegisterIndirectSourceDecrement
        );
        if self.decoded.opcode == OpcodeType::Ldu && user_sourced {
            self.user_source_operand_requested = true;
        }
    }

    // --- Shared primitives ---

    fn read_at_register(
        &self,
        registers: &RegisterBank,
        reg: Register,
        memory: &MemoryController,
    ) -> Result<u8, MemoryError> {
        let address = registers.read_pair(reg);
        memory.read_byte(address as usize)
    }

    fn increment_pc(registers: &mut RegisterBank) {
        let pc = registers.read_pair(Register::PC);
        registers.write_pair(Register::PC, pc.wrapping_add(1));
    }

    fn increment_register_pair(registers: &mut RegisterBank, reg: Register) {
        let value = registers.read_pair(reg);
        registers.write_pair(reg, value.wrapping_add(1));
    }

    fn decrement_register_pair(registers: &mut RegisterBank, reg: Register) {
        let value = registers.read_pair(reg);
        registers.write_pair(reg, value.wrapping_sub(1));
    }
}
