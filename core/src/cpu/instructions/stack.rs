//! PUSH and POP. The pair field maps 3 to AF (never SP).
//!
//! PUSH leaves the pair's bytes in the memory-result slots for the
//! pair-at-register-address writeback; POP consumes the two bytes the
//! pop-pair acquisition pulled from the stack.

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::registers::{Register, RegisterBank};

pub fn decode_push(opcode: u8, decoded: &mut DecodedInstruction) {
    let source = RegisterBank::from_instruction_to_push_pair((opcode >> 4) & 0x03);
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Push,
        addressing_mode: AddressingMode::RegisterIndirectDestinationPair,
        source,
        destination: Register::SP,
        ..Default::default()
    };
}

pub fn execute_push(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read_pair(decoded.source);
    decoded.memory_result1 = (value >> 8) as u8;
    decoded.memory_result2 = value as u8;
    Ok(false)
}

pub fn decode_pop(opcode: u8, decoded: &mut DecodedInstruction) {
    let destination = RegisterBank::from_instruction_to_push_pair((opcode >> 4) & 0x03);
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Pop,
        addressing_mode: AddressingMode::RegisterIndirectSourcePair,
        source: Register::SP,
        destination,
        ..Default::default()
    };
}

pub fn execute_pop(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = decoded.memory_operand1 as u16 | ((decoded.memory_operand2 as u16) << 8);
    registers.write_pair(decoded.destination, value);
    Ok(false)
}
