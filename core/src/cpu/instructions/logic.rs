//! Logical family: AND/OR/XOR against the accumulator, and CPL.

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::instructions::source_operand_u8;
use crate::cpu::registers::{Flag, Register, RegisterBank};

fn decode_logic(opcode: u8, kind: OpcodeType, decoded: &mut DecodedInstruction) {
    if (opcode >> 6) == 0x03 {
        // Immediate form (0xE6 / 0xF6 / 0xEE)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Immediate,
            destination: Register::A,
            ..Default::default()
        };
    } else if (opcode & 0x07) == 0x06 {
        // (HL) form
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSource,
            source: Register::HL,
            destination: Register::A,
            ..Default::default()
        };
    } else {
        let source = RegisterBank::from_instruction_source(opcode & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Register,
            source,
            destination: Register::A,
            ..Default::default()
        };
    }
}

/// CY and N always cleared; H set for AND and cleared otherwise; Z from
/// the result.
fn set_logic_flags(result: u8, is_and: bool, registers: &mut RegisterBank) {
    registers.write(Register::F, 0x00);
    if result == 0 {
        registers.set_flag(Flag::Z);
    }
    if is_and {
        registers.set_flag(Flag::H);
    }
}

pub fn decode_and(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_logic(opcode, OpcodeType::And, decoded);
}

pub fn execute_and(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let result = registers.read(decoded.destination) & source_operand_u8(registers, decoded);
    set_logic_flags(result, true, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

pub fn decode_or(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_logic(opcode, OpcodeType::Or, decoded);
}

pub fn execute_or(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let result = registers.read(decoded.destination) | source_operand_u8(registers, decoded);
    set_logic_flags(result, false, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

pub fn decode_xor(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_logic(opcode, OpcodeType::Xor, decoded);
}

pub fn execute_xor(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let result = registers.read(decoded.destination) ^ source_operand_u8(registers, decoded);
    set_logic_flags(result, false, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

// --- CPL ---

pub fn decode_cpl(decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Cpl,
        addressing_mode: AddressingMode::Register,
        source: Register::A,
        destination: Register::A,
        ..Default::default()
    };
}

/// Complement A. Sets N and H; Z and CY are untouched.
pub fn execute_cpl(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    registers.write(decoded.destination, !value);
    registers.set_flag(Flag::N);
    registers.set_flag(Flag::H);
    Ok(false)
}
