//! Single-bit operations: BIT/SET/RES. The bit index travels in the
//! decoded instruction's extra operand (opcode bits 5-3).

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::instructions::{source_operand_u8, store_result_u8};
use crate::cpu::registers::{Flag, Register, RegisterBank};

fn decode_bit_operation(opcode: u8, kind: OpcodeType, decoded: &mut DecodedInstruction) {
    let target_bit = (opcode >> 3) & 0x07;

    if (opcode & 0x07) == 0x06 {
        // b, (HL)
        let mode = if kind == OpcodeType::Bit {
            AddressingMode::RegisterIndirectSource
        } else {
            AddressingMode::RegisterIndirectSourceAndDestination
        };
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: mode,
            source: Register::HL,
            destination: Register::HL,
            extra_operand: target_bit,
            ..Default::default()
        };
    } else {
        // b, r
        let target = RegisterBank::from_instruction_source(opcode & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Register,
            source: target,
            destination: target,
            extra_operand: target_bit,
            ..Default::default()
        };
    }
}

pub fn decode_bit(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_bit_operation(opcode, OpcodeType::Bit, decoded);
}

/// BIT only inspects: Z is the complement of the tested bit, H always set,
/// N cleared, CY untouched. No writeback.
pub fn execute_bit(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let tested = (operand >> decoded.extra_operand) & 0x01;

    registers.write_flag(Flag::Z, if tested == 0 { 0x01 } else { 0x00 });
    registers.clear_flag(Flag::N);
    registers.set_flag(Flag::H);
    Ok(false)
}

pub fn decode_set(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_bit_operation(opcode, OpcodeType::Set, decoded);
}

/// SET forces the addressed bit to 1. Flags untouched.
pub fn execute_set(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let result = operand | (1 << decoded.extra_operand);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_res(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_bit_operation(opcode, OpcodeType::Res, decoded);
}

/// RES forces the addressed bit to 0. Flags untouched.
pub fn execute_res(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let result = operand & !(1 << decoded.extra_operand);
    store_result_u8(result, registers, decoded);
    Ok(false)
}
