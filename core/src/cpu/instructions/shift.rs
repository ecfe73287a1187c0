//! Rotate/shift/swap family.
//!
//! The CB-prefixed forms address any register or (HL) and set Z from the
//! result; the unprefixed accumulator rotates (RLCA/RLA/RRCA/RRA) always
//! operate on A and unconditionally clear Z. H and N are cleared across the
//! entire family; CY receives the bit shifted out (0 for SWAP).

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::instructions::{source_operand_u8, store_result_u8};
use crate::cpu::registers::{Flag, Register, RegisterBank};

fn decode_cb_target(opcode: u8, kind: OpcodeType, decoded: &mut DecodedInstruction) {
    if (opcode & 0x07) == 0x06 {
        // (HL)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSourceAndDestination,
            source: Register::HL,
            destination: Register::HL,
            ..Default::default()
        };
    } else {
        let target = RegisterBank::from_instruction_source(opcode & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Register,
            source: target,
            destination: target,
            ..Default::default()
        };
    }
}

fn decode_accumulator(kind: OpcodeType, decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: kind,
        addressing_mode: AddressingMode::Register,
        source: Register::A,
        destination: Register::A,
        ..Default::default()
    };
}

fn set_shift_flags(result: u8, carry_out: u8, registers: &mut RegisterBank) {
    registers.write_flag(Flag::CY, carry_out);
    registers.write_flag(Flag::Z, if result == 0 { 0x01 } else { 0x00 });
    registers.clear_flag(Flag::H);
    registers.clear_flag(Flag::N);
}

fn set_accumulator_rotate_flags(carry_out: u8, registers: &mut RegisterBank) {
    registers.write_flag(Flag::CY, carry_out);
    registers.clear_flag(Flag::Z);
    registers.clear_flag(Flag::H);
    registers.clear_flag(Flag::N);
}

// --- CB-prefixed rotates/shifts ---

pub fn decode_rlc(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Rlc, decoded);
}

pub fn execute_rlc(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let ms_bit = (operand >> 7) & 0x01;
    let result = (operand << 1) | ms_bit;

    set_shift_flags(result, ms_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_rl(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Rl, decoded);
}

pub fn execute_rl(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let carry_in = registers.read_flag(Flag::CY);
    let ms_bit = (operand >> 7) & 0x01;
    let result = (operand << 1) | carry_in;

    set_shift_flags(result, ms_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_rrc(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Rrc, decoded);
}

pub fn execute_rrc(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let ls_bit = operand & 0x01;
    let result = (operand >> 1) | (ls_bit << 7);

    set_shift_flags(result, ls_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_rr(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Rr, decoded);
}

pub fn execute_rr(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let carry_in = registers.read_flag(Flag::CY);
    let ls_bit = operand & 0x01;
    let result = (operand >> 1) | (carry_in << 7);

    set_shift_flags(result, ls_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_sla(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Sla, decoded);
}

pub fn execute_sla(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let ms_bit = (operand >> 7) & 0x01;
    let result = operand << 1;

    set_shift_flags(result, ms_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_sra(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Sra, decoded);
}

/// Arithmetic right shift: bit 7 is replicated, bit 0 shifts out to CY.
pub fn execute_sra(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let ls_bit = operand & 0x01;
    let ms_bit = (operand >> 7) & 0x01;
    let result = (operand >> 1) | (ms_bit << 7);

    set_shift_flags(result, ls_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_srl(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Srl, decoded);
}

pub fn execute_srl(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let ls_bit = operand & 0x01;
    let result = operand >> 1;

    set_shift_flags(result, ls_bit, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

pub fn decode_swap(opcode: u8, decoded: &mut DecodedInstruction) {
    decode_cb_target(opcode, OpcodeType::Swap, decoded);
}

/// Exchange nibbles. CY is always cleared.
pub fn execute_swap(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand = source_operand_u8(registers, decoded);
    let result = (operand >> 4) | (operand << 4);

    set_shift_flags(result, 0x00, registers);
    store_result_u8(result, registers, decoded);
    Ok(false)
}

// --- Accumulator rotates (unprefixed) ---

pub fn decode_rlca(decoded: &mut DecodedInstruction) {
    decode_accumulator(OpcodeType::Rlca, decoded);
}

pub fn execute_rlca(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    let ms_bit = (value >> 7) & 0x01;
    let result = (value << 1) | ms_bit;

    set_accumulator_rotate_flags(ms_bit, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

pub fn decode_rla(decoded: &mut DecodedInstruction) {
    decode_accumulator(OpcodeType::Rla, decoded);
}

pub fn execute_rla(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    let carry_in = registers.read_flag(Flag::CY);
    let ms_bit = (value >> 7) & 0x01;
    let result = (value << 1) | carry_in;

    set_accumulator_rotate_flags(ms_bit, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

pub fn decode_rrca(decoded: &mut DecodedInstruction) {
    decode_accumulator(OpcodeType::Rrca, decoded);
}

pub fn execute_rrca(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    let ls_bit = value & 0x01;
    let result = (value >> 1) | (ls_bit << 7);

    set_accumulator_rotate_flags(ls_bit, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

pub fn decode_rra(decoded: &mut DecodedInstruction) {
    decode_accumulator(OpcodeType::Rra, decoded);
}

pub fn execute_rra(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    let carry_in = registers.read_flag(Flag::CY);
    let ls_bit = value & 0x01;
    let result = (value >> 1) | (carry_in << 7);

    set_accumulator_rotate_flags(ls_bit, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}
