//! Arithmetic family: ADD/ADC/SUB/SBC/CP/INC/DEC and LD HL,SP+e8.
//!
//! Results and flags come from the shared bit-serial adder/subtractor so
//! that H and CY are derived from the actual carry chain position.

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::instructions::{
    add_u16_and_set_flags, add_u8_and_set_flags, decide_flag_mode, sign_extend,
    source_operand_u16, source_operand_u8, store_result_u8, sub_u8_and_set_flags, FlagMode,
};
use crate::cpu::registers::{Flag, Register, RegisterBank};

fn decode_alu_register_mode(
    opcode: u8,
    kind: OpcodeType,
    decoded: &mut DecodedInstruction,
) {
    let source = RegisterBank::from_instruction_source(opcode & 0x07);
    *decoded = DecodedInstruction {
        opcode: kind,
        addressing_mode: AddressingMode::Register,
        source,
        destination: Register::A,
        ..Default::default()
    };
}

fn decode_alu_immediate_mode(kind: OpcodeType, decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: kind,
        addressing_mode: AddressingMode::Immediate,
        destination: Register::A,
        ..Default::default()
    };
}

fn decode_alu_pointer_mode(kind: OpcodeType, decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: kind,
        addressing_mode: AddressingMode::RegisterIndirectSource,
        source: Register::HL,
        destination: Register::A,
        ..Default::default()
    };
}

// --- ADD ---

pub fn decode_add(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0x86 {
        // ADD A, (HL)
        decode_alu_pointer_mode(OpcodeType::Add, decoded);
    } else if opcode == 0xE8 {
        // ADD SP, e8
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Add,
            addressing_mode: AddressingMode::SingleImmediatePair,
            destination: Register::SP,
            ..Default::default()
        };
    } else if opcode == 0xC6 {
        // ADD A, n
        decode_alu_immediate_mode(OpcodeType::Add, decoded);
    } else if (opcode >> 3) == 0x10 {
        // ADD A, r
        decode_alu_register_mode(opcode, OpcodeType::Add, decoded);
    } else {
        // ADD HL, rr
        let source = RegisterBank::from_instruction_to_pair((opcode >> 4) & 0x03);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Add,
            addressing_mode: AddressingMode::RegisterPair,
            source,
            destination: Register::HL,
            ..Default::default()
        };
    }
}

fn add_16bit(registers: &mut RegisterBank, decoded: &mut DecodedInstruction) {
    let operand1 = source_operand_u16(registers, decoded);
    let operand2 = registers.read_pair(decoded.destination);
    let flag_mode = decide_flag_mode(decoded);
    let z_flag = registers.read_flag(Flag::Z);

    registers.write(Register::F, 0x00);
    let result = add_u16_and_set_flags(operand1, operand2, None, registers, flag_mode);
    registers.write_pair(decoded.destination, result);

    if decoded.addressing_mode == AddressingMode::SingleImmediatePair {
        // ADD SP, e8 always clears Z
        registers.clear_flag(Flag::Z);
    } else {
        // ADD HL, rr leaves Z untouched
        registers.write_flag(Flag::Z, z_flag);
    }
}

pub fn execute_add(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    if decoded.addressing_mode == AddressingMode::RegisterPair
        || decoded.addressing_mode == AddressingMode::SingleImmediatePair
    {
        add_16bit(registers, decoded);
    } else {
        let operand1 = source_operand_u8(registers, decoded);
        let operand2 = registers.read(decoded.destination);

        registers.write(Register::F, 0x00);
        let result = add_u8_and_set_flags(operand1, operand2, None, registers);
        registers.write(decoded.destination, result);
    }
    Ok(false)
}

// --- ADC ---

pub fn decode_adc(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0xCE {
        decode_alu_immediate_mode(OpcodeType::Adc, decoded);
    } else if opcode == 0x8E {
        decode_alu_pointer_mode(OpcodeType::Adc, decoded);
    } else {
        decode_alu_register_mode(opcode, OpcodeType::Adc, decoded);
    }
}

pub fn execute_adc(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand1 = source_operand_u8(registers, decoded);
    let operand2 = registers.read(decoded.destination);
    let carry = registers.read_flag(Flag::CY);

    registers.write(Register::F, 0x00);
    let result = add_u8_and_set_flags(operand1, operand2, Some(carry), registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

// --- SUB ---

pub fn decode_sub(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0xD6 {
        decode_alu_immediate_mode(OpcodeType::Sub, decoded);
    } else if opcode == 0x96 {
        decode_alu_pointer_mode(OpcodeType::Sub, decoded);
    } else {
        decode_alu_register_mode(opcode, OpcodeType::Sub, decoded);
    }
}

pub fn execute_sub(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand1 = registers.read(decoded.destination);
    let operand2 = source_operand_u8(registers, decoded);

    registers.write(Register::F, 0x00);
    let result = sub_u8_and_set_flags(operand1, operand2, None, registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

// --- SBC ---

pub fn decode_sbc(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0xDE {
        decode_alu_immediate_mode(OpcodeType::Sbc, decoded);
    } else if opcode == 0x9E {
        decode_alu_pointer_mode(OpcodeType::Sbc, decoded);
    } else {
        decode_alu_register_mode(opcode, OpcodeType::Sbc, decoded);
    }
}

pub fn execute_sbc(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand1 = registers.read(decoded.destination);
    let operand2 = source_operand_u8(registers, decoded);
    let borrow = registers.read_flag(Flag::CY);

    registers.write(Register::F, 0x00);
    let result = sub_u8_and_set_flags(operand1, operand2, Some(borrow), registers);
    registers.write(decoded.destination, result);
    Ok(false)
}

// --- CP ---

pub fn decode_cp(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0xFE {
        decode_alu_immediate_mode(OpcodeType::Cp, decoded);
    } else if opcode == 0xBE {
        decode_alu_pointer_mode(OpcodeType::Cp, decoded);
    } else {
        decode_alu_register_mode(opcode, OpcodeType::Cp, decoded);
    }
}

/// CP computes A - source and discards the result, updating flags only.
pub fn execute_cp(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand1 = registers.read(decoded.destination);
    let operand2 = source_operand_u8(registers, decoded);

    registers.write(Register::F, 0x00);
    let _ = sub_u8_and_set_flags(operand1, operand2, None, registers);
    Ok(false)
}

// --- INC ---

pub fn decode_inc(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0x34 {
        // INC (HL)
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Inc,
            addressing_mode: AddressingMode::RegisterIndirectSourceAndDestination,
            source: Register::HL,
            destination: Register::HL,
            ..Default::default()
        };
    } else if (opcode & 0x07) == 0x04 {
        // INC r
        let target = RegisterBank::from_instruction_source((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Inc,
            addressing_mode: AddressingMode::Register,
            source: target,
            destination: target,
            ..Default::default()
        };
    } else {
        // INC rr
        let target = RegisterBank::from_instruction_to_pair((opcode >> 4) & 0x03);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Inc,
            addressing_mode: AddressingMode::RegisterPair,
            source: target,
            destination: target,
            ..Default::default()
        };
    }
}

pub fn execute_inc(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    if decoded.addressing_mode == AddressingMode::RegisterPair {
        // Pair form sets no flags
        let value = registers.read_pair(decoded.source).wrapping_add(1);
        registers.write_pair(decoded.destination, value);
    } else {
        let operand = source_operand_u8(registers, decoded);
        let carry = registers.read_flag(Flag::CY);

        registers.write(Register::F, 0x00);
        let result = add_u8_and_set_flags(operand, 0x01, None, registers);
        registers.write_flag(Flag::CY, carry);
        store_result_u8(result, registers, decoded);
    }
    Ok(false)
}

// --- DEC ---

pub fn decode_dec(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0x35 {
        // DEC (HL)
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Dec,
            addressing_mode: AddressingMode::RegisterIndirectSourceAndDestination,
            source: Register::HL,
            destination: Register::HL,
            ..Default::default()
        };
    } else if (opcode & 0x07) == 0x05 {
        // DEC r
        let target = RegisterBank::from_instruction_source((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Dec,
            addressing_mode: AddressingMode::Register,
            source: target,
            destination: target,
            ..Default::default()
        };
    } else {
        // DEC rr
        let target = RegisterBank::from_instruction_to_pair((opcode >> 4) & 0x03);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Dec,
            addressing_mode: AddressingMode::RegisterPair,
            source: target,
            destination: target,
            ..Default::default()
        };
    }
}

pub fn execute_dec(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    if decoded.addressing_mode == AddressingMode::RegisterPair {
        let value = registers.read_pair(decoded.source).wrapping_sub(1);
        registers.write_pair(decoded.destination, value);
    } else {
        let operand = source_operand_u8(registers, decoded);
        let carry = registers.read_flag(Flag::CY);

        registers.write(Register::F, 0x00);
        let result = sub_u8_and_set_flags(operand, 0x01, None, registers);
        registers.write_flag(Flag::CY, carry);
        store_result_u8(result, registers, decoded);
    }
    Ok(false)
}

// --- LDHL (LD HL, SP+e8) ---

pub fn decode_ldhl(decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Ldhl,
        addressing_mode: AddressingMode::Immediate,
        source: Register::SP,
        destination: Register::HL,
        ..Default::default()
    };
}

pub fn execute_ldhl(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let operand1 = registers.read_pair(decoded.source);
    let operand2 = sign_extend(decoded.memory_operand1);

    registers.write(Register::F, 0x00);
    let result = add_u16_and_set_flags(operand1, operand2, None, registers, FlagMode::Bits16);
    registers.clear_flag(Flag::Z);
    registers.clear_flag(Flag::N);
    registers.write_pair(decoded.destination, result);
    Ok(false)
}
