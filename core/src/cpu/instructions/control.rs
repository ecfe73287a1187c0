//! Fixed-shape instructions: NOP/STOP/HALT/EI/DI, the carry-flag pair
//! SCF/CCF, and DAA.
//!
//! HALT/STOP/EI/DI have trivial executes here; their effects surface as ALU
//! execution signals consumed by the machine layer.

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction, OpcodeType};
use crate::cpu::registers::{Flag, Register, RegisterBank};

fn decode_plain(kind: OpcodeType, decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: kind,
        addressing_mode: AddressingMode::Register,
        ..Default::default()
    };
}

pub fn decode_nop(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Nop, decoded);
}

pub fn execute_nop(
    _registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    Ok(false)
}

pub fn decode_stop(decoded: &mut DecodedInstruction) {
    // STOP carries one operand byte that must be zero.
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Stop,
        addressing_mode: AddressingMode::Immediate,
        ..Default::default()
    };
}

/// STOP validates before any register mutation: a nonzero operand byte is a
/// malformed encoding and fails without side effects.
pub fn execute_stop(
    _registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    if decoded.memory_operand1 != 0x00 {
        return Err(InstructionError::MalformedInstruction(
            "invalid STOP instruction operand",
        ));
    }
    Ok(false)
}

pub fn decode_halt(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Halt, decoded);
}

pub fn execute_halt(
    _registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    Ok(false)
}

pub fn decode_ei(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Ei, decoded);
}

pub fn execute_ei(
    _registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    Ok(false)
}

pub fn decode_di(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Di, decoded);
}

pub fn execute_di(
    _registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    Ok(false)
}

pub fn decode_scf(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Scf, decoded);
}

/// SCF sets CY and clears H and N; Z is untouched.
pub fn execute_scf(
    registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    registers.set_flag(Flag::CY);
    registers.clear_flag(Flag::H);
    registers.clear_flag(Flag::N);
    Ok(false)
}

pub fn decode_ccf(decoded: &mut DecodedInstruction) {
    decode_plain(OpcodeType::Ccf, decoded);
}

/// CCF complements CY and clears H and N; Z is untouched.
pub fn execute_ccf(
    registers: &mut RegisterBank,
    _decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let carry = registers.read_flag(Flag::CY);
    registers.write_flag(Flag::CY, carry ^ 0x01);
    registers.clear_flag(Flag::H);
    registers.clear_flag(Flag::N);
    Ok(false)
}

pub fn decode_daa(decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Daa,
        addressing_mode: AddressingMode::Register,
        source: Register::A,
        destination: Register::A,
        ..Default::default()
    };
}

/// Decimal adjust after a BCD addition or subtraction, steered by N, H and
/// CY left behind by the previous arithmetic instruction.
pub fn execute_daa(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let value = registers.read(decoded.source);
    let subtracting = registers.read_flag(Flag::N) == 0x01;
    let half_carry = registers.read_flag(Flag::H) == 0x01;
    let carry = registers.read_flag(Flag::CY) == 0x01;

    // The correction is accumulated against the pre-adjust value; the
    // nibble tests must not observe each other's adjustment.
    let mut correction: u8 = if carry { 0x60 } else { 0x00 };
    if half_carry {
        correction |= 0x06;
    }
    let result = if subtracting {
        value.wrapping_sub(correction)
    } else {
        if (value & 0x0F) > 0x09 {
            correction |= 0x06;
        }
        if value > 0x99 {
            correction |= 0x60;
        }
        value.wrapping_add(correction)
    };

    registers.write_flag(Flag::CY, if correction >= 0x60 { 0x01 } else { 0x00 });
    registers.write_flag(Flag::Z, if result == 0 { 0x01 } else { 0x00 });
    registers.clear_flag(Flag::H);
    registers.write(decoded.destination, result);
    Ok(false)
}
