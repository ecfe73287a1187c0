//! Control flow: JP/JR/CALL/RET/RETI/RST and the privileged JPU.
//!
//! Conditional variants carry a 2-bit selector in the extra operand
//! (NZ=0, Z=1, NC=2, C=3); 0xFF marks the unconditional variant and 0xFE
//! the register-indirect JP (HL). A conditional branch that is not taken
//! reports execution as aborted so the control unit skips writeback
//! (CALL's push); the RET family additionally rebalances SP, which the
//! pop-pair acquisition has already advanced.

use crate::core::error::InstructionError;
use crate::cpu::instruction::{
    AddressingMode, DecodedInstruction, OpcodeType, EXTRA_REGISTER_INDIRECT,
    EXTRA_UNCONDITIONAL,
};
use crate::cpu::instructions::condition_met;
use crate::cpu::registers::{Register, RegisterBank};

// --- JP ---

pub fn decode_jp(opcode: u8, decoded: &mut DecodedInstruction) {
    if opcode == 0xE9 {
        // JP (HL)
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Jp,
            addressing_mode: AddressingMode::Register,
            source: Register::HL,
            destination: Register::PC,
            extra_operand: EXTRA_REGISTER_INDIRECT,
            ..Default::default()
        };
    } else if (opcode & 0x03) == 0x03 {
        // JP nn
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Jp,
            addressing_mode: AddressingMode::ImmediatePair,
            destination: Register::PC,
            extra_operand: EXTRA_UNCONDITIONAL,
            ..Default::default()
        };
    } else {
        // JP cc, nn
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Jp,
            addressing_mode: AddressingMode::ImmediatePair,
            destination: Register::PC,
            extra_operand: (opcode >> 3) & 0x03,
            ..Default::default()
        };
    }
}

fn jump_to_operand_pair(registers: &mut RegisterBank, decoded: &DecodedInstruction) {
    let target = decoded.memory_operand1 as u16 | ((decoded.memory_operand2 as u16) << 8);
    registers.write_pair(decoded.destination, target);
}

pub fn execute_jp(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    match decoded.extra_operand {
        EXTRA_REGISTER_INDIRECT => {
            let target = registers.read_pair(decoded.source);
            registers.write_pair(decoded.destination, target);
            Ok(false)
        }
        EXTRA_UNCONDITIONAL => {
            jump_to_operand_pair(registers, decoded);
            Ok(false)
        }
        selector => {
            if condition_met(registers, selector) {
                jump_to_operand_pair(registers, decoded);
                Ok(false)
            } else {
                Ok(true)
            }
        }
    }
}

// --- JPU (system mode only) ---

pub fn decode_jpu(decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Jpu,
        addressing_mode: AddressingMode::ImmediatePair,
        destination: Register::PC,
        extra_operand: EXTRA_UNCONDITIONAL,
        ..Default::default()
    };
}

/// Privileged jump into user code. The jump itself is an ordinary absolute
/// jump; the ALU raises the user-mode request after execution.
pub fn execute_jpu(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    jump_to_operand_pair(registers, decoded);
    Ok(false)
}

// --- JR ---

pub fn decode_jr(opcode: u8, decoded: &mut DecodedInstruction) {
    let condition = if opcode == 0x18 {
        EXTRA_UNCONDITIONAL
    } else {
        (opcode >> 3) & 0x03
    };
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Jr,
        addressing_mode: AddressingMode::Immediate,
        destination: Register::PC,
        extra_operand: condition,
        ..Default::default()
    };
}

/// Relative jump: signed displacement applied to PC, which already points
/// past the displacement byte.
pub fn execute_jr(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let taken = decoded.extra_operand == EXTRA_UNCONDITIONAL
        || condition_met(registers, decoded.extra_operand);
    if !taken {
        return Ok(true);
    }

    let displacement = decoded.memory_operand1 as i8;
    let target = registers
        .read_pair(decoded.destination)
        .wrapping_add_signed(displacement as i16);
    registers.write_pair(decoded.destination, target);
    Ok(false)
}

// --- CALL ---

pub fn decode_call(opcode: u8, decoded: &mut DecodedInstruction) {
    let condition = if opcode == 0xCD {
        EXTRA_UNCONDITIONAL
    } else {
        (opcode >> 3) & 0x03
    };
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Call,
        addressing_mode: AddressingMode::SubRoutineCall,
        destination: Register::PC,
        extra_operand: condition,
        ..Default::default()
    };
}

/// Jump to the operand address and leave the old PC (already past the
/// operand bytes) in the memory-result slots for the stack push.
pub fn execute_call(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let taken = decoded.extra_operand == EXTRA_UNCONDITIONAL
        || condition_met(registers, decoded.extra_operand);
    if !taken {
        return Ok(true);
    }

    let return_address = registers.read_pair(decoded.destination);
    jump_to_operand_pair(registers, decoded);
    decoded.memory_result1 = (return_address >> 8) as u8;
    decoded.memory_result2 = return_address as u8;
    Ok(false)
}

// --- RET / RETI ---

pub fn decode_ret(opcode: u8, decoded: &mut DecodedInstruction) {
    let condition = if opcode == 0xC9 {
        EXTRA_UNCONDITIONAL
    } else {
        (opcode >> 3) & 0x03
    };
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Ret,
        addressing_mode: AddressingMode::RegisterIndirectSourcePair,
        source: Register::SP,
        destination: Register::PC,
        extra_operand: condition,
        ..Default::default()
    };
}

pub fn execute_ret(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let taken = decoded.extra_operand == EXTRA_UNCONDITIONAL
        || condition_met(registers, decoded.extra_operand);
    if taken {
        jump_to_operand_pair(registers, decoded);
        Ok(false)
    } else {
        // The pop-pair acquisition advanced SP by 2; a refused return must
        // leave the stack where it found it.
        let stack_pointer = registers.read_pair(Register::SP).wrapping_sub(2);
        registers.write_pair(Register::SP, stack_pointer);
        Ok(true)
    }
}

pub fn decode_reti(decoded: &mut DecodedInstruction) {
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Reti,
        addressing_mode: AddressingMode::RegisterIndirectSourcePair,
        source: Register::SP,
        destination: Register::PC,
        extra_operand: EXTRA_UNCONDITIONAL,
        ..Default::default()
    };
}

/// RETI returns unconditionally; the ALU raises the clear-interrupt-status
/// signal afterwards.
pub fn execute_reti(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    jump_to_operand_pair(registers, decoded);
    Ok(false)
}

// --- RST ---

pub fn decode_rst(opcode: u8, decoded: &mut DecodedInstruction) {
    let page = (opcode >> 3) & 0x07;
    *decoded = DecodedInstruction {
        opcode: OpcodeType::Rst,
        addressing_mode: AddressingMode::RegisterIndirectDestinationPair,
        source: Register::PC,
        destination: Register::SP,
        extra_operand: page,
        ..Default::default()
    };
}

/// Restart: push the current PC and jump to the fixed vector `page * 8`.
pub fn execute_rst(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    let return_address = registers.read_pair(Register::PC);
    decoded.memory_result1 = (return_address >> 8) as u8;
    decoded.memory_result2 = return_address as u8;
    registers.write_pair(Register::PC, (decoded.extra_operand as u16) * 8);
    Ok(false)
}
