//! The LD family, covering every addressing mode of the data-movement
//! instructions, plus the system-mode LDU reinterpretation reached through
//! the FC pre-opcode (and the DD/FD indexed loads).

use crate::core::error::InstructionError;
use crate::cpu::instruction::{
    AddressingMode, DecodedInstruction, OpcodeType, PRE_OPCODE_DD, PRE_OPCODE_FD,
};
use crate::cpu::registers::{Register, RegisterBank};

/// 3-bit register field value that addresses a memory operand instead of a
/// register.
const MEMORY_OPERAND: u8 = 0x06;

fn ld_kind(pre_opcode: Option<u8>) -> OpcodeType {
    if pre_opcode.is_none() {
        OpcodeType::Ld
    } else {
        OpcodeType::Ldu
    }
}

fn unknown(opcode: u8, pre_opcode: Option<u8>) -> InstructionError {
    InstructionError::UnknownInstruction { opcode, pre_opcode }
}

pub fn decode_ld(
    opcode: u8,
    pre_opcode: Option<u8>,
    decoded: &mut DecodedInstruction,
) -> Result<(), InstructionError> {
    match pre_opcode {
        Some(PRE_OPCODE_DD) | Some(PRE_OPCODE_FD) => {
            decode_indexed(opcode, pre_opcode, decoded)
        }
        _ => decode_base(opcode, pre_opcode, decoded),
    }
}

fn decode_indexed(
    opcode: u8,
    pre_opcode: Option<u8>,
    decoded: &mut DecodedInstruction,
) -> Result<(), InstructionError> {
    let index_register = if pre_opcode == Some(PRE_OPCODE_DD) {
        Register::IX
    } else {
        Register::IY
    };

    if (opcode >> 6) == 0x01 && (opcode & 0x07) == MEMORY_OPERAND {
        // LD r, (IX|IY + d). Destination field 6 has no register.
        if ((opcode >> 3) & 0x07) == MEMORY_OPERAND {
            return Err(unknown(opcode, pre_opcode));
        }
        let destination = RegisterBank::from_instruction_destination((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Ld,
            addressing_mode: AddressingMode::RegisterIndexedSource,
            source: index_register,
            destination,
            ..Default::default()
        };
        Ok(())
    } else if (opcode >> 3) == 0x0E {
        // LD (IX|IY + d), r
        if (opcode & 0x07) == MEMORY_OPERAND {
            return Err(unknown(opcode, pre_opcode));
        }
        let source = RegisterBank::from_instruction_source(opcode & 0x07);
        *decoded = DecodedInstruction {
            opcode: OpcodeType::Ld,
            addressing_mode: AddressingMode::RegisterIndexedDestination,
            source,
            destination: index_register,
            ..Default::default()
        };
        Ok(())
    } else {
        Err(unknown(opcode, pre_opcode))
    }
}

fn decode_base(
    opcode: u8,
    pre_opcode: Option<u8>,
    decoded: &mut DecodedInstruction,
) -> Result<(), InstructionError> {
    let kind = ld_kind(pre_opcode);

    if opcode == 0xF2 {
        // LD A, (C)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterImplicitSource,
            source: Register::C,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0xE2 {
        // LD (C), A
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterImplicitDestination,
            source: Register::A,
            destination: Register::C,
            ..Default::default()
        };
    } else if opcode == 0xF0 {
        // LD A, (n)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ImmediateImplicitSource,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0xE0 {
        // LD (n), A
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ImmediateImplicitDestination,
            source: Register::A,
            ..Default::default()
        };
    } else if opcode == 0xFA {
        // LD A, (nn)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ExtendedSource,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0xEA {
        // LD (nn), A
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ExtendedDestination,
            source: Register::A,
            ..Default::default()
        };
    } else if opcode == 0x08 {
        // LD (nn), SP
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ExtendedDestinationPair,
            source: Register::SP,
            ..Default::default()
        };
    } else if opcode == 0x2A {
        // LD A, (HL+)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSourceIncrement,
            source: Register::HL,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0x3A {
        // LD A, (HL-)
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSourceDecrement,
            source: Register::HL,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0x02 || opcode == 0x12 {
        // LD (BC|DE), A
        let destination = if ((opcode >> 4) & 0x0F) == 0x01 {
            Register::DE
        } else {
            Register::BC
        };
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectDestination,
            source: Register::A,
            destination,
            ..Default::default()
        };
    } else if opcode == 0x22 {
        // LD (HL+), A
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectDestinationIncrement,
            source: Register::A,
            destination: Register::HL,
            ..Default::default()
        };
    } else if opcode == 0x32 {
        // LD (HL-), A
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectDestinationDecrement,
            source: Register::A,
            destination: Register::HL,
            ..Default::default()
        };
    } else if opcode == 0x36 {
        // LD (HL), n
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ImmediateRegisterIndirect,
            destination: Register::HL,
            ..Default::default()
        };
    } else if opcode == 0x0A || opcode == 0x1A {
        // LD A, (BC|DE)
        let source = if ((opcode >> 3) & 0x07) == 0x01 {
            Register::BC
        } else {
            Register::DE
        };
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSource,
            source,
            destination: Register::A,
            ..Default::default()
        };
    } else if opcode == 0xF9 {
        // LD SP, HL
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterPair,
            source: Register::HL,
            destination: Register::SP,
            ..Default::default()
        };
    } else if opcode == 0x76 {
        // Degenerate (HL),(HL) encoding, reachable only through the
        // system-mode prefix (unprefixed 0x76 is HALT).
        return Err(unknown(opcode, pre_opcode));
    } else if (opcode >> 6) == 0x00 && (opcode & 0x07) == MEMORY_OPERAND {
        // LD r, n
        let destination = RegisterBank::from_instruction_destination((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Immediate,
            destination,
            ..Default::default()
        };
    } else if (opcode & 0x40) != 0 && (opcode & 0x07) == MEMORY_OPERAND {
        // LD r, (HL)
        let destination = RegisterBank::from_instruction_destination((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectSource,
            source: Register::HL,
            destination,
            ..Default::default()
        };
    } else if (opcode >> 6) == 0x00 && (opcode & 0x07) == 0x01 {
        // LD rr, nn
        let destination = RegisterBank::from_instruction_to_pair((opcode >> 4) & 0x03);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::ImmediatePair,
            destination,
            ..Default::default()
        };
    } else if (opcode >> 3) == 0x0E {
        // LD (HL), r
        let source = RegisterBank::from_instruction_source(opcode & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::RegisterIndirectDestination,
            source,
            destination: Register::HL,
            ..Default::default()
        };
    } else if (opcode & 0x40) != 0 && (opcode & 0x07) != MEMORY_OPERAND {
        // LD r, r'
        let source = RegisterBank::from_instruction_source(opcode & 0x07);
        let destination = RegisterBank::from_instruction_destination((opcode >> 3) & 0x07);
        *decoded = DecodedInstruction {
            opcode: kind,
            addressing_mode: AddressingMode::Register,
            source,
            destination,
            ..Default::default()
        };
    } else {
        return Err(unknown(opcode, pre_opcode));
    }

    Ok(())
}

/// Move the already-acquired operand (or the source register) into its
/// destination: a register write for source-side modes, a memory-result
/// slot for destination-side modes.
pub fn execute_ld(
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) -> Result<bool, InstructionError> {
    match decoded.addressing_mode {
        AddressingMode::Immediate
        | AddressingMode::RegisterIndirectSource
        | AddressingMode::RegisterIndirectSourceIncrement
        | AddressingMode::RegisterIndirectSourceDecrement
        | AddressingMode::RegisterImplicitSource => {
            registers.write(decoded.destination, decoded.memory_operand1);
        }
        AddressingMode::ImmediatePair => {
            let value =
                decoded.memory_operand1 as u16 | ((decoded.memory_operand2 as u16) << 8);
            registers.write_pair(decoded.destination, value);
        }
        AddressingMode::RegisterIndexedSource | AddressingMode::ImmediateImplicitSource => {
            registers.write(decoded.destination, decoded.memory_operand2);
        }
        AddressingMode::ExtendedSource => {
            registers.write(decoded.destination, decoded.memory_operand3);
        }
        AddressingMode::Register => {
            let value = registers.read(decoded.source);
            registers.write(decoded.destination, value);
        }
        AddressingMode::RegisterIndirectDestination
        | AddressingMode::RegisterIndexedDestination
        | AddressingMode::ExtendedDestination
        | AddressingMode::RegisterIndirectDestinationIncrement
        | AddressingMode::RegisterIndirectDestinationDecrement
        | AddressingMode::RegisterImplicitDestination
        | AddressingMode::ImmediateImplicitDestination => {
            decoded.memory_result1 = registers.read(decoded.source);
        }
        AddressingMode::ImmediateRegisterIndirect => {
            decoded.memory_result1 = decoded.memory_operand1;
        }
        AddressingMode::RegisterPair => {
            let value = registers.read_pair(decoded.source);
            registers.write_pair(decoded.destination, value);
        }
        AddressingMode::ExtendedDestinationPair => {
            let value = registers.read_pair(decoded.source);
            decoded.memory_result1 = value as u8;
            decoded.memory_result2 = (value >> 8) as u8;
        }
        _ => unreachable!("LD decoded with {:?}", decoded.addressing_mode),
    }
    Ok(false)
}
