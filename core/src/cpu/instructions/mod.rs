//! Instruction handlers, one module per mnemonic family.
//!
//! Handlers are stateless: `decode` fills the caller's scratch
//! [`DecodedInstruction`] from the raw encoding, `execute` computes the
//! result and flags against the register bank. Handlers never touch memory
//! directly; memory operands arrive pre-populated in the scratch record and
//! memory results leave through it.

pub mod arith;
pub mod bit;
pub mod branch;
pub mod control;
pub mod load_store;
pub mod logic;
pub mod shift;
pub mod stack;

use crate::core::error::InstructionError;
use crate::cpu::instruction::{AddressingMode, DecodedInstruction};
use crate::cpu::registers::{Flag, RegisterBank};

/// Handler selection produced by the opcode decoder. `Ld` covers both `ld`
/// and the system-mode `ldu` (the pre-opcode tells them apart at decode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    Ld,
    Ldhl,
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Or,
    Xor,
    Cp,
    Inc,
    Dec,
    Push,
    Pop,
    Bit,
    Res,
    Set,
    Rlc,
    Rl,
    Rrc,
    Rr,
    Sla,
    Sra,
    Srl,
    Swap,
    Rlca,
    Rla,
    Rrca,
    Rra,
    Daa,
    Cpl,
    Ccf,
    Scf,
    Nop,
    Stop,
    Halt,
    Ei,
    Di,
    Jp,
    Jpu,
    Jr,
    Call,
    Ret,
    Reti,
    Rst,
}

impl Handler {
    /// Populate the decoded-instruction record for this handler. Fails for
    /// degenerate encodings inside an otherwise matching pattern (register
    /// field 6 in a form that has no memory operand).
    pub fn decode(
        self,
        opcode: u8,
        pre_opcode: Option<u8>,
        decoded: &mut DecodedInstruction,
    ) -> Result<(), InstructionError> {
        match self {
            Handler::Ld => return load_store::decode_ld(opcode, pre_opcode, decoded),
            Handler::Ldhl => arith::decode_ldhl(decoded),
            Handler::Add => arith::decode_add(opcode, decoded),
            Handler::Adc => arith::decode_adc(opcode, decoded),
            Handler::Sub => arith::decode_sub(opcode, decoded),
            Handler::Sbc => arith::decode_sbc(opcode, decoded),
            Handler::And => logic::decode_and(opcode, decoded),
            Handler::Or => logic::decode_or(opcode, decoded),
            Handler::Xor => logic::decode_xor(opcode, decoded),
            Handler::Cp => arith::decode_cp(opcode, decoded),
            Handler::Inc => arith::decode_inc(opcode, decoded),
            Handler::Dec => arith::decode_dec(opcode, decoded),
            Handler::Push => stack::decode_push(opcode, decoded),
            Handler::Pop => stack::decode_pop(opcode, decoded),
            Handler::Bit => bit::decode_bit(opcode, decoded),
            Handler::Res => bit::decode_res(opcode, decoded),
            Handler::Set => bit::decode_set(opcode, decoded),
            Handler::Rlc => shift::decode_rlc(opcode, decoded),
            Handler::Rl => shift::decode_rl(opcode, decoded),
            Handler::Rrc => shift::decode_rrc(opcode, decoded),
            Handler::Rr => shift::decode_rr(opcode, decoded),
            Handler::Sla => shift::decode_sla(opcode, decoded),
            Handler::Sra => shift::decode_sra(opcode, decoded),
            Handler::Srl => shift::decode_srl(opcode, decoded),
            Handler::Swap => shift::decode_swap(opcode, decoded),
            Handler::Rlca => shift::decode_rlca(decoded),
            Handler::Rla => shift::decode_rla(decoded),
            Handler::Rrca => shift::decode_rrca(decoded),
            Handler::Rra => shift::decode_rra(decoded),
            Handler::Daa => control::decode_daa(decoded),
            Handler::Cpl => logic::decode_cpl(decoded),
            Handler::Ccf => control::decode_ccf(decoded),
            Handler::Scf => control::decode_scf(decoded),
            Handler::Nop => control::decode_nop(decoded),
            Handler::Stop => control::decode_stop(decoded),
            Handler::Halt => control::decode_halt(decoded),
            Handler::Ei => control::decode_ei(decoded),
            Handler::Di => control::decode_di(decoded),
            Handler::Jp => branch::decode_jp(opcode, decoded),
            Handler::Jpu => branch::decode_jpu(decoded),
            Handler::Jr => branch::decode_jr(opcode, decoded),
            Handler::Call => branch::decode_call(opcode, decoded),
            Handler::Ret => branch::decode_ret(opcode, decoded),
            Handler::Reti => branch::decode_reti(decoded),
            Handler::Rst => branch::decode_rst(opcode, decoded),
        }
        Ok(())
    }

    /// Execute against the register bank. Returns `true` when execution was
    /// aborted (a conditional operation did not take its branch/write path),
    /// telling the control unit to skip writeback.
    pub fn execute(
        self,
        registers: &mut RegisterBank,
        decoded: &mut DecodedInstruction,
    ) -> Result<bool, InstructionError> {
        match self {
            Handler::Ld => load_store::execute_ld(registers, decoded),
            Handler::Ldhl => arith::execute_ldhl(registers, decoded),
            Handler::Add => arith::execute_add(registers, decoded),
            Handler::Adc => arith::execute_adc(registers, decoded),
            Handler::Sub => arith::execute_sub(registers, decoded),
            Handler::Sbc => arith::execute_sbc(registers, decoded),
            Handler::And => logic::execute_and(registers, decoded),
            Handler::Or => logic::execute_or(registers, decoded),
            Handler::Xor => logic::execute_xor(registers, decoded),
            Handler::Cp => arith::execute_cp(registers, decoded),
            Handler::Inc => arith::execute_inc(registers, decoded),
            Handler::Dec => arith::execute_dec(registers, decoded),
            Handler::Push => stack::execute_push(registers, decoded),
            Handler::Pop => stack::execute_pop(registers, decoded),
            Handler::Bit => bit::execute_bit(registers, decoded),
            Handler::Res => bit::execute_res(registers, decoded),
            Handler::Set => bit::execute_set(registers, decoded),
            Handler::Rlc => shift::execute_rlc(registers, decoded),
            Handler::Rl => shift::execute_rl(registers, decoded),
            Handler::Rrc => shift::execute_rrc(registers, decoded),
            Handler::Rr => shift::execute_rr(registers, decoded),
            Handler::Sla => shift::execute_sla(registers, decoded),
            Handler::Sra => shift::execute_sra(registers, decoded),
            Handler::Srl => shift::execute_srl(registers, decoded),
            Handler::Swap => shift::execute_swap(registers, decoded),
            Handler::Rlca => shift::execute_rlca(registers, decoded),
            Handler::Rla => shift::execute_rla(registers, decoded),
            Handler::Rrca => shift::execute_rrca(registers, decoded),
            Handler::Rra => shift::execute_rra(registers, decoded),
            Handler::Daa => control::execute_daa(registers, decoded),
            Handler::Cpl => logic::execute_cpl(registers, decoded),
            Handler::Ccf => control::execute_ccf(registers, decoded),
            Handler::Scf => control::execute_scf(registers, decoded),
            Handler::Nop => control::execute_nop(registers, decoded),
            Handler::Stop => control::execute_stop(registers, decoded),
            Handler::Halt => control::execute_halt(registers, decoded),
            Handler::Ei => control::execute_ei(registers, decoded),
            Handler::Di => control::execute_di(registers, decoded),
            Handler::Jp => branch::execute_jp(registers, decoded),
            Handler::Jpu => branch::execute_jpu(registers, decoded),
            Handler::Jr => branch::execute_jr(registers, decoded),
            Handler::Call => branch::execute_call(registers, decoded),
            Handler::Ret => branch::execute_ret(registers, decoded),
            Handler::Reti => branch::execute_reti(registers, decoded),
            Handler::Rst => branch::execute_rst(registers, decoded),
        }
    }
}

/// Flag derivation width for the shared adder: carries taken at bits 3/7
/// or at bits 11/15.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FlagMode {
    Bits8,
    Bits16,
}

/// 16-bit operations on register pairs derive H/CY from bits 11/15;
/// everything else (including ADD SP,e8) keeps the 8-bit positions.
pub(crate) fn decide_flag_mode(decoded: &DecodedInstruction) -> FlagMode {
    if decoded.addressing_mode == AddressingMode::RegisterPair {
        FlagMode::Bits16
    } else {
        FlagMode::Bits8
    }
}

/// Bit-serial 8-bit addition. H and CY are taken from the carry chain at
/// bits 3 and 7; Z is set on a zero result and N cleared. Flags are only
/// ever set, so callers clear F (or the relevant bits) first.
pub(crate) fn add_u8_and_set_flags(
    operand1: u8,
    operand2: u8,
    carry: Option<u8>,
    registers: &mut RegisterBank,
) -> u8 {
    let mut result: u8 = 0;
    let mut carry_in = carry.unwrap_or(0) & 0x01;

    for i in 0..8 {
        let bit1 = (operand1 >> i) & 0x01;
        let bit2 = (operand2 >> i) & 0x01;
        let result_bit = (bit1 ^ bit2) ^ carry_in;
        carry_in = (bit1 & bit2) | (carry_in & (bit1 ^ bit2));

        if i == 3 && carry_in != 0 {
            registers.set_flag(Flag::H);
        } else if i == 7 && carry_in != 0 {
            registers.set_flag(Flag::CY);
        }

        result |= result_bit << i;
    }

    if result == 0 {
        registers.set_flag(Flag::Z);
    }
    registers.clear_flag(Flag::N);

    result
}

/// Bit-serial 16-bit addition; carry taps selected by `mode`.
pub(crate) fn add_u16_and_set_flags(
    operand1: u16,
    operand2: u16,
    carry: Option<u8>,
    registers: &mut RegisterBank,
    mode: FlagMode,
) -> u16 {
    let mut result: u16 = 0;
    let mut carry_in = (carry.unwrap_or(0) & 0x01) as u16;

    let (half_tap, carry_tap) = match mode {
        FlagMode::Bits16 => (11, 15),
        FlagMode::Bits8 => (3, 7),
    };

    for i in 0..16 {
        let bit1 = (operand1 >> i) & 0x01;
        let bit2 = (operand2 >> i) & 0x01;
        let result_bit = (bit1 ^ bit2) ^ carry_in;
        carry_in = (bit1 & bit2) | (carry_in & (bit1 ^ bit2));

        if i == half_tap && carry_in != 0 {
            registers.set_flag(Flag::H);
        } else if i == carry_tap && carry_in != 0 {
            registers.set_flag(Flag::CY);
        }

        result |= result_bit << i;
    }

    if result == 0 {
        registers.set_flag(Flag::Z);
    }
    registers.clear_flag(Flag::N);

    result
}

/// Bit-serial 8-bit subtraction. H and CY reflect borrows out of bits 3
/// and 7; Z is set on a zero result and N set.
pub(crate) fn sub_u8_and_set_flags(
    operand1: u8,
    operand2: u8,
    borrow: Option<u8>,
    registers: &mut RegisterBank,
) -> u8 {
    let mut result: u8 = 0;
    let mut borrow_in = borrow.unwrap_or(0) & 0x01;

    for i in 0..8 {
        let bit1 = (operand1 >> i) & 0x01;
        let bit2 = (operand2 >> i) & 0x01;
        let result_bit = (bit1 ^ bit2) ^ borrow_in;
        borrow_in = (!bit1 & bit2 & 0x01) | (!(bit1 ^ bit2) & borrow_in & 0x01);

        if i == 3 && borrow_in != 0 {
            registers.set_flag(Flag::H);
        } else if i == 7 && borrow_in != 0 {
            registers.set_flag(Flag::CY);
        }

        result |= result_bit << i;
    }

    if result == 0 {
        registers.set_flag(Flag::Z);
    }
    registers.set_flag(Flag::N);

    result
}

/// 8-bit source operand: the source register in register mode, the first
/// memory operand otherwise.
pub(crate) fn source_operand_u8(registers: &RegisterBank, decoded: &DecodedInstruction) -> u8 {
    if decoded.addressing_mode == AddressingMode::Register {
        registers.read(decoded.source)
    } else {
        decoded.memory_operand1
    }
}

/// 16-bit source operand: the source pair in register-pair mode, the
/// sign-extended first memory operand otherwise.
pub(crate) fn source_operand_u16(registers: &RegisterBank, decoded: &DecodedInstruction) -> u16 {
    if decoded.addressing_mode == AddressingMode::RegisterPair {
        registers.read_pair(decoded.source)
    } else {
        sign_extend(decoded.memory_operand1)
    }
}

pub(crate) fn sign_extend(operand: u8) -> u16 {
    if operand & 0x80 != 0 {
        0xFF00 | operand as u16
    } else {
        operand as u16
    }
}

/// Evaluate a 2-bit condition selector: NZ=0, Z=1, NC=2, C=3.
pub(crate) fn condition_met(registers: &RegisterBank, selector: u8) -> bool {
    let z = registers.read_flag(Flag::Z);
    let cy = registers.read_flag(Flag::CY);

    match selector {
        0x00 => z == 0,
        0x01 => z == 1,
        0x02 => cy == 0,
        0x03 => cy == 1,
        _ => unreachable!("invalid condition selector {}", selector),
    }
}

/// Store an 8-bit result into the destination register (register mode) or
/// into the first memory result slot for the writeback phase.
pub(crate) fn store_result_u8(
    result: u8,
    registers: &mut RegisterBank,
    decoded: &mut DecodedInstruction,
) {
    if decoded.addressing_mode == AddressingMode::Register {
        registers.write(decoded.destination, result);
    } else {
        decoded.memory_result1 = result;
    }
}
