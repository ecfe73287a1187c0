//! Instruction data model: mnemonics, addressing modes, the decoded
//! instruction scratch record and the static addressing-mode trait table
//! that drives the control unit.

use crate::cpu::registers::Register;

/// Pre-opcode bytes that switch the decode table before the primary opcode
/// byte is interpreted.
pub const PRE_OPCODE_CB: u8 = 0xCB;
pub const PRE_OPCODE_DD: u8 = 0xDD;
pub const PRE_OPCODE_FD: u8 = 0xFD;
/// System-mode operations (GBX extension).
pub const PRE_OPCODE_FC: u8 = 0xFC;

/// True for bytes that prefix a two-byte instruction.
pub fn is_pre_opcode(byte: u8) -> bool {
    matches!(
        byte,
        PRE_OPCODE_CB | PRE_OPCODE_DD | PRE_OPCODE_FD | PRE_OPCODE_FC
    )
}

/// Sentinel extra-operand value: unconditional control-flow variant.
pub const EXTRA_UNCONDITIONAL: u8 = 0xFF;
/// Sentinel extra-operand value: register-indirect JP (HL).
pub const EXTRA_REGISTER_INDIRECT: u8 = 0xFE;

/// Instruction mnemonics. `Ldu` and `Jpu` exist only in system mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodeType {
    Unknown,
    Ld,
    Ldu,
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

/// Classification of how an instruction's operands are located. Doubles as
/// the lookup key into the static [`AddressingModeTraits`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Register,
    Immediate,
    /// One immediate byte applied to a 16-bit destination (ADD SP, e8).
    SingleImmediatePair,
    RegisterIndexedSource,
    RegisterIndexedDestination,
    RegisterIndirectSource,
    RegisterIndirectDestination,
    RegisterIndirectSourceAndDestination,
    ExtendedSource,
    ExtendedDestination,
    ImmediateRegisterIndirect,
    RegisterIndirectSourceIncrement,
    RegisterIndirectSourceDecrement,
    RegisterIndirectDestinationIncrement,
    RegisterIndirectDestinationDecrement,
    RegisterImplicitSource,
    RegisterImplicitDestination,
    ImmediateImplicitSource,
    ImmediateImplicitDestination,
    ImmediatePair,
    RegisterPair,
    RegisterIndirectSourcePair,
    RegisterIndirectDestinationPair,
    ExtendedDestinationPair,
    SubRoutineCall,
}

/// Canonical record produced by every handler's decode step and threaded
/// through operand acquisition, execution and writeback of one cycle. Fully
/// overwritten on each decode; no identity across cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub opcode: OpcodeType,
    pub addressing_mode: AddressingMode,
    pub memory_operand1: u8,
    pub memory_operand2: u8,
    pub memory_operand3: u8,
    pub source: Register,
    pub destination: Register,
    pub memory_result1: u8,
    pub memory_result2: u8,
    /// Bit index for BIT/SET/RES, condition selector for conditional
    /// control flow (NZ=0, Z=1, NC=2, C=3), restart page for RST, or one of
    /// the sentinels above.
    pub extra_operand: u8,
}

impl Default for DecodedInstruction {
    fn default() -> Self {
        Self {
            opcode: OpcodeType::Unknown,
            addressing_mode: AddressingMode::Register,
            memory_operand1: 0x00,
            memory_operand2: 0x00,
            memory_operand3: 0x00,
            source: Register::NoRegister,
            destination: Register::NoRegister,
            memory_result1: 0x00,
            memory_result2: 0x00,
            extra_operand: 0x00,
        }
    }
}

/// Static per-addressing-mode record telling the control unit which operand
/// acquisition and writeback substeps apply. Exactly one of the writeback
/// flags may be set per mode.
#[derive(Clone, Copy, Debug)]
pub struct AddressingModeTraits {
    pub acquire_operand1: bool,
    pub acquire_operand1_from_pc: bool,
    pub acquire_operand1_directly: bool,
    pub acquire_operand1_implicitly: bool,
    pub increment_source: bool,
    pub decrement_source: bool,
    pub increment_destination: bool,
    pub decrement_destination: bool,
    pub acquire_operand2: bool,
    pub acquire_operand2_from_pc: bool,
    pub acquire_operand2_at_composed_address: bool,
    pub acquire_operand2_implicitly: bool,
    pub acquire_operand2_directly: bool,
    pub increment_source_operand2: bool,
    pub acquire_operand3: bool,
    pub write_back: bool,
    pub write_back_at_operand_address: bool,
    pub write_back_at_register_address: bool,
    pub write_back_at_composed_address: bool,
    pub write_back_at_implicit_register: bool,
    pub write_back_at_implicit_immediate: bool,
    pub write_back_pair_at_register_address: bool,
    pub write_back_pair_at_immediate_address: bool,
}

const NO_STEPS: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: false,
    acquire_operand1_from_pc: false,
    acquire_operand1_directly: false,
    acquire_operand1_implicitly: false,
    increment_source: false,
    decrement_source: false,
    increment_destination: false,
    decrement_destination: false,
    acquire_operand2: false,
    acquire_operand2_from_pc: false,
    acquire_operand2_at_composed_address: false,
    acquire_operand2_implicitly: false,
    acquire_operand2_directly: false,
    increment_source_operand2: false,
    acquire_operand3: false,
    write_back: false,
    write_back_at_operand_address: false,
    write_back_at_register_address: false,
    write_back_at_composed_address: false,
    write_back_at_implicit_register: false,
    write_back_at_implicit_immediate: false,
    write_back_pair_at_register_address: false,
    write_back_pair_at_immediate_address: false,
};

const REGISTER: AddressingModeTraits = NO_STEPS;

const IMMEDIATE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    ..NO_STEPS
};

const SINGLE_IMMEDIATE_PAIR: AddressingModeTraits = IMMEDIATE;

const REGISTER_INDEXED_SOURCE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_at_composed_address: true,
    ..NO_STEPS
};

const REGISTER_INDEXED_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    write_back: true,
    write_back_at_operand_address: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_SOURCE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_directly: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    write_back: true,
    write_back_at_register_address: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_SOURCE_AND_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_directly: true,
    write_back: true,
    write_back_at_register_address: true,
    ..NO_STEPS
};

const EXTENDED_SOURCE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_from_pc: true,
    acquire_operand3: true,
    ..NO_STEPS
};

const EXTENDED_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_from_pc: true,
    write_back: true,
    write_back_at_composed_address: true,
    ..NO_STEPS
};

const IMMEDIATE_REGISTER_INDIRECT: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    write_back: true,
    write_back_at_register_address: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_SOURCE_INCREMENT: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_directly: true,
    increment_source: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_SOURCE_DECREMENT: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_directly: true,
    decrement_source: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_DESTINATION_INCREMENT: AddressingModeTraits = AddressingModeTraits {
    write_back: true,
    write_back_at_register_address: true,
    increment_destination: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_DESTINATION_DECREMENT: AddressingModeTraits = AddressingModeTraits {
    write_back: true,
    write_back_at_register_address: true,
    decrement_destination: true,
    ..NO_STEPS
};

const REGISTER_IMPLICIT_SOURCE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_implicitly: true,
    ..NO_STEPS
};

const REGISTER_IMPLICIT_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    write_back: true,
    write_back_at_implicit_register: true,
    ..NO_STEPS
};

const IMMEDIATE_IMPLICIT_SOURCE: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_implicitly: true,
    ..NO_STEPS
};

const IMMEDIATE_IMPLICIT_DESTINATION: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    write_back: true,
    write_back_at_implicit_immediate: true,
    ..NO_STEPS
};

const IMMEDIATE_PAIR: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_from_pc: true,
    ..NO_STEPS
};

const REGISTER_PAIR: AddressingModeTraits = NO_STEPS;

const REGISTER_INDIRECT_SOURCE_PAIR: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_directly: true,
    increment_source: true,
    acquire_operand2: true,
    acquire_operand2_directly: true,
    increment_source_operand2: true,
    ..NO_STEPS
};

const REGISTER_INDIRECT_DESTINATION_PAIR: AddressingModeTraits = AddressingModeTraits {
    write_back: true,
    write_back_pair_at_register_address: true,
    ..NO_STEPS
};

const EXTENDED_DESTINATION_PAIR: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_from_pc: true,
    write_back: true,
    write_back_pair_at_immediate_address: true,
    ..NO_STEPS
};

const SUB_ROUTINE_CALL: AddressingModeTraits = AddressingModeTraits {
    acquire_operand1: true,
    acquire_operand1_from_pc: true,
    acquire_operand2: true,
    acquire_operand2_from_pc: true,
    write_back: true,
    write_back_pair_at_register_address: true,
    ..NO_STEPS
};

impl AddressingMode {
    /// Static trait record for this mode.
    pub fn traits(self) -> &'static AddressingModeTraits {
        match self {
            AddressingMode::Register => &REGISTER,
            AddressingMode::Immediate => &IMMEDIATE,
            AddressingMode::SingleImmediatePair => &SINGLE_IMMEDIATE_PAIR,
            AddressingMode::RegisterIndexedSource => &REGISTER_INDEXED_SOURCE,
            AddressingMode::RegisterIndexedDestination => &REGISTER_INDEXED_DESTINATION,
            AddressingMode::RegisterIndirectSource => &REGISTER_INDIRECT_SOURCE,
            AddressingMode::RegisterIndirectDestination => &REGISTER_INDIRECT_DESTINATION,
            AddressingMode::RegisterIndirectSourceAndDestination => {
                &REGISTER_INDIRECT_SOURCE_AND_DESTINATION
            }
            AddressingMode::ExtendedSource => &EXTENDED_SOURCE,
            AddressingMode::ExtendedDestination => &EXTENDED_DESTINATION,
            AddressingMode::ImmediateRegisterIndirect => &IMMEDIATE_REGISTER_INDIRECT,
            AddressingMode::RegisterIndirectSourceIncrement => {
                &REGISTER_INDIRECT_SOURCE_INCREMENT
            }
            AddressingMode::RegisterIndirectSourceDecrement => {
                &REGISTER_INDIRECT_SOURCE_DECREMENT
            }
            AddressingMode::RegisterIndirectDestinationIncrement => {
                &REGISTER_INDIRECT_DESTINATION_INCREMENT
            }
            AddressingMode::RegisterIndirectDestinationDecrement => {
                &REGISTER_INDIRECT_DESTINATION_DECREMENT
            }
            AddressingMode::RegisterImplicitSource => &REGISTER_IMPLICIT_SOURCE,
            AddressingMode::RegisterImplicitDestination => &REGISTER_IMPLICIT_DESTINATION,
            AddressingMode::ImmediateImplicitSource => &IMMEDIATE_IMPLICIT_SOURCE,
            AddressingMode::ImmediateImplicitDestination => &IMMEDIATE_IMPLICIT_DESTINATION,
            AddressingMode::ImmediatePair => &IMMEDIATE_PAIR,
            AddressingMode::RegisterPair => &REGISTER_PAIR,
            AddressingMode::RegisterIndirectSourcePair => &REGISTER_INDIRECT_SOURCE_PAIR,
            AddressingMode::RegisterIndirectDestinationPair => {
                &REGISTER_INDIRECT_DESTINATION_PAIR
            }
            AddressingMode::ExtendedDestinationPair => &EXTENDED_DESTINATION_PAIR,
            AddressingMode::SubRoutineCall => &SUB_ROUTINE_CALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: &[AddressingMode] = &[
        AddressingMode::Register,
        AddressingMode::Immediate,
        AddressingMode::SingleImmediatePair,
        AddressingMode::RegisterIndexedSource,
        AddressingMode::RegisterIndexedDestination,
        AddressingMode::RegisterIndirectSource,
        AddressingMode::RegisterIndirectDestination,
        AddressingMode::RegisterIndirectSourceAndDestination,
        AddressingMode::ExtendedSource,
        AddressingMode::ExtendedDestination,
        AddressingMode::ImmediateRegisterIndirect,
        AddressingMode::RegisterIndirectSourceIncrement,
        AddressingMode::RegisterIndirectSourceDecrement,
        AddressingMode::RegisterIndirectDestinationIncrement,
        AddressingMode::RegisterIndirectDestinationDecrement,
        AddressingMode::RegisterImplicitSource,
        AddressingMode::RegisterImplicitDestination,
        AddressingMode::ImmediateImplicitSource,
        AddressingMode::ImmediateImplicitDestination,
        AddressingMode::ImmediatePair,
        AddressingMode::RegisterPair,
        AddressingMode::RegisterIndirectSourcePair,
        AddressingMode::RegisterIndirectDestinationPair,
        AddressingMode::ExtendedDestinationPair,
        AddressingMode::SubRoutineCall,
    ];

    #[test]
    fn writeback_paths_are_mutually_exclusive() {
        for mode in ALL_MODES {
            let t = mode.traits();
            let set = [
                t.write_back_at_operand_address,
                t.write_back_at_register_address,
                t.write_back_at_composed_address,
                t.write_back_at_implicit_register,
                t.write_back_at_implicit_immediate,
                t.write_back_pair_at_register_address,
                t.write_back_pair_at_immediate_address,
            ]
            .iter()
            .filter(|f| **f)
            .count();
            assert!(set <= 1, "{:?} selects {} writeback paths", mode, set);
            assert_eq!(t.write_back, set == 1, "{:?} write_back summary flag", mode);
        }
    }

    #[test]
    fn acquisition_substeps_require_master_flag() {
        for mode in ALL_MODES {
            let t = mode.traits();
            if t.acquire_operand1_from_pc || t.acquire_operand1_directly || t.acquire_operand1_implicitly {
                assert!(t.acquire_operand1, "{:?} operand1 master flag", mode);
            }
            if t.acquire_operand2_from_pc
                || t.acquire_operand2_at_composed_address
                || t.acquire_operand2_implicitly
                || t.acquire_operand2_directly
            {
                assert!(t.acquire_operand2, "{:?} operand2 master flag", mode);
            }
        }
    }
}
