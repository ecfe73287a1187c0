use gbx_core::cpu::{Register, PRE_OPCODE_DD, PRE_OPCODE_FD};

mod common;
use common::TestSystem;

// --- Register / immediate forms ---

#[test]
fn test_ld_register_register() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::B, 0x42);
    sys.load(0, &[0x48]); // LD C, B

    sys.run_instruction();
    assert_eq!(sys.reg(Register::C), 0x42);
    assert_eq!(sys.reg(Register::B), 0x42);
}

#[test]
fn test_ld_register_immediate() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x3E, 0x99]); // LD A, 0x99

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x99);
    assert_eq!(sys.pair(Register::PC), 0x0002);
}

#[test]
fn test_ld_pair_immediate() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x21, 0x34, 0x12]); // LD HL, 0x1234

    sys.run_instruction();
    assert_eq!(sys.pair(Register::HL), 0x1234);
    assert_eq!(sys.pair(Register::PC), 0x0003);
}

#[test]
fn test_ld_sp_hl() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::HL, 0xFFFE);
    sys.load(0, &[0xF9]); // LD SP, HL

    sys.run_instruction();
    assert_eq!(sys.pair(Register::SP), 0xFFFE);
}

// --- Register-indirect forms ---

#[test]
fn test_ld_register_from_pointer() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::HL, 0x2000);
    sys.load(0x2000, &[0x7B]);
    sys.load(0, &[0x46]); // LD B, (HL)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::B), 0x7B);
}

#[test]
fn test_ld_pointer_from_register() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::D, 0x5A);
    sys.write_pair(Register::HL, 0x2100);
    sys.load(0, &[0x72]); // LD (HL), D

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x2100), 0x5A);
}

#[test]
fn test_ld_pointer_immediate() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::HL, 0x2200);
    sys.load(0, &[0x36, 0x77]); // LD (HL), 0x77

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x2200), 0x77);
}

#[test]
fn test_ld_accumulator_from_secondary_pointers() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::BC, 0x2300);
    sys.write_pair(Register::DE, 0x2400);
    sys.load(0x2300, &[0x11]);
    sys.load(0x2400, &[0x22]);
    sys.load(0, &[0x0A, 0x1A]); // LD A, (BC); LD A, (DE)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x11);
    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x22);
}

#[test]
fn test_ld_secondary_pointers_from_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x33);
    sys.write_pair(Register::BC, 0x2500);
    sys.write_pair(Register::DE, 0x2600);
    sys.load(0, &[0x02, 0x12]); // LD (BC), A; LD (DE), A

    sys.run_instruction();
    sys.run_instruction();
    assert_eq!(sys.read_byte(0x2500), 0x33);
    assert_eq!(sys.read_byte(0x2600), 0x33);
}

// --- Post-increment/decrement forms ---

#[test]
fn test_ld_accumulator_pointer_increment() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::HL, 0x2700);
    sys.load(0x2700, &[0xAA]);
    sys.load(0, &[0x2A]); // LD A, (HL+)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0xAA);
    assert_eq!(sys.pair(Register::HL), 0x2701);
}

#[test]
fn test_ld_accumulator_pointer_decrement() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::HL, 0x2700);
    sys.load(0x2700, &[0xBB]);
    sys.load(0, &[0x3A]); // LD A, (HL-)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0xBB);
    assert_eq!(sys.pair(Register::HL), 0x26FF);
}

#[test]
fn test_ld_pointer_increment_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0xCC);
    sys.write_pair(Register::HL, 0x2800);
    sys.load(0, &[0x22]); // LD (HL+), A

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x2800), 0xCC);
    assert_eq!(sys.pair(Register::HL), 0x2801);
}

#[test]
fn test_ld_pointer_decrement_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0xDD);
    sys.write_pair(Register::HL, 0x2800);
    sys.load(0, &[0x32]); // LD (HL-), A

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x2800), 0xDD);
    assert_eq!(sys.pair(Register::HL), 0x27FF);
}

// --- 0xFF00-page implicit forms ---

#[test]
fn test_ld_accumulator_register_implicit() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::C, 0x10);
    sys.load(0xFF10, &[0x44]);
    sys.load(0, &[0xF2]); // LD A, (C)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x44);
}

#[test]
fn test_ld_register_implicit_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x55);
    sys.write_reg(Register::C, 0x20);
    sys.load(0, &[0xE2]); // LD (C), A

    sys.run_instruction();
    assert_eq!(sys.read_byte(0xFF20), 0x55);
}

#[test]
fn test_ld_accumulator_immediate_implicit() {
    let mut sys = TestSystem::new();
    sys.load(0xFF30, &[0x66]);
    sys.load(0, &[0xF0, 0x30]); // LD A, (0x30)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x66);
}

#[test]
fn test_ld_immediate_implicit_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x77);
    sys.load(0, &[0xE0, 0x40]); // LD (0x40), A

    sys.run_instruction();
    assert_eq!(sys.read_byte(0xFF40), 0x77);
}

// --- Extended (16-bit immediate address) forms ---

#[test]
fn test_ld_accumulator_extended() {
    let mut sys = TestSystem::new();
    sys.load(0x8123, &[0x88]);
    sys.load(0, &[0xFA, 0x23, 0x81]); // LD A, (0x8123)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x88);
    assert_eq!(sys.pair(Register::PC), 0x0003);
}

#[test]
fn test_ld_extended_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x99);
    sys.load(0, &[0xEA, 0x34, 0x82]); // LD (0x8234), A

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x8234), 0x99);
}

#[test]
fn test_ld_extended_stack_pointer() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::SP, 0xBEEF);
    sys.load(0, &[0x08, 0x00, 0x90]); // LD (0x9000), SP

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x9000), 0xEF, "SP low byte first");
    assert_eq!(sys.read_byte(0x9001), 0xBE);
}

// --- Indexed (IX/IY) forms ---

#[test]
fn test_ld_register_indexed_source() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::IX, 0x4000);
    sys.load(0x4005, &[0x12]);
    sys.load(0, &[PRE_OPCODE_DD, 0x46, 0x05]); // LD B, (IX+5)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::B), 0x12);
    assert_eq!(sys.pair(Register::PC), 0x0003);
}

#[test]
fn test_ld_register_indexed_negative_displacement() {
    let mut sys = TestSystem::new();
    sys.write_pair(Register::IY, 0x4000);
    sys.load(0x3FFE, &[0x34]);
    sys.load(0, &[PRE_OPCODE_FD, 0x4E, 0xFE]); // LD C, (IY-2)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::C), 0x34);
}

#[test]
fn test_ld_indexed_destination() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::E, 0x56);
    sys.write_pair(Register::IX, 0x4100);
    sys.load(0, &[PRE_OPCODE_DD, 0x73, 0x03]); // LD (IX+3), E

    sys.run_instruction();
    assert_eq!(sys.read_byte(0x4103), 0x56);
}
