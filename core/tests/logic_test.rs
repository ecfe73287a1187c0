use gbx_core::cpu::{Flag, Register};

mod common;
use common::TestSystem;

#[test]
fn test_and_sets_half_clears_carry() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0b1100_1100);
    sys.write_reg(Register::B, 0b1010_1010);
    sys.set_flags(0b0001_0000); // CY set beforehand
    sys.load(0, &[0xA0]); // AND B

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0b1000_1000);
    assert_eq!(sys.flag(Flag::H), 1, "AND sets H");
    assert_eq!(sys.flag(Flag::CY), 0);
    assert_eq!(sys.flag(Flag::N), 0);
    assert_eq!(sys.flag(Flag::Z), 0);
}

#[test]
fn test_and_zero_result() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x0F);
    sys.load(0, &[0xE6, 0xF0]); // AND 0xF0

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x00);
    assert_eq!(sys.flag(Flag::Z), 1);
}

#[test]
fn test_or_clears_half_and_carry() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0b0000_1111);
    sys.write_reg(Register::C, 0b1111_0000);
    sys.set_flags(0b0011_0000); // H and CY set beforehand
    sys.load(0, &[0xB1]); // OR C

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0xFF);
    assert_eq!(sys.flag(Flag::H), 0);
    assert_eq!(sys.flag(Flag::CY), 0);
    assert_eq!(sys.flag(Flag::Z), 0);
}

#[test]
fn test_xor_self_zeroes_accumulator() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x5A);
    sys.load(0, &[0xAF]); // XOR A

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x00);
    assert_eq!(sys.flag(Flag::Z), 1);
    assert_eq!(sys.flag(Flag::H), 0);
    assert_eq!(sys.flag(Flag::CY), 0);
}

#[test]
fn test_logic_pointer_operand() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0xF0);
    sys.write_pair(Register::HL, 0x2000);
    sys.load(0x2000, &[0x0F]);
    sys.load(0, &[0xB6]); // OR (HL)

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0xFF);
}

#[test]
fn test_cpl_complements_and_preserves_z_cy() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0b0011_0101);
    sys.set_flags(0b1001_0000); // Z and CY set
    sys.load(0, &[0x2F]); // CPL

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0b1100_1010);
    assert_eq!(sys.flag(Flag::N), 1);
    assert_eq!(sys.flag(Flag::H), 1);
    assert_eq!(sys.flag(Flag::Z), 1, "CPL leaves Z");
    assert_eq!(sys.flag(Flag::CY), 1, "CPL leaves CY");
}
