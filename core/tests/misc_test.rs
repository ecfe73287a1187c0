use gbx_core::core::{CoreError, InstructionError};
use gbx_core::cpu::{Flag, Register};

mod common;
use common::TestSystem;

#[test]
fn test_nop_advances_pc_only() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x00]); // NOP

    sys.run_instruction();
    assert_eq!(sys.pair(Register::PC), 0x0001);
    assert_eq!(sys.reg(Register::F), 0x00);
}

#[test]
fn test_stop_with_zero_operand_is_accepted() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x10, 0x00]); // STOP 0

    sys.run_instruction();
    assert!(sys.cpu.stop_signal());
    assert_eq!(sys.pair(Register::PC), 0x0002);
}

#[test]
fn test_stop_with_nonzero_operand_fails() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x10, 0x01]); // STOP with malformed operand

    let result = sys.try_run_instruction();
    assert!(matches!(
        result,
        Err(CoreError::Instruction(
            InstructionError::MalformedInstruction(_)
        ))
    ));
    assert!(!sys.cpu.stop_signal(), "no stop signal on malformed STOP");
}

#[test]
fn test_halt_raises_signal() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0x76]); // HALT

    sys.run_instruction();
    assert!(sys.cpu.halt_signal());
}

#[test]
fn test_ei_di_latch() {
    let mut sys = TestSystem::new();
    sys.load(0, &[0xFB, 0x00, 0xF3]); // EI; NOP; DI

    sys.run_instruction();
    assert!(sys.cpu.interrupts_enabled());

    sys.run_instruction();
    assert!(sys.cpu.interrupts_enabled(), "latch survives other instructions");

    sys.run_instruction();
    assert!(!sys.cpu.interrupts_enabled());
}

#[test]
fn test_scf_sets_carry() {
    let mut sys = TestSystem::new();
    sys.set_flags(0b1110_0000); // Z, N, H set
    sys.load(0, &[0x37]); // SCF

    sys.run_instruction();
    assert_eq!(sys.flag(Flag::CY), 1);
    assert_eq!(sys.flag(Flag::H), 0);
    assert_eq!(sys.flag(Flag::N), 0);
    assert_eq!(sys.flag(Flag::Z), 1, "SCF leaves Z");
}

#[test]
fn test_ccf_complements_carry() {
    let mut sys = TestSystem::new();
    sys.set_flags(0b0001_0000); // CY set
    sys.load(0, &[0x3F, 0x3F]); // CCF; CCF

    sys.run_instruction();
    assert_eq!(sys.flag(Flag::CY), 0);
    sys.run_instruction();
    assert_eq!(sys.flag(Flag::CY), 1);
    assert_eq!(sys.flag(Flag::H), 0);
    assert_eq!(sys.flag(Flag::N), 0);
}

// --- DAA ---

#[test]
fn test_daa_after_bcd_addition() {
    let mut sys = TestSystem::new();
    // 0x15 + 0x27 = 0x3C, decimal 15 + 27 = 42
    sys.write_reg(Register::A, 0x15);
    sys.write_reg(Register::B, 0x27);
    sys.load(0, &[0x80, 0x27]); // ADD A, B; DAA

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x3C);
    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x42);
    assert_eq!(sys.flag(Flag::CY), 0);
}

#[test]
fn test_daa_addition_with_decimal_carry() {
    let mut sys = TestSystem::new();
    // 0x90 + 0x20 = 0xB0, decimal 90 + 20 = 110 -> 0x10 with carry
    sys.write_reg(Register::A, 0x90);
    sys.write_reg(Register::B, 0x20);
    sys.load(0, &[0x80, 0x27]); // ADD A, B; DAA

    sys.run_instruction();
    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x10);
    assert_eq!(sys.flag(Flag::CY), 1);
}

#[test]
fn test_daa_half_adjust_without_high_carry() {
    let mut sys = TestSystem::new();
    // 0x99 with H set adjusts the low nibble only
    sys.write_reg(Register::A, 0x99);
    sys.set_flags(0b0010_0000); // H set, N clear
    sys.load(0, &[0x27]); // DAA

    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x9F);
    assert_eq!(sys.flag(Flag::CY), 0);
}

#[test]
fn test_daa_after_bcd_subtraction() {
    let mut sys = TestSystem::new();
    // 0x42 - 0x15 = 0x2D, decimal 42 - 15 = 27
    sys.write_reg(Register::A, 0x42);
    sys.write_reg(Register::B, 0x15);
    sys.load(0, &[0x90, 0x27]); // SUB A, B; DAA

    sys.run_instruction();
    sys.run_instruction();
    assert_eq!(sys.reg(Register::A), 0x27);
    assert_eq!(sys.flag(Flag::N), 1, "DAA leaves N");
}

#[test]
fn test_daa_zero_sets_z() {
    let mut sys = TestSystem::new();
    sys.write_reg(Register::A, 0x00);
    sys.load(0, &[0x27]); // DAA

    sys.run_instruction();
    assert_eq!(sys.flag(Flag::Z), 1);
    assert_eq!(sys.flag(Flag::H), 0);
}
