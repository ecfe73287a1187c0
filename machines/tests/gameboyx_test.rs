use gbx_core::cpu::Register;
use gbx_core::memory::Mode;
use gbx_machines::{GameBoyX, System};

#[test]
fn test_boots_in_system_mode() {
    let machine = GameBoyX::new().unwrap();
    assert_eq!(machine.mode(), Mode::System);
    assert!(!machine.is_halted());
    assert!(!machine.is_stopped());
}

#[test]
fn test_kernel_runs_from_kernel_rom() {
    let mut machine = GameBoyX::new().unwrap();
    // Kernel: LD A, 0x42; LD (0x8000), A  — kernel RAM lives at 0x8000.
    machine
        .load_kernel(&[0x3E, 0x42, 0xEA, 0x00, 0x80])
        .unwrap();

    machine.run_cycle().unwrap();
    machine.run_cycle().unwrap();

    assert_eq!(machine.registers().read(Register::A), 0x42);
    assert_eq!(machine.memory().read_byte(0x8000).unwrap(), 0x42);
}

#[test]
fn test_kernel_rom_is_write_protected() {
    let mut machine = GameBoyX::new().unwrap();
    // Kernel: LD A, 1; LD (0x0000), A — storing into kernel ROM fails.
    machine.load_kernel(&[0x3E, 0x01, 0xEA, 0x00, 0x00]).unwrap();

    machine.run_cycle().unwrap();
    assert!(machine.run_cycle().is_err());
}

#[test]
fn test_jpu_enters_the_cartridge() {
    let mut machine = GameBoyX::new().unwrap();
    // Kernel hands control to the cartridge entry point.
    machine.load_kernel(&[0xFC, 0xC3, 0x00, 0x01]).unwrap(); // JPU 0x0100
    // Cartridge: LD A, 0x99; HALT at its entry point.
    let mut cartridge = vec![0u8; 0x4000];
    cartridge[0x0100] = 0x3E;
    cartridge[0x0101] = 0x99;
    cartridge[0x0102] = 0x76;
    machine.load_cartridge(&cartridge).unwrap();

    machine.run_cycle().unwrap(); // JPU
    assert_eq!(machine.mode(), Mode::User);
    assert_eq!(machine.registers().read_pair(Register::PC), 0x0100);

    machine.run_cycle().unwrap(); // LD A, 0x99 from the cartridge
    assert_eq!(machine.registers().read(Register::A), 0x99);

    machine.run_cycle().unwrap(); // HALT
    assert!(machine.is_halted());

    // A halted machine ignores further cycles.
    let pc = machine.registers().read_pair(Register::PC);
    machine.run_cycle().unwrap();
    assert_eq!(machine.registers().read_pair(Register::PC), pc);
}

#[test]
fn test_kernel_reads_cartridge_with_ldu() {
    let mut machine = GameBoyX::new().unwrap();
    // Kernel: LD HL, 0x0100; LDU A, (HL) — inspect the cartridge entry
    // byte while staying in System mode.
    machine
        .load_kernel(&[0x21, 0x00, 0x01, 0xFC, 0x7E])
        .unwrap();
    let mut cartridge = vec![0u8; 0x4000];
    cartridge[0x0100] = 0xC3;
    machine.load_cartridge(&cartridge).unwrap();

    machine.run_cycle().unwrap();
    machine.run_cycle().unwrap();

    assert_eq!(machine.registers().read(Register::A), 0xC3);
    assert_eq!(machine.mode(), Mode::System);
}

#[test]
fn test_cartridge_rom_banks_are_switchable() {
    let mut machine = GameBoyX::new().unwrap();
    let mut cartridge = vec![0u8; 0x8000];
    cartridge[0x0000] = 0xAA; // bank 0
    cartridge[0x4000] = 0xBB; // bank 1
    machine.load_cartridge(&cartridge).unwrap();

    machine.memory_mut().set_mode(Mode::User);
    assert_eq!(machine.memory().read_byte(0x0000).unwrap(), 0xAA);

    machine.memory_mut().switch_bank(0x0000, 1).unwrap();
    assert_eq!(machine.memory().read_byte(0x0000).unwrap(), 0xBB);
}
