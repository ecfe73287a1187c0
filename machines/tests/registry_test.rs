use gbx_core::cpu::Register;
use gbx_machines::registry;
use gbx_machines::RegisterValue;

#[test]
fn test_all_machines_are_registered() {
    let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["gameboyx", "simple"]);
}

#[test]
fn test_find_returns_a_working_factory() {
    let entry = registry::find("simple").expect("simple machine registered");
    let mut machine = (entry.create)().unwrap();

    machine.write_register(Register::A, RegisterValue::Byte(0x12));
    assert_eq!(
        machine.read_register(Register::A),
        RegisterValue::Byte(0x12)
    );
    assert_eq!(
        machine.read_register(Register::PC),
        RegisterValue::Word(0x0000)
    );
}

#[test]
fn test_find_unknown_machine() {
    assert!(registry::find("does-not-exist").is_none());
}
