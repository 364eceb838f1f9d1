use tinyvm_core::vm::check::check;
use tinyvm_core::{parse_program, samples, VmConfig};

#[test]
fn clean_programs_have_no_problems() {
    let cfg = VmConfig::default();
    for src in [samples::HELLO, samples::ECHO] {
        let program = parse_program(src).unwrap();
        assert!(check(&program, &cfg).is_empty());
    }
}

#[test]
fn check_lists_problems_in_source_order() {
    let src = "LOAD r9, 1\nJNZ missing\nFROB\nSTORE r0, 5\nHALT\n";
    let program = parse_program(src).unwrap();
    let problems = check(&program, &VmConfig::default());

    let kinds: Vec<&str> = problems.iter().map(|p| p.kind()).collect();
    assert_eq!(kinds, vec!["operand", "resolution", "execution", "operand"]);
    let lines: Vec<Option<usize>> = problems.iter().map(|p| p.line()).collect();
    assert_eq!(lines, vec![Some(1), Some(2), Some(3), Some(4)]);
}

#[test]
fn check_uses_configured_sizes() {
    let program = parse_program("LOAD r5, @200\nHALT\n").unwrap();
    assert_eq!(check(&program, &VmConfig::default()).len(), 1);

    let roomy = VmConfig { register_count: 8, memory_size: 256, ..VmConfig::default() };
    assert!(check(&program, &roomy).is_empty());
}
