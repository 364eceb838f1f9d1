use std::fs;
use tinyvm_core::{VmErrorExt, VM, Script};

#[test]
fn script_from_file_loads_into_vm() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.tvm");
    fs::write(&path, "LOAD r0, 'Z'\nWRITE r0\nHALT\n").unwrap();

    let script = Script::new(path).unwrap();
    assert_eq!(script.name, "prog.tvm");

    let mut vm = VM::new();
    vm.load_script(&script).unwrap();
    assert_eq!(vm.program().name(), "prog.tvm");
    vm.run().unwrap();
    assert_eq!(vm.get_output(), "Z");
}

#[test]
fn errors_carry_script_name() {
    let script = Script::from_source("bad.tvm", "\n  INC r7\n");
    let mut vm = VM::new();
    vm.load_script(&script).unwrap();
    let err = vm.step().unwrap_err();
    let location = err.location().unwrap();
    assert_eq!(location.file, "bad.tvm");
    assert_eq!(location.line, 2);
    assert_eq!(location.column, 7);
}

#[test]
fn missing_script_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Script::new(dir.path().join("gone.tvm")).unwrap_err();
    assert!(err.message().contains("gone.tvm"));
}
