use std::fs;
use tinyvm_core::{VM, VmConfig};

#[test]
fn defaults_match_reference_machine() {
    let cfg = VmConfig::default();
    assert_eq!(cfg.register_count, 4);
    assert_eq!(cfg.memory_size, 128);
    assert_eq!(cfg.max_cycles, 4096);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let cfg = VmConfig::from_json(r#"{ "memory_size": 256 }"#).unwrap();
    assert_eq!(cfg.memory_size, 256);
    assert_eq!(cfg.register_count, 4);
    assert_eq!(cfg.max_cycles, 4096);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(VmConfig::from_json(r#"{ "register_count": 0 }"#).is_err());
    assert!(VmConfig::from_json(r#"{ "max_cycles": 0 }"#).is_err());
    assert!(VmConfig::from_json(r#"{ "memory_size": 70000 }"#).is_err());
    assert!(VmConfig::from_json("not json").is_err());

    let err = VmConfig::from_json(r#"{ "register_count": 18446744073709551615 }"#).unwrap_err();
    assert!(err.contains("register_count"), "err: {}", err);
    assert!(VmConfig::from_json(r#"{ "register_count": 257 }"#).is_err());
    assert!(VmConfig::from_json(r#"{ "register_count": 256 }"#).is_ok());
}

#[test]
fn load_from_file_reads_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vm.json");
    fs::write(&path, r#"{ "register_count": 8, "max_cycles": 100 }"#).unwrap();

    let cfg = VmConfig::load_from_file(&path).unwrap();
    assert_eq!(cfg.register_count, 8);
    assert_eq!(cfg.max_cycles, 100);

    let err = VmConfig::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(err.starts_with("read config"));
}

#[test]
fn oversized_register_file_is_refused_by_vm() {
    let cfg = VmConfig { register_count: usize::MAX, ..VmConfig::default() };
    assert!(VM::with_config(cfg).is_err());
}
