use tinyvm_core::VmConfig;
use tinyvm_core::vm::operand::{
    classify, parse_char_literal, parse_number, resolve, Operand, OperandFault, OperandKinds,
};

fn any() -> OperandKinds {
    OperandKinds::REGISTER
        .or(OperandKinds::MEMORY)
        .or(OperandKinds::IMMEDIATE)
        .or(OperandKinds::LABEL)
}

#[test]
fn classify_by_shape() {
    assert_eq!(classify("r0"), OperandKinds::REGISTER);
    assert_eq!(classify("R3"), OperandKinds::REGISTER);
    assert_eq!(classify("@12"), OperandKinds::MEMORY);
    assert_eq!(classify("@x"), OperandKinds::MEMORY);
    assert_eq!(classify("'a'"), OperandKinds::IMMEDIATE);
    assert_eq!(classify("-17"), OperandKinds::IMMEDIATE);
    assert_eq!(classify("loop"), OperandKinds::LABEL);
    assert_eq!(classify("r"), OperandKinds::LABEL);
}

#[test]
fn resolve_register_and_memory() {
    let cfg = VmConfig::default();
    assert_eq!(resolve("r3", any(), &cfg), Ok(Operand::Register(3)));
    assert_eq!(resolve("@127", any(), &cfg), Ok(Operand::Memory(127)));
    assert_eq!(resolve("r4", any(), &cfg), Err(OperandFault::RegisterOutOfRange { count: 4 }));
    assert_eq!(resolve("@128", any(), &cfg), Err(OperandFault::MemoryOutOfRange { size: 128 }));
    assert_eq!(resolve("@", any(), &cfg), Err(OperandFault::MissingAddress));
    assert_eq!(resolve("@abc", any(), &cfg), Err(OperandFault::NonNumericAddress));
}

#[test]
fn resolve_respects_config_sizes() {
    let cfg = VmConfig { register_count: 8, memory_size: 16, max_cycles: 10 };
    assert_eq!(resolve("r7", any(), &cfg), Ok(Operand::Register(7)));
    assert!(resolve("@16", any(), &cfg).is_err());
}

#[test]
fn resolve_rejects_kinds_not_allowed() {
    let cfg = VmConfig::default();
    let err = resolve("r1", OperandKinds::MEMORY, &cfg).unwrap_err();
    assert_eq!(
        err,
        OperandFault::NotAllowed { found: OperandKinds::REGISTER, expected: OperandKinds::MEMORY }
    );
    assert_eq!(err.to_string(), "expected memory operand, got register");

    let err = resolve("5", OperandKinds::REGISTER.or(OperandKinds::MEMORY), &cfg).unwrap_err();
    assert_eq!(err.to_string(), "expected register or memory operand, got immediate");
}

#[test]
fn resolve_label_keeps_name() {
    let cfg = VmConfig::default();
    assert_eq!(resolve("done", OperandKinds::LABEL, &cfg), Ok(Operand::Label("done".to_string())));
}

#[test]
fn char_literals_and_escapes() {
    assert_eq!(parse_char_literal("'H'"), Ok(72));
    assert_eq!(parse_char_literal("\"x\""), Ok(120));
    assert_eq!(parse_char_literal("'\\n'"), Ok(10));
    assert_eq!(parse_char_literal("'\\t'"), Ok(9));
    assert_eq!(parse_char_literal("'\\''"), Ok(39));
    assert_eq!(parse_char_literal("'é'"), Ok(233));
    assert_eq!(parse_char_literal("''"), Err(OperandFault::EmptyCharLiteral));
    assert_eq!(parse_char_literal("'\\q'"), Err(OperandFault::UnknownEscape));
    assert_eq!(parse_char_literal("'ab'"), Err(OperandFault::CharLiteralTooLong));
}

#[test]
fn numeric_literals() {
    assert_eq!(parse_number("42"), Ok(42));
    assert_eq!(parse_number("-3"), Ok(-3));
    assert_eq!(parse_number("+8"), Ok(8));
    assert_eq!(parse_number("0x1F"), Ok(31));
    assert_eq!(parse_number("0b101"), Ok(5));
    assert_eq!(parse_number("1.5"), Err(OperandFault::MalformedNumber));
    assert_eq!(parse_number("0x"), Err(OperandFault::MalformedNumber));
    assert_eq!(parse_number("12abc"), Err(OperandFault::MalformedNumber));
    assert_eq!(parse_number("99999999999999999999"), Err(OperandFault::MalformedNumber));
}

#[test]
fn fault_messages() {
    assert_eq!(
        OperandFault::Arity { expected: 2, found: 1 }.to_string(),
        "expects 2 operands, got 1"
    );
    assert_eq!(
        OperandFault::RegisterOutOfRange { count: 4 }.to_string(),
        "register index out of range (r0..r3)"
    );
}
