use tinyvm_core::vm::err::ExecutionFault;
use tinyvm_core::vm::operand::OperandFault;
use tinyvm_core::{samples, ResetOptions, VmConfig, VmError, VM};

fn loaded(src: &str) -> VM {
    let mut vm = VM::new();
    vm.load_program(src).expect("program should assemble");
    vm
}

#[test]
fn load_sets_register_and_flags() {
    let mut vm = loaded("LOAD r0, 5\nLOAD r1, 0\nLOAD r2, -3\nHALT\n");

    vm.step().unwrap();
    assert_eq!(vm.registers()[0], 5);
    assert!(!vm.flags().zero && !vm.flags().negative);

    vm.step().unwrap();
    assert!(vm.flags().zero && !vm.flags().negative);

    vm.step().unwrap();
    assert_eq!(vm.registers()[2], -3);
    assert!(!vm.flags().zero && vm.flags().negative);
}

#[test]
fn load_from_register_and_memory() {
    let mut vm = loaded("LOAD r0, 9\nSTORE r0, @3\nLOAD r1, @3\nLOAD r2, r1\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.registers(), &[9, 9, 9, 0]);
}

#[test]
fn cmp_equal_sets_zero_and_jz_jumps() {
    let mut vm = loaded(
        "LOAD r0, 4\nCMP r0, 4\nJZ yes\nLOAD r1, 1\nHALT\nyes:\nLOAD r1, 2\nHALT\n",
    );
    vm.run().unwrap();
    assert_eq!(vm.registers()[1], 2);
}

#[test]
fn jz_not_taken_falls_through() {
    let mut vm = loaded("LOAD r0, 4\nCMP r0, 5\nJZ yes\nLOAD r1, 1\nHALT\nyes:\nLOAD r1, 2\nHALT\n");
    vm.step().unwrap();
    vm.step().unwrap();
    assert!(!vm.flags().zero);
    assert!(vm.flags().negative);
    vm.step().unwrap();
    assert_eq!(vm.pc(), 3);
    vm.run().unwrap();
    assert_eq!(vm.registers()[1], 1);
}

#[test]
fn cmp_leaves_registers_untouched() {
    let mut vm = loaded("LOAD r0, 2\nLOAD r1, 7\nCMP r0, r1\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.registers()[..2], [2, 7]);
    assert!(vm.flags().negative);
}

#[test]
fn store_keeps_low_byte() {
    let mut vm = loaded("LOAD r0, 300\nSTORE r0, @10\nLOAD r1, @10\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.memory()[10], 44);
    assert_eq!(vm.registers()[..2], [300, 44]);
    assert_eq!(vm.memory().len(), 128);
}

#[test]
fn arithmetic_and_counters() {
    let mut vm = loaded("LOAD r0, 10\nLOAD r1, 3\nSUB r0, r1\nADD r0, r0\nINC r1\nDEC r2\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.registers(), &[14, 4, -1, 0]);
    assert!(vm.flags().negative);
}

#[test]
fn add_wraps_on_overflow() {
    let mut vm = loaded("LOAD r0, 2147483647\nINC r0\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.registers()[0], i32::MIN);
    assert!(vm.flags().negative);
}

#[test]
fn write_char_literal_produces_output() {
    let mut vm = loaded("LOAD r0, 'H'\nWRITE r0\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.get_output(), "H");
    assert_eq!(vm.output_codes(), &[72u16]);
}

#[test]
fn write_keeps_low_sixteen_bits() {
    let mut vm = loaded("LOAD r0, 0x10041\nWRITE r0\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.output_codes(), &[0x41u16]);
}

#[test]
fn read_consumes_input_then_yields_zero() {
    let mut vm = loaded("READ r0\nREAD r1\nREAD r2\nHALT\n");
    vm.set_input("ok");
    assert_eq!(vm.input_remaining(), 2);
    vm.run().unwrap();
    assert_eq!(vm.registers()[..3], [111, 107, 0]);
    assert!(vm.flags().zero);
    assert_eq!(vm.input_remaining(), 0);
}

#[test]
fn hello_sample_runs_fifteen_steps() {
    let mut vm = loaded(samples::HELLO);
    let status = vm.run().unwrap();
    assert!(status.halted);
    assert_eq!(status.steps, 15);
    assert_eq!(vm.get_output(), "HELLO!\n");
    assert_eq!(vm.cycle_count(), 15);
}

#[test]
fn echo_sample_copies_input() {
    let output = tinyvm_core::run_source(samples::ECHO, "hey").unwrap();
    assert_eq!(output, "hey");
}

#[test]
fn forward_references_resolve() {
    let mut vm = loaded("JMP skip\nLOAD r0, 1\nskip: LOAD r1, 1\nHALT\n");
    vm.run().unwrap();
    assert_eq!(vm.registers()[..2], [0, 1]);
}

#[test]
fn undefined_label_fails_only_when_taken() {
    let mut vm = loaded("LOAD r0, 1\nCMP r0, 0\nJZ nowhere\nJMP nowhere\nHALT\n");
    vm.step().unwrap();
    vm.step().unwrap();
    vm.step().unwrap();
    assert_eq!(vm.pc(), 3);

    let err = vm.step().unwrap_err();
    match &err {
        VmError::Resolution(e) => assert_eq!(e.label(), "nowhere"),
        other => panic!("expected resolution error, got {:?}", other),
    }
    assert_eq!(err.line(), Some(4));
    assert!(vm.halted());
}

#[test]
fn register_out_of_range_is_operand_error() {
    let mut vm = loaded("LOAD r4, 1\nHALT\n");
    let err = vm.step().unwrap_err();
    match &err {
        VmError::Operand(e) => {
            assert_eq!(e.fault(), &OperandFault::RegisterOutOfRange { count: 4 });
            assert_eq!(e.opcode(), "LOAD");
        }
        other => panic!("expected operand error, got {:?}", other),
    }
    assert!(vm.halted());
}

#[test]
fn wrong_arity_and_kind_are_operand_errors() {
    let mut vm = loaded("ADD r0\n");
    let err = vm.step().unwrap_err();
    assert!(matches!(
        &err,
        VmError::Operand(e) if e.fault() == &OperandFault::Arity { expected: 2, found: 1 }
    ));

    let mut vm = loaded("STORE r0, r1\n");
    assert!(matches!(vm.step(), Err(VmError::Operand(_))));

    let mut vm = loaded("ADD r0, 5\n");
    assert!(matches!(vm.step(), Err(VmError::Operand(_))));
}

#[test]
fn unknown_opcode_halts_with_execution_error() {
    let mut vm = loaded("NOP\n");
    let err = vm.step().unwrap_err();
    assert!(matches!(&err, VmError::Execution(e) if e.fault() == &ExecutionFault::UnknownOpcode));
    assert!(vm.halted());
}

#[test]
fn running_off_the_end_is_an_error() {
    let mut vm = loaded("LOAD r0, 1\n");
    let err = vm.run().unwrap_err();
    assert!(matches!(
        &err,
        VmError::Execution(e) if e.fault() == &ExecutionFault::PcOutOfBounds { pc: 1, len: 1 }
    ));
    assert!(vm.halted());
}

#[test]
fn infinite_loop_hits_cycle_limit() {
    let mut vm = loaded("top:\nJMP top\n");
    let err = vm.run().unwrap_err();
    assert!(matches!(&err, VmError::ResourceLimit(e) if e.max_cycles() == 4096));
    assert!(vm.halted());
    assert_eq!(vm.pc(), 0);
}

#[test]
fn cycle_limit_follows_config() {
    let cfg = VmConfig { max_cycles: 3, ..VmConfig::default() };
    let mut vm = VM::with_config(cfg).unwrap();
    vm.load_program("a:\nINC r0\nJMP a\n").unwrap();
    assert!(matches!(vm.run(), Err(VmError::ResourceLimit(_))));
    assert_eq!(vm.cycle_count(), 4);
}

#[test]
fn with_config_rejects_invalid_sizes() {
    let cfg = VmConfig { register_count: 0, ..VmConfig::default() };
    assert!(VM::with_config(cfg).is_err());
}

#[test]
fn no_program_is_an_error_without_halting() {
    let mut vm = VM::new();
    let err = vm.step().unwrap_err();
    assert!(matches!(&err, VmError::Execution(e) if e.fault() == &ExecutionFault::NoProgram));
    assert!(!vm.halted());
}

#[test]
fn step_after_halt_is_a_no_op() {
    let mut vm = loaded("INC r0\nHALT\n");
    vm.run().unwrap();
    let pc = vm.pc();
    let status = vm.step().unwrap();
    assert!(status.halted);
    assert_eq!(vm.pc(), pc);
    assert_eq!(vm.registers()[0], 1);
}

#[test]
fn reset_keeps_memory_unless_asked() {
    let mut vm = loaded("LOAD r0, 7\nSTORE r0, @0\nWRITE r0\nHALT\n");
    vm.set_input("abc");
    vm.run().unwrap();

    vm.reset_state(ResetOptions::default());
    assert_eq!(vm.memory()[0], 7);
    assert_eq!(vm.registers()[0], 0);
    assert_eq!(vm.pc(), 0);
    assert!(!vm.halted());
    assert_eq!(vm.cycle_count(), 0);
    assert_eq!(vm.get_output(), "");
    assert_eq!(vm.input_remaining(), 3);

    vm.reset_state(ResetOptions { clear_memory: true });
    assert_eq!(vm.memory()[0], 0);
}

#[test]
fn loading_clears_previous_state() {
    let mut vm = loaded("LOAD r0, 7\nSTORE r0, @0\nHALT\n");
    vm.run().unwrap();
    vm.load_program("HALT\n").unwrap();
    assert_eq!(vm.memory()[0], 0);
    assert!(!vm.halted());
    assert_eq!(vm.program().len(), 1);
}

#[test]
fn snapshot_reflects_machine() {
    let mut vm = loaded("LOAD r1, 'A'\nWRITE r1\nHALT\n");
    vm.step().unwrap();
    assert_eq!(vm.current_instruction().map(|i| i.opcode.as_str()), Some("WRITE"));
    vm.run().unwrap();

    let snap = vm.snapshot();
    assert_eq!(snap.registers, vec![0, 65, 0, 0]);
    assert_eq!(snap.output, "A");
    assert!(snap.halted);
    assert_eq!(snap.cycles, 3);
    assert_eq!(snap.pc, 2);
}
