//! file: core/src/vm/check.rs
//! description: ahead-of-time validation of an assembled program.
//!
//! Runs the decoder over every instruction without executing anything, so
//! errors that would otherwise surface only when a line runs (bad operands,
//! unknown opcodes, jumps to missing labels) can be listed up front.

use crate::asm::Program;
use crate::config::VmConfig;
use crate::error::VmError;
use crate::vm::err::ResolutionError;
use crate::vm::op::{self, Op};

/// All problems found in `program`, in source order.
pub fn check(program: &Program, config: &VmConfig) -> Vec<VmError> {
    let mut problems = Vec::new();
    for instr in program.instructions() {
        match op::decode(instr, program.name(), config) {
            Ok((opcode, Op::Jump { label, .. })) => {
                if program.resolve_label(&label).is_none() {
                    let location = instr.locate(program.name(), Some(label.as_str()));
                    problems.push(ResolutionError::new(opcode.mnemonic(), &label, location).into());
                }
            }
            Ok(_) => {}
            Err(e) => problems.push(e),
        }
    }
    problems
}
