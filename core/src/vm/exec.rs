//! file: core/src/vm/exec.rs
//! description: fetch-decode-execute for a single step.
//!
//! `execute_step` fetches the instruction at `pc`, decodes it into an `Op`,
//! applies the opcode semantics against the `ExecState` (machine state, I/O
//! channel and the installed program) and advances or redirects `pc`.
//! Marking the machine halted on failure is left to the caller.

use log::debug;

use crate::asm::{Instruction, Program};
use crate::config::VmConfig;
use crate::error::VmError;
use crate::vm::err::{ExecutionError, ResolutionError, ResourceLimitError};
use crate::vm::io::IoChannel;
use crate::vm::op::{self, Condition, Op, Opcode, Rhs, Source};
use crate::vm::state::{Flags, Machine};

/// Where control goes after an op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Jump(usize),
    Halt,
}

pub(crate) struct ExecState<'a> {
    pub config: &'a VmConfig,
    pub program: &'a Program,
    pub machine: &'a mut Machine,
    pub io: &'a mut IoChannel,
}

pub(crate) fn dispatch_op(
    state: &mut ExecState,
    opcode: Opcode,
    op: &Op,
    instr: &Instruction,
) -> Result<Flow, VmError> {
    let machine = &mut *state.machine;
    match op {
        Op::Load { dest, src } => {
            let value = match *src {
                Source::Register(index) => machine.read_register(index),
                Source::Memory(address) => machine.read_memory(address),
                Source::Immediate(value) => value as i32,
            };
            machine.write_register(*dest, value);
        }
        Op::Store { src, address } => {
            let value = machine.read_register(*src);
            machine.write_memory(*address, value);
        }
        Op::Add { dest, rhs } => {
            let value = machine.read_register(*dest).wrapping_add(machine.read_register(*rhs));
            machine.write_register(*dest, value);
        }
        Op::Sub { dest, rhs } => {
            let value = machine.read_register(*dest).wrapping_sub(machine.read_register(*rhs));
            machine.write_register(*dest, value);
        }
        Op::Inc { target } => {
            let value = machine.read_register(*target).wrapping_add(1);
            machine.write_register(*target, value);
        }
        Op::Dec { target } => {
            let value = machine.read_register(*target).wrapping_sub(1);
            machine.write_register(*target, value);
        }
        Op::Cmp { left, right } => {
            let rhs = match *right {
                Rhs::Register(index) => i64::from(machine.read_register(index)),
                Rhs::Immediate(value) => value,
            };
            // difference is taken unwrapped so the flags reflect the true ordering
            let diff = i64::from(machine.read_register(*left)).saturating_sub(rhs);
            machine.flags = Flags::from_value(diff);
        }
        Op::Jump { condition, label } => {
            let taken = match condition {
                Condition::Always => true,
                Condition::Zero => machine.flags.zero,
                Condition::NotZero => !machine.flags.zero,
            };
            if taken {
                let target = state.program.resolve_label(label).ok_or_else(|| {
                    let location = instr.locate(state.program.name(), Some(label.as_str()));
                    ResolutionError::new(opcode.mnemonic(), label, location)
                })?;
                return Ok(Flow::Jump(target));
            }
        }
        Op::Read { dest } => {
            let value = state.io.read();
            machine.write_register(*dest, value);
        }
        Op::Write { src } => {
            state.io.write(machine.read_register(*src));
        }
        Op::Halt => return Ok(Flow::Halt),
    }
    Ok(Flow::Next)
}

/// Executes the instruction at `pc` and counts the cycle.
pub(crate) fn execute_step(state: &mut ExecState) -> Result<(), VmError> {
    let program = state.program;
    let pc = state.machine.pc;
    let Some(instr) = program.get(pc) else {
        let last = program.instructions().last().map(|i| i.locate(program.name(), None));
        return Err(ExecutionError::pc_out_of_bounds(pc, program.len(), last).into());
    };

    let (opcode, op) = op::decode(instr, program.name(), state.config)?;
    debug!("pc {}: line {}: {:?}", pc, instr.line, op);
    let flow = dispatch_op(state, opcode, &op, instr)?;

    state.machine.cycles += 1;
    if state.machine.cycles > state.config.max_cycles {
        let location = instr.locate(program.name(), None);
        return Err(ResourceLimitError::new(state.config.max_cycles, location).into());
    }

    match flow {
        Flow::Next => state.machine.pc = pc + 1,
        Flow::Jump(target) => state.machine.pc = target,
        Flow::Halt => state.machine.halted = true,
    }
    Ok(())
}
