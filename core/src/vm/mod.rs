//! file: core/src/vm/mod.rs
//! description: the execution engine and its public control surface.
//!
//! A `VM` exclusively owns its program, label table, registers, memory,
//! flags, I/O buffers and counters. It is driven entirely by the caller:
//! `step` runs one instruction, `run` loops `step` until the machine halts or
//! the cycle cap is hit. Any error raised while executing marks the machine
//! halted before it reaches the caller.

pub mod check;
pub mod err;
mod exec;
pub mod io;
pub mod op;
pub mod operand;
pub mod state;

use log::{info, warn};
use serde::Serialize;

use crate::asm::{self, Instruction, LabelTable, Program};
use crate::config::VmConfig;
use crate::error::VmError;
use crate::script::Script;
use err::ExecutionError;
use io::IoChannel;
use state::{Flags, Machine};

/// What `reset_state` should clear besides the control state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOptions {
    pub clear_memory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub halted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    pub halted: bool,
    pub steps: usize,
}

/// Point-in-time copy of everything a host would display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub registers: Vec<i32>,
    pub memory: Vec<u8>,
    pub flags: Flags,
    pub pc: usize,
    pub halted: bool,
    pub cycles: usize,
    pub output: String,
}

pub struct VM {
    config: VmConfig,
    program: Program,
    machine: Machine,
    io: IoChannel,
}

impl VM {
    pub fn new() -> Self {
        let config = VmConfig::default();
        VM {
            machine: Machine::new(&config),
            program: Program::default(),
            io: IoChannel::default(),
            config,
        }
    }

    pub fn with_config(config: VmConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(VM {
            machine: Machine::new(&config),
            program: Program::default(),
            io: IoChannel::default(),
            config,
        })
    }

    /// Assembles `source` and installs it with a full reset. On failure the
    /// currently installed program and state are left untouched.
    pub fn load_program(&mut self, source: &str) -> Result<(), VmError> {
        let program = asm::parse_program(source)?;
        self.install(program);
        Ok(())
    }

    /// Like [`VM::load_program`], naming diagnostics after the script.
    pub fn load_script(&mut self, script: &Script) -> Result<(), VmError> {
        let program = asm::parse_script(script)?;
        self.install(program);
        Ok(())
    }

    fn install(&mut self, program: Program) {
        info!(
            "loaded '{}': {} instructions, {} labels",
            program.name(),
            program.len(),
            program.labels().len()
        );
        self.program = program;
        self.reset_state(ResetOptions { clear_memory: true });
    }

    pub fn set_input(&mut self, text: &str) {
        self.io.set_input(text);
    }

    pub fn get_output(&self) -> String {
        self.io.output_text()
    }

    /// Zeroes registers, flags, pc, halted and the cycle counter, rewinds the
    /// input and clears the output. Memory survives unless asked otherwise.
    pub fn reset_state(&mut self, options: ResetOptions) {
        self.machine.reset(options.clear_memory);
        self.io.rewind();
        self.io.clear_output();
        info!("machine reset (clear_memory: {})", options.clear_memory);
    }

    /// Executes one instruction. A halted machine is left alone.
    pub fn step(&mut self) -> Result<StepStatus, VmError> {
        if self.machine.halted {
            return Ok(StepStatus { halted: true });
        }
        if self.program.is_empty() {
            return Err(ExecutionError::no_program().into());
        }

        let mut state = exec::ExecState {
            config: &self.config,
            program: &self.program,
            machine: &mut self.machine,
            io: &mut self.io,
        };
        if let Err(e) = exec::execute_step(&mut state) {
            self.machine.halted = true;
            warn!("execution halted: {}", e);
            return Err(e);
        }
        Ok(StepStatus { halted: self.machine.halted })
    }

    /// Steps until the machine halts. Runaway programs end with a
    /// resource-limit error once the cycle cap is passed.
    pub fn run(&mut self) -> Result<RunStatus, VmError> {
        let mut steps = 0;
        while !self.machine.halted {
            self.step()?;
            steps += 1;
            if steps > self.config.max_cycles {
                break;
            }
        }
        info!("run finished after {} steps (halted: {})", steps, self.machine.halted);
        Ok(RunStatus { halted: self.machine.halted, steps })
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn labels(&self) -> &LabelTable {
        self.program.labels()
    }

    pub fn registers(&self) -> &[i32] {
        &self.machine.registers
    }

    pub fn memory(&self) -> &[u8] {
        &self.machine.memory
    }

    pub fn flags(&self) -> Flags {
        self.machine.flags
    }

    pub fn pc(&self) -> usize {
        self.machine.pc
    }

    pub fn halted(&self) -> bool {
        self.machine.halted
    }

    pub fn cycle_count(&self) -> usize {
        self.machine.cycles
    }

    pub fn input_remaining(&self) -> usize {
        self.io.remaining()
    }

    pub fn output_codes(&self) -> &[u16] {
        self.io.output_codes()
    }

    /// The instruction `step` would execute next, if `pc` is in bounds.
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.program.get(self.machine.pc)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.machine.registers.clone(),
            memory: self.machine.memory.clone(),
            flags: self.machine.flags,
            pc: self.machine.pc,
            halted: self.machine.halted,
            cycles: self.machine.cycles,
            output: self.get_output(),
        }
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}
