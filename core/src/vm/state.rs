use serde::{Deserialize, Serialize};

use crate::config::VmConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub zero: bool,
    pub negative: bool,
}

impl Flags {
    pub fn from_value(value: i64) -> Self {
        Flags {
            zero: value == 0,
            negative: value < 0,
        }
    }
}

/// Registers, memory, flags and control state of one machine.
#[derive(Debug, Clone)]
pub struct Machine {
    pub registers: Vec<i32>,
    pub memory: Vec<u8>,
    pub flags: Flags,
    pub pc: usize,
    pub halted: bool,
    pub cycles: usize,
}

impl Machine {
    pub fn new(config: &VmConfig) -> Self {
        Machine {
            registers: vec![0; config.register_count],
            memory: vec![0; config.memory_size],
            flags: Flags::default(),
            pc: 0,
            halted: false,
            cycles: 0,
        }
    }

    pub fn reset(&mut self, clear_memory: bool) {
        self.registers.fill(0);
        if clear_memory {
            self.memory.fill(0);
        }
        self.flags = Flags::default();
        self.pc = 0;
        self.halted = false;
        self.cycles = 0;
    }

    pub fn read_register(&self, index: usize) -> i32 {
        self.registers[index]
    }

    /// Stores `value` and recomputes both flags from it.
    pub fn write_register(&mut self, index: usize, value: i32) {
        self.registers[index] = value;
        self.flags = Flags::from_value(i64::from(value));
    }

    pub fn read_memory(&self, address: usize) -> i32 {
        i32::from(self.memory[address])
    }

    /// Keeps the low byte only.
    pub fn write_memory(&mut self, address: usize, value: i32) {
        self.memory[address] = (value & 0xFF) as u8;
    }
}
