//! file: core/src/vm/io.rs
//! description: character-code I/O channel.
//!
//! Input is a fixed sequence of code points consumed front to back; output is
//! an append-only list of 16-bit codes. Neither side knows about parsing or
//! execution.

/// Value READ produces once the input is exhausted.
pub const END_OF_INPUT: i32 = 0;

#[derive(Debug, Clone, Default)]
pub struct IoChannel {
    input: Vec<u32>,
    cursor: usize,
    output: Vec<u16>,
}

impl IoChannel {
    /// Replaces the input with the code points of `text` and rewinds.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().map(u32::from).collect();
        self.cursor = 0;
    }

    /// Next input code, or [`END_OF_INPUT`] when nothing is left.
    pub fn read(&mut self) -> i32 {
        match self.input.get(self.cursor) {
            Some(code) => {
                self.cursor += 1;
                *code as i32
            }
            None => END_OF_INPUT,
        }
    }

    /// Appends the low 16 bits of `value`.
    pub fn write(&mut self, value: i32) {
        self.output.push((value & 0xFFFF) as u16);
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.cursor)
    }

    pub fn output_codes(&self) -> &[u16] {
        &self.output
    }

    /// Renders output codes as text; lone surrogates become U+FFFD.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .map(|code| char::from_u32(u32::from(*code)).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

