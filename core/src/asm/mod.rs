//! file: core/src/asm/mod.rs
//! description: assembler for the line-oriented instruction language.
//!
//! Turns source text into a [`Program`]: an ordered list of raw
//! [`Instruction`]s plus a label table mapping names to instruction indices.
//!
//! ```text
//! ; comment            # also a comment
//! start:               ; label on its own line
//! loop: LOAD r0, 'A'   ; label followed by an instruction
//!     JNZ loop
//! ```
//!
//! Opcodes and operands are not validated here. Unknown opcodes, bad operands
//! and undefined labels only fail when the instruction executes.

pub mod err;
pub(crate) mod lexer;

use std::collections::HashMap;

use log::debug;

use crate::location::Location;
use crate::script::{ANONYMOUS, Script};
use err::ParseError;

/// Label name to instruction index.
pub type LabelTable = HashMap<String, usize>;

/// One assembled source line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Upper-cased mnemonic.
    pub opcode: String,
    /// Raw operand tokens, trimmed.
    pub operands: Vec<String>,
    /// 1-based source line.
    pub line: usize,
    /// The original line, comments included.
    pub raw: String,
}

impl Instruction {
    /// Location of `token` (or of the instruction itself) in `file`.
    pub fn locate(&self, file: &str, token: Option<&str>) -> Location {
        Location::of_token(file, self.line, &self.raw, token)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, self.operands.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    name: String,
    instructions: Vec<Instruction>,
    labels: LabelTable,
}

impl Program {
    /// Script name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn resolve_label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Labels pointing at `index`, sorted by name.
    pub fn labels_at(&self, index: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, at)| **at == index)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Assembles anonymous source text.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    parse_named(ANONYMOUS, source)
}

/// Assembles a loaded script, naming diagnostics after it.
pub fn parse_script(script: &Script) -> Result<Program, ParseError> {
    parse_named(&script.name, &script.content)
}

pub fn parse_named(name: &str, source: &str) -> Result<Program, ParseError> {
    let mut instructions = Vec::new();
    let mut labels = LabelTable::new();
    let mut defined_on: HashMap<String, usize> = HashMap::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index + 1;
        let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let text = lexer::strip_comment(raw_line).trim();
        if text.is_empty() {
            continue;
        }

        let mut remainder = text;
        if let Some((label, rest)) = lexer::split_label(text) {
            if let Some(first) = defined_on.get(label) {
                let location = Location::of_token(name, line_no, raw_line, Some(label));
                return Err(ParseError::duplicate_label(label, *first, location));
            }
            labels.insert(label.to_string(), instructions.len());
            defined_on.insert(label.to_string(), line_no);
            if rest.is_empty() {
                continue;
            }
            remainder = rest;
        }

        let (mnemonic, operand_text) = lexer::split_mnemonic(remainder);
        instructions.push(Instruction {
            opcode: mnemonic.to_uppercase(),
            operands: lexer::split_operands(operand_text),
            line: line_no,
            raw: raw_line.to_string(),
        });
    }

    debug!(
        "assembled '{}': {} instructions, {} labels",
        name,
        instructions.len(),
        labels.len()
    );

    Ok(Program {
        name: name.to_string(),
        instructions,
        labels,
    })
}
