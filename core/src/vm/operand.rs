//! file: core/src/vm/operand.rs
//! description: operand classification and literal parsing.
//!
//! A raw operand token is classified by its shape:
//!
//! | shape                     | kind      |
//! |---------------------------|-----------|
//! | `r<digits>`               | register  |
//! | `@<digits>`               | memory    |
//! | `'c'`, `"c"`, `'\n'`, ... | immediate |
//! | identifier                | label     |
//! | anything else             | immediate (numeric literal) |
//!
//! The kind is then checked against what the opcode accepts at that position
//! before the token's contents are validated.

use std::fmt;

use log::trace;

use crate::asm::lexer::is_identifier;
use crate::config::VmConfig;

/// Set of operand kinds legal at one operand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandKinds(u8);

impl OperandKinds {
    pub const REGISTER: OperandKinds = OperandKinds(0b0001);
    pub const MEMORY: OperandKinds = OperandKinds(0b0010);
    pub const IMMEDIATE: OperandKinds = OperandKinds(0b0100);
    pub const LABEL: OperandKinds = OperandKinds(0b1000);

    pub const fn or(self, other: OperandKinds) -> OperandKinds {
        OperandKinds(self.0 | other.0)
    }

    pub const fn allows(self, kind: OperandKinds) -> bool {
        self.0 & kind.0 == kind.0
    }
}

impl fmt::Display for OperandKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (OperandKinds::REGISTER, "register"),
            (OperandKinds::MEMORY, "memory"),
            (OperandKinds::IMMEDIATE, "immediate"),
            (OperandKinds::LABEL, "label"),
        ]
        .iter()
        .filter(|(kind, _)| self.allows(*kind))
        .map(|(_, name)| *name)
        .collect();
        write!(f, "{}", names.join(" or "))
    }
}

/// A resolved operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(usize),
    Memory(usize),
    Immediate(i64),
    Label(String),
}

impl Operand {
    pub fn kind(&self) -> OperandKinds {
        match self {
            Operand::Register(_) => OperandKinds::REGISTER,
            Operand::Memory(_) => OperandKinds::MEMORY,
            Operand::Immediate(_) => OperandKinds::IMMEDIATE,
            Operand::Label(_) => OperandKinds::LABEL,
        }
    }
}

/// Why a token could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandFault {
    Arity { expected: usize, found: usize },
    NotAllowed { found: OperandKinds, expected: OperandKinds },
    RegisterOutOfRange { count: usize },
    MemoryOutOfRange { size: usize },
    MissingAddress,
    NonNumericAddress,
    EmptyCharLiteral,
    UnknownEscape,
    CharLiteralTooLong,
    MalformedNumber,
}

impl fmt::Display for OperandFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandFault::Arity { expected, found } => {
                let noun = if *expected == 1 { "operand" } else { "operands" };
                write!(f, "expects {} {}, got {}", expected, noun, found)
            }
            OperandFault::NotAllowed { found, expected } => {
                write!(f, "expected {} operand, got {}", expected, found)
            }
            OperandFault::RegisterOutOfRange { count } => {
                write!(f, "register index out of range (r0..r{})", count.saturating_sub(1))
            }
            OperandFault::MemoryOutOfRange { size } => {
                write!(f, "memory address out of bounds (@0..@{})", size.saturating_sub(1))
            }
            OperandFault::MissingAddress => write!(f, "missing address in memory operand"),
            OperandFault::NonNumericAddress => write!(f, "only numeric memory addresses are supported"),
            OperandFault::EmptyCharLiteral => write!(f, "empty character literal"),
            OperandFault::UnknownEscape => write!(f, "unknown escape sequence"),
            OperandFault::CharLiteralTooLong => write!(f, "too many characters in literal"),
            OperandFault::MalformedNumber => write!(f, "invalid numeric literal"),
        }
    }
}

fn is_register_shaped(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('r' | 'R'))
        && token.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

fn quote_of(token: &str) -> Option<char> {
    let first = token.chars().next()?;
    if (first == '\'' || first == '"') && token.ends_with(first) {
        Some(first)
    } else {
        None
    }
}

/// Kind a token would resolve to, judged by shape alone.
pub fn classify(token: &str) -> OperandKinds {
    if is_register_shaped(token) {
        OperandKinds::REGISTER
    } else if token.starts_with('@') {
        OperandKinds::MEMORY
    } else if quote_of(token).is_some() {
        OperandKinds::IMMEDIATE
    } else if is_identifier(token) {
        OperandKinds::LABEL
    } else {
        OperandKinds::IMMEDIATE
    }
}

/// Resolves `token` against the kinds legal at its position.
pub fn resolve(token: &str, allowed: OperandKinds, config: &VmConfig) -> Result<Operand, OperandFault> {
    let kind = classify(token);
    if !allowed.allows(kind) {
        return Err(OperandFault::NotAllowed { found: kind, expected: allowed });
    }

    let operand = if kind == OperandKinds::REGISTER {
        Operand::Register(parse_register(token, config.register_count)?)
    } else if kind == OperandKinds::MEMORY {
        Operand::Memory(parse_address(token, config.memory_size)?)
    } else if kind == OperandKinds::LABEL {
        Operand::Label(token.to_string())
    } else if quote_of(token).is_some() {
        Operand::Immediate(parse_char_literal(token)?)
    } else {
        Operand::Immediate(parse_number(token)?)
    };
    trace!("resolved operand '{}' as {:?}", token, operand);
    Ok(operand)
}

fn parse_register(token: &str, count: usize) -> Result<usize, OperandFault> {
    token[1..]
        .parse::<usize>()
        .ok()
        .filter(|index| *index < count)
        .ok_or(OperandFault::RegisterOutOfRange { count })
}

fn parse_address(token: &str, size: usize) -> Result<usize, OperandFault> {
    let digits = &token[1..];
    if digits.is_empty() {
        return Err(OperandFault::MissingAddress);
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(OperandFault::NonNumericAddress);
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|address| *address < size)
        .ok_or(OperandFault::MemoryOutOfRange { size })
}

/// Parses a quoted single character or one of the escapes
/// `\n \r \t \\ \' \"` into its code point.
pub fn parse_char_literal(token: &str) -> Result<i64, OperandFault> {
    let body = if token.len() >= 2 { &token[1..token.len() - 1] } else { "" };
    let mut chars = body.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => Err(OperandFault::EmptyCharLiteral),
        (Some(c), None, _) => Ok(i64::from(u32::from(c))),
        (Some('\\'), Some(esc), None) => {
            let c = match esc {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                '\\' => '\\',
                '\'' => '\'',
                '"' => '"',
                _ => return Err(OperandFault::UnknownEscape),
            };
            Ok(i64::from(u32::from(c)))
        }
        (Some(_), Some(_), _) => Err(OperandFault::CharLiteralTooLong),
    }
}

/// Parses `0x` hex, `0b` binary or signed decimal integers.
pub fn parse_number(token: &str) -> Result<i64, OperandFault> {
    let lower = token.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        let unsigned = lower.strip_prefix(['-', '+']).unwrap_or(&lower);
        if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
            return Err(OperandFault::MalformedNumber);
        }
        return lower.parse::<i64>().map_err(|_| OperandFault::MalformedNumber);
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(OperandFault::MalformedNumber);
    }
    i64::from_str_radix(digits, radix).map_err(|_| OperandFault::MalformedNumber)
}
