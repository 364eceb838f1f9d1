use crate::error::{Level, VmErrorExt};
use crate::location::Location;
use crate::vm::operand::OperandFault;

/// An operand that is missing, surplus, of a kind the opcode does not accept,
/// out of range, or a malformed literal.
#[derive(Debug, Clone)]
pub struct OperandError {
    opcode: String,
    token: Option<String>,
    fault: OperandFault,
    location: Location,
}

impl OperandError {
    pub fn new(opcode: &str, token: Option<&str>, fault: OperandFault, location: Location) -> Self {
        OperandError {
            opcode: opcode.to_string(),
            token: token.map(str::to_string),
            fault,
            location,
        }
    }

    pub fn opcode(&self) -> &str {
        &self.opcode
    }

    pub fn fault(&self) -> &OperandFault {
        &self.fault
    }
}

impl std::fmt::Display for OperandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message(), self.location)
    }
}

impl std::error::Error for OperandError {}

impl VmErrorExt for OperandError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        match &self.token {
            Some(token) => format!("{}: {} '{}' on line {}.", self.opcode, self.fault, token, self.location.line),
            None => format!("{}: {} on line {}.", self.opcode, self.fault, self.location.line),
        }
    }

    fn issuer(&self) -> String {
        "tinyvm.operand".to_string()
    }

    fn location(&self) -> Option<Location> {
        Some(self.location.clone())
    }

    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// A taken jump whose label is not in the label table.
#[derive(Debug, Clone)]
pub struct ResolutionError {
    opcode: String,
    label: String,
    location: Location,
}

impl ResolutionError {
    pub fn new(opcode: &str, label: &str, location: Location) -> Self {
        ResolutionError {
            opcode: opcode.to_string(),
            label: label.to_string(),
            location,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message(), self.location)
    }
}

impl std::error::Error for ResolutionError {}

impl VmErrorExt for ResolutionError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        format!("{}: unknown label '{}' on line {}.", self.opcode, self.label, self.location.line)
    }

    fn issuer(&self) -> String {
        "tinyvm.resolve".to_string()
    }

    fn location(&self) -> Option<Location> {
        Some(self.location.clone())
    }

    fn token(&self) -> Option<String> {
        Some(self.label.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFault {
    NoProgram,
    PcOutOfBounds { pc: usize, len: usize },
    UnknownOpcode,
}

impl std::fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionFault::NoProgram => write!(f, "No program loaded."),
            ExecutionFault::PcOutOfBounds { pc, len } => {
                write!(f, "Program counter out of bounds ({}; program has {} instructions).", pc, len)
            }
            ExecutionFault::UnknownOpcode => write!(f, "Unknown opcode."),
        }
    }
}

/// Machine-level failure: nothing loaded, the program counter left the
/// program, or an opcode the machine does not know.
#[derive(Debug, Clone)]
pub struct ExecutionError {
    fault: ExecutionFault,
    opcode: Option<String>,
    location: Option<Location>,
}

impl ExecutionError {
    pub fn no_program() -> Self {
        ExecutionError {
            fault: ExecutionFault::NoProgram,
            opcode: None,
            location: None,
        }
    }

    /// `location` is the last instruction of the program, the one execution
    /// fell off of.
    pub fn pc_out_of_bounds(pc: usize, len: usize, location: Option<Location>) -> Self {
        ExecutionError {
            fault: ExecutionFault::PcOutOfBounds { pc, len },
            opcode: None,
            location,
        }
    }

    pub fn unknown_opcode(opcode: &str, location: Location) -> Self {
        ExecutionError {
            fault: ExecutionFault::UnknownOpcode,
            opcode: Some(opcode.to_string()),
            location: Some(location),
        }
    }

    pub fn fault(&self) -> &ExecutionFault {
        &self.fault
    }
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message(), loc),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ExecutionError {}

impl VmErrorExt for ExecutionError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        match (&self.fault, &self.opcode, &self.location) {
            (ExecutionFault::UnknownOpcode, Some(op), Some(loc)) => {
                format!("Unknown opcode '{}' on line {}.", op, loc.line)
            }
            (fault, _, _) => fault.to_string(),
        }
    }

    fn issuer(&self) -> String {
        "tinyvm.exec".to_string()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }

    fn token(&self) -> Option<String> {
        self.opcode.clone()
    }
}

/// The cycle cap was exceeded. Raised instead of a quiet halt so runaway
/// programs are always visible to the caller.
#[derive(Debug, Clone)]
pub struct ResourceLimitError {
    max_cycles: usize,
    location: Location,
}

impl ResourceLimitError {
    pub fn new(max_cycles: usize, location: Location) -> Self {
        ResourceLimitError { max_cycles, location }
    }

    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }
}

impl std::fmt::Display for ResourceLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message(), self.location)
    }
}

impl std::error::Error for ResourceLimitError {}

impl VmErrorExt for ResourceLimitError {
    fn level(&self) -> Level {
        Level::Critical
    }

    fn message(&self) -> String {
        format!("Cycle limit of {} exceeded.", self.max_cycles)
    }

    fn issuer(&self) -> String {
        "tinyvm.exec".to_string()
    }

    fn location(&self) -> Option<Location> {
        Some(self.location.clone())
    }

    fn token(&self) -> Option<String> {
        None
    }
}
