use std::fmt;

use crate::asm::err::ParseError;
use crate::location::Location;
use crate::vm::err::{ExecutionError, OperandError, ResolutionError, ResourceLimitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

/// Common diagnostic surface shared by every error the assembler and the
/// engine can raise.
pub trait VmErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    fn issuer(&self) -> String;
    fn location(&self) -> Option<Location>;
    /// The raw source token the error is about, if there is one.
    fn token(&self) -> Option<String>;
}

impl fmt::Debug for dyn VmErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };
        let token_str = self.token().map(|t| format!("'{}'", t)).unwrap_or_else(|| "token:none".to_string());

        write!(
            f,
            "TINYVM | {} | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            token_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn VmErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Every failure a load, step or run can surface.
#[derive(Debug, Clone)]
pub enum VmError {
    Parse(ParseError),
    Operand(OperandError),
    Resolution(ResolutionError),
    Execution(ExecutionError),
    ResourceLimit(ResourceLimitError),
}

impl VmError {
    fn inner(&self) -> &dyn VmErrorExt {
        match self {
            VmError::Parse(e) => e,
            VmError::Operand(e) => e,
            VmError::Resolution(e) => e,
            VmError::Execution(e) => e,
            VmError::ResourceLimit(e) => e,
        }
    }

    /// Short kind name, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            VmError::Parse(_) => "parse",
            VmError::Operand(_) => "operand",
            VmError::Resolution(_) => "resolution",
            VmError::Execution(_) => "execution",
            VmError::ResourceLimit(_) => "resource-limit",
        }
    }

    /// 1-based source line, when the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        self.location().map(|loc| loc.line)
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Parse(e) => fmt::Display::fmt(e, f),
            VmError::Operand(e) => fmt::Display::fmt(e, f),
            VmError::Resolution(e) => fmt::Display::fmt(e, f),
            VmError::Execution(e) => fmt::Display::fmt(e, f),
            VmError::ResourceLimit(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for VmError {}

impl VmErrorExt for VmError {
    fn level(&self) -> Level {
        self.inner().level()
    }

    fn message(&self) -> String {
        self.inner().message()
    }

    fn issuer(&self) -> String {
        self.inner().issuer()
    }

    fn location(&self) -> Option<Location> {
        self.inner().location()
    }

    fn token(&self) -> Option<String> {
        self.inner().token()
    }
}

impl From<ParseError> for VmError {
    fn from(e: ParseError) -> Self {
        VmError::Parse(e)
    }
}

impl From<OperandError> for VmError {
    fn from(e: OperandError) -> Self {
        VmError::Operand(e)
    }
}

impl From<ResolutionError> for VmError {
    fn from(e: ResolutionError) -> Self {
        VmError::Resolution(e)
    }
}

impl From<ExecutionError> for VmError {
    fn from(e: ExecutionError) -> Self {
        VmError::Execution(e)
    }
}

impl From<ResourceLimitError> for VmError {
    fn from(e: ResourceLimitError) -> Self {
        VmError::ResourceLimit(e)
    }
}
