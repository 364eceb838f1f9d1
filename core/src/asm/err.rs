use crate::error::{Level, VmErrorExt};
use crate::location::Location;

/// Assembly-time failure. The only fatal condition while assembling is a label
/// defined twice; everything else is validated when the instruction runs.
#[derive(Debug, Clone)]
pub struct ParseError {
    level: Level,
    message: String,
    issuer: String,
    label: String,
    location: Location,
}

impl ParseError {
    pub fn duplicate_label(label: &str, first_line: usize, location: Location) -> Self {
        ParseError {
            level: Level::Error,
            message: format!(
                "Duplicate label '{}' on line {} (first defined on line {}).",
                label, location.line, first_line
            ),
            issuer: "tinyvm.asm".to_string(),
            label: label.to_string(),
            location,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}

impl VmErrorExt for ParseError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<Location> {
        Some(self.location.clone())
    }

    fn token(&self) -> Option<String> {
        Some(self.label.clone())
    }
}
