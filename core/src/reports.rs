// Diagnostic reports for assembler and engine errors.
// Converts errors into structured reports that can be rendered with a source
// snippet for terminals or exported as JSON for tooling.

use console::Style;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fmt::Write;

use crate::error::{Level, VmError, VmErrorExt};
use crate::location::Location;
use crate::script::MissingScriptError;
use crate::vm::err::ExecutionFault;

/// Severity levels for reports
///
/// # Examples
/// ```
/// use tinyvm_core::reports::Severity;
/// let severity = Severity::Error;
/// assert_eq!(severity.to_string(), "ERROR");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        };
        write!(f, "{}", s)
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Critical => Severity::Fatal,
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
            Level::Info => Severity::Info,
        }
    }
}

/// Stable error code for programmatic handling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    pub fn new(code: u32) -> Self {
        ErrorCode(code)
    }
    pub fn as_str(&self) -> String {
        format!("E_{}", self.0)
    }
}

pub const E_PARSE: ErrorCode = ErrorCode(1);
pub const E_OPERAND: ErrorCode = ErrorCode(2);
pub const E_RESOLUTION: ErrorCode = ErrorCode(3);
pub const E_EXECUTION: ErrorCode = ErrorCode(4);
pub const E_RESOURCE_LIMIT: ErrorCode = ErrorCode(5);
pub const E_IO: ErrorCode = ErrorCode(6);

/// Report structure containing message, severity and location
///
/// # Examples
/// ```
/// use tinyvm_core::reports::{Report, Severity};
/// let report = Report::new("An error occurred", Severity::Error, None, None, None, None);
/// assert!(report.to_string().contains("An error occurred"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub message: String,
    pub severity: Severity,
    pub location: Option<Location>,
    pub code: Option<ErrorCode>,
    pub token: Option<String>,
    pub suggestion: Option<String>,
}

impl Report {
    pub fn new(
        message: &str,
        severity: Severity,
        location: Option<Location>,
        code: Option<ErrorCode>,
        token: Option<String>,
        suggestion: Option<String>,
    ) -> Self {
        Report {
            message: message.to_string(),
            severity,
            location,
            code,
            token,
            suggestion,
        }
    }

    pub fn error(message: &str, code: Option<ErrorCode>) -> Self {
        Report::new(message, Severity::Error, None, code, None, None)
    }

    /// Builds a report from any diagnostic without a stable code.
    pub fn from_ext(error: &dyn VmErrorExt) -> Self {
        Report::new(
            &error.message(),
            error.level().into(),
            error.location(),
            None,
            error.token(),
            None,
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the report with the offending source line and a caret under
    /// the token. `source` is the text the location refers to.
    pub fn render_with_source(&self, source: &str) -> String {
        let sev = match self.severity {
            Severity::Fatal => Style::new().on_red().white().bold(),
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Info => Style::new().blue().bold(),
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}",
            sev.apply_to(format!("[{}]", self.severity)),
            Style::new().bold().apply_to(&self.message)
        );

        if let Some(loc) = &self.location {
            let _ = writeln!(out, " --> {}", loc);
            if let Some(line_str) = source.lines().nth(loc.line.saturating_sub(1)) {
                let line_str = line_str.trim_end_matches('\r');
                let _ = writeln!(out, " {:4} | {}", loc.line, line_str);
                let caret_len = self.token.as_ref().map(|t| t.chars().count()).unwrap_or(1).max(1);
                let caret_line = format!(
                    "      | {}{}",
                    " ".repeat(loc.column.saturating_sub(1)),
                    "^".repeat(caret_len)
                );
                let _ = writeln!(out, "{}", Style::new().green().apply_to(caret_line));
            }
        }

        if let Some(s) = &self.suggestion {
            let _ = writeln!(out, "{}", Style::new().cyan().apply_to(format!("Suggestion: {}", s)));
        }
        out
    }
}

impl From<&VmError> for Report {
    fn from(error: &VmError) -> Self {
        let (code, suggestion) = match error {
            VmError::Parse(_) => (E_PARSE, Some("rename or remove one of the definitions")),
            VmError::Operand(_) => (E_OPERAND, None),
            VmError::Resolution(_) => (E_RESOLUTION, Some("define the label or fix the jump target")),
            VmError::Execution(e) => match e.fault() {
                ExecutionFault::PcOutOfBounds { .. } => (E_EXECUTION, Some("end the program with HALT")),
                _ => (E_EXECUTION, None),
            },
            VmError::ResourceLimit(_) => (E_RESOURCE_LIMIT, Some("check for loops that never reach HALT")),
        };
        let mut report = Report::from_ext(error);
        report.code = Some(code);
        report.suggestion = suggestion.map(str::to_string);
        report
    }
}

impl From<&MissingScriptError> for Report {
    fn from(error: &MissingScriptError) -> Self {
        let mut report = Report::from_ext(error);
        report.code = Some(E_IO);
        report.suggestion = Some("check the path and file permissions".to_string());
        report
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = if let Some(l) = &self.location {
            format!(" at {}", l)
        } else {
            "".to_string()
        };
        if let Some(code) = &self.code {
            write!(f, "[{}]{} ({}): {}", self.severity, loc, code, self.message)
        } else {
            write!(f, "[{}]{}: {}", self.severity, loc, self.message)
        }
    }
}

impl Error for Report {}

/// Collector that aggregates reports, with dedupe, counts and exporting
///
/// # Examples
/// ```
/// use tinyvm_core::reports::{Report, ReportCollector, Severity};
/// let mut collector = ReportCollector::new();
/// collector.push(Report::new("An error", Severity::Error, None, None, None, None));
/// assert_eq!(collector.exit_code(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportCollector {
    pub reports: Vec<Report>,
    seen: HashSet<(String, Option<String>)>, // dedupe key: (message, code)
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, r: Report) {
        let key = (r.message.clone(), r.code.as_ref().map(|c| c.as_str()));
        if self.seen.insert(key) {
            self.reports.push(r);
        }
    }

    pub fn extend(&mut self, others: impl IntoIterator<Item = Report>) {
        for r in others {
            self.push(r);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.reports
            .iter()
            .any(|r| matches!(r.severity, Severity::Error | Severity::Fatal))
    }

    /// (fatal, error, warning, info)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let mut f = 0;
        let mut e = 0;
        let mut w = 0;
        let mut i = 0;
        for r in &self.reports {
            match r.severity {
                Severity::Fatal => f += 1,
                Severity::Error => e += 1,
                Severity::Warning => w += 1,
                Severity::Info => i += 1,
            }
        }
        (f, e, w, i)
    }

    /// 0 = no issues, 1 = errors, 2 = fatals
    pub fn exit_code(&self) -> i32 {
        let (f, e, _, _) = self.counts();
        if f > 0 {
            2
        } else if e > 0 {
            1
        } else {
            0
        }
    }

    pub fn render_all(&self, source: &str) -> String {
        self.reports.iter().map(|r| r.render_with_source(source)).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.reports)
    }
}
