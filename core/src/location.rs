use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The script the location is found in.
    pub file: String,
    /// The line number of the location (1-based).
    pub line: usize,
    /// The column number of the location (1-based).
    pub column: usize,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(file: String, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// Locates `token` inside the raw text of `line`. Falls back to the first
    /// non-blank column when the token is absent or not given.
    pub fn of_token(file: &str, line: usize, raw: &str, token: Option<&str>) -> Self {
        let found = token
            .filter(|t| !t.is_empty())
            .and_then(|t| raw.find(t))
            .or_else(|| raw.find(|c: char| !c.is_whitespace()))
            .unwrap_or(0);
        let column = raw[..found].chars().count() + 1;
        Self::new(file.to_string(), line, column)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
