use std::path::PathBuf;

use crate::error::{Level, VmErrorExt};
use crate::location::Location;

/// Name used for sources that did not come from a file.
pub const ANONYMOUS: &str = "<input>";

#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, MissingScriptError> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| MissingScriptError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Script {
            name,
            path,
            content,
        })
    }

    /// Wraps in-memory source text.
    pub fn from_source(name: &str, content: &str) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl VmErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "tinyvm.script".to_string()
    }

    fn location(&self) -> Option<Location> {
        None
    }

    fn token(&self) -> Option<String> {
        None
    }
}
