//! file: core/src/config.rs
//! description: machine sizing and limits.
//!
//! A `VmConfig` fixes the register file, memory size and cycle cap of one VM
//! instance for its whole lifetime. Configs can be read from JSON files; any
//! field left out of the file keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGISTER_COUNT: usize = 4;
pub const DEFAULT_MEMORY_SIZE: usize = 128;
pub const DEFAULT_MAX_CYCLES: usize = 4096;

/// Upper bound on memory cells.
pub const MAX_MEMORY_SIZE: usize = 65536;
/// Upper bound on the register file; register names are `r0`..`r255`.
pub const MAX_REGISTER_COUNT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    #[serde(default = "default_register_count")]
    pub register_count: usize,
    #[serde(default = "default_memory_size")]
    pub memory_size: usize,
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

fn default_register_count() -> usize { DEFAULT_REGISTER_COUNT }
fn default_memory_size() -> usize { DEFAULT_MEMORY_SIZE }
fn default_max_cycles() -> usize { DEFAULT_MAX_CYCLES }

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            register_count: DEFAULT_REGISTER_COUNT,
            memory_size: DEFAULT_MEMORY_SIZE,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

impl VmConfig {
    /// Load a config from a JSON file path and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<VmConfig, String> {
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("read config: {}", e))?;
        Self::from_json(&raw)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(raw: &str) -> Result<VmConfig, String> {
        let config: VmConfig = serde_json::from_str(raw).map_err(|e| format!("parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.register_count == 0 {
            return Err("register_count must be at least 1".to_string());
        }
        if self.register_count > MAX_REGISTER_COUNT {
            return Err(format!(
                "register_count {} exceeds the maximum of {}",
                self.register_count, MAX_REGISTER_COUNT
            ));
        }
        if self.memory_size == 0 {
            return Err("memory_size must be at least 1".to_string());
        }
        if self.memory_size > MAX_MEMORY_SIZE {
            return Err(format!("memory_size {} exceeds the maximum of {}", self.memory_size, MAX_MEMORY_SIZE));
        }
        if self.max_cycles == 0 {
            return Err("max_cycles must be at least 1".to_string());
        }
        Ok(())
    }
}
