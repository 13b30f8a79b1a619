//! TOML policy files.
//!
//! ```toml
//! [[operations]]
//! service = "AccountService"
//! operation = "GetBalance"
//! mode = "max_count"
//! parameter = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{LoggingMode, OperationKey, Policy, PolicyRegistry};

/// Errors raised while loading a policy file.
#[derive(Debug, Error)]
pub enum PolicyFileError {
    #[error("Failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One `[[operations]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub service: String,
    pub operation: String,
    pub mode: LoggingMode,
    #[serde(default)]
    pub parameter: u32,
}

impl PolicyEntry {
    pub fn key(&self) -> OperationKey {
        OperationKey::new(&self.service, &self.operation)
    }

    pub fn policy(&self) -> Policy {
        Policy::new(self.mode, self.parameter)
    }
}

/// Parsed contents of a policy file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default)]
    pub operations: Vec<PolicyEntry>,
}

impl PolicyFile {
    pub fn parse(contents: &str) -> Result<Self, PolicyFileError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PolicyFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Entries whose mode the decision engine does not implement.
    pub fn unsupported(&self) -> impl Iterator<Item = &PolicyEntry> {
        self.operations.iter().filter(|e| !e.mode.is_supported())
    }

    /// Build a registry; duplicate entries become conflicts.
    pub fn into_registry(self) -> PolicyRegistry {
        let mut registry = PolicyRegistry::new();
        for entry in &self.operations {
            registry.declare(entry.key(), entry.policy());
        }
        registry
    }
}

impl PolicyRegistry {
    /// Parse a TOML policy document into a registry.
    pub fn from_toml_str(contents: &str) -> Result<Self, PolicyFileError> {
        Ok(PolicyFile::parse(contents)?.into_registry())
    }

    /// Load a TOML policy file into a registry.
    pub fn load(path: &Path) -> Result<Self, PolicyFileError> {
        Ok(PolicyFile::load(path)?.into_registry())
    }
}
