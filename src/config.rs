//! Shell configuration
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArborError, Result};
use crate::registry::Messages;
use crate::version::{DEFAULT_ROOT_MESSAGE, DEFAULT_SNAPSHOT_MESSAGE};

/// How the shell prints results
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Message attached to every new resource's root version
    pub root_message: String,
    /// Message used by `SNAPSHOT` when none is given
    pub snapshot_message: String,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub output: OutputFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            root_message: DEFAULT_ROOT_MESSAGE.to_string(),
            snapshot_message: DEFAULT_SNAPSHOT_MESSAGE.to_string(),
            log_level: "warn".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl ShellConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            ArborError::Validation(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: ShellConfig = serde_json::from_slice(data)
            .map_err(|e| ArborError::Validation(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_message.is_empty() {
            return Err(ArborError::Validation(
                "root_message must not be empty".to_string(),
            ));
        }
        if self.snapshot_message.is_empty() {
            return Err(ArborError::Validation(
                "snapshot_message must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn messages(&self) -> Messages {
        Messages {
            root: self.root_message.clone(),
            snapshot: self.snapshot_message.clone(),
        }
    }
}
