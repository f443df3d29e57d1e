//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read process-wide environment variables.

use crate::constants::DEFAULT_DATA_FILE;
use crate::{MedicineError, MedicineResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The data file itself may not exist yet, but the directory that will hold it must.
    ///
    /// # Errors
    /// Returns `MedicineError::InvalidConfig` if:
    /// - the path is empty or names a directory,
    /// - the parent directory does not exist.
    pub fn new(data_file: PathBuf) -> MedicineResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(MedicineError::InvalidConfig(
                "data file path cannot be empty".into(),
            ));
        }

        if data_file.is_dir() {
            return Err(MedicineError::InvalidConfig(format!(
                "data file path is a directory: {}",
                data_file.display()
            )));
        }

        let parent = match data_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(MedicineError::InvalidConfig(format!(
                "data file directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(Self { data_file })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

/// Resolve the data file path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default `data.json`.
pub fn data_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
