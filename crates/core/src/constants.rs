//! Constants used throughout the medstock core crate.
//!
//! This module contains path, filename and document field constants to ensure
//! consistency across the codebase.

/// Default location of the JSON document when no explicit file is configured.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Top-level document field holding the medicine records.
pub const MEDICINES_FIELD: &str = "medicines";

/// Extension appended to the data file name while a new document is being written.
pub const TEMP_FILE_EXTENSION: &str = "tmp";
