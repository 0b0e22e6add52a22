//! Error types for the equipment extraction pipeline.
//!
//! Run-level failures are grouped by concern:
//!
//! - [`WorkbookError`] - opening and reading the source spreadsheet
//! - [`ConfigError`] - environment / CLI configuration
//! - [`ValidationError`] - output document schema check
//! - [`PersistError`] - writing the output document
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Row-level problems never surface here: a PV row that cannot be read is
//! reported as a [`crate::transform::extractor::PvOutcome::Skipped`] instead.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while opening or reading the source spreadsheet.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The spreadsheet library could not open the file.
    #[error("Cannot open workbook '{}': {message}", .path.display())]
    Open { path: PathBuf, message: String },

    /// No sheet matches the requested name.
    #[error("Sheet '{wanted}' not found (available: {})", .available.join(", "))]
    SheetNotFound { wanted: String, available: Vec<String> },

    /// The sheet exists but its cells could not be read.
    #[error("Cannot read sheet '{sheet}': {message}")]
    Read { sheet: String, message: String },

    /// The sheet has no rows at all (not even a header row).
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV export.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while assembling run settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No input path from the command line nor from `EQUIPDATA_INPUT`.
    #[error("No input workbook given (pass a path or set EQUIPDATA_INPUT)")]
    MissingInput,

    /// A setting has a value that cannot be interpreted.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from the output document schema check.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {}", .errors.join("; "))]
    SchemaError { errors: Vec<String> },
}

// =============================================================================
// Persist Errors
// =============================================================================

/// Errors while writing the output document or the run report.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Directory creation or file write failed.
    #[error("Cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
/// Any of these aborts the run before the output file is touched.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source spreadsheet error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Output document failed the schema check.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Output could not be written.
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for persistence.
pub type PersistResult<T> = Result<T, PersistError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // WorkbookError -> PipelineError
        let err = WorkbookError::EmptySheet("DATA EQUIP".into());
        let pipeline_err: PipelineError = err.into();
        assert!(pipeline_err.to_string().contains("DATA EQUIP"));

        // ConfigError -> PipelineError
        let pipeline_err: PipelineError = ConfigError::MissingInput.into();
        assert!(pipeline_err.to_string().contains("EQUIPDATA_INPUT"));
    }

    #[test]
    fn test_sheet_not_found_lists_available() {
        let err = WorkbookError::SheetNotFound {
            wanted: "DATA EQUIP".into(),
            available: vec!["BOQ".into(), "BOM".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("DATA EQUIP"));
        assert!(msg.contains("BOQ, BOM"));
    }

    #[test]
    fn test_validation_error_format() {
        let err = ValidationError::SchemaError {
            errors: vec!["missing inverters".into(), "bad voc".into()],
        };
        assert_eq!(err.to_string(), "Validation failed: missing inverters; bad voc");
    }
}
