//! Output document and run report.
//!
//! Files are written in one shot after creating any missing parent
//! directories. There is no temp-file rename: a crash mid-write can leave a
//! truncated file, and re-running the extraction is the recovery path.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{PersistError, PersistResult};
use crate::logs::{LogEntry, LOGGER};
use crate::models::EquipmentData;
use crate::transform::layout::PvColumns;
use crate::transform::pipeline::{ExtractionResult, SkippedRow};
use crate::transform::resolver::ResolvedColumns;

/// Default location of the output document.
pub const DEFAULT_OUTPUT_PATH: &str = "data/equipment_data.json";

/// The document as a JSON value: `{ "inverters": {...}, "photovoltaics": {...} }`.
pub fn to_document(data: &EquipmentData) -> Result<Value, serde_json::Error> {
    serde_json::to_value(data)
}

/// Pretty-printed document text.
pub fn to_json_pretty(data: &EquipmentData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Write the document to `path`, replacing any previous file.
pub fn persist(data: &EquipmentData, path: &Path) -> PersistResult<()> {
    write_json(&to_json_pretty(data)?, path)
}

fn write_json(content: &str, path: &Path) -> PersistResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Run report
// =============================================================================

/// Summary of one run, for humans and CI logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub generated_at: String,
    pub source: String,
    pub sheet: String,
    pub output: String,
    /// Header-resolved columns, `null` where a label was not found
    pub columns: ResolvedColumns,
    pub pv_columns: PvColumns,
    pub rows_processed: usize,
    pub inverter_count: usize,
    pub photovoltaic_count: usize,
    pub pv_skipped: Vec<SkippedRow>,
    pub warnings: Vec<String>,
    /// Most recent log entries at the time the report was built
    pub log: Vec<LogEntry>,
}

impl ExtractionReport {
    pub fn new(result: &ExtractionResult, source: &Path, output: &Path) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            sheet: result.sheet.clone(),
            output: output.display().to_string(),
            columns: result.columns.clone(),
            pv_columns: result.pv_columns,
            rows_processed: result.stats.rows_processed,
            inverter_count: result.data.inverters.len(),
            photovoltaic_count: result.data.photovoltaics.len(),
            pv_skipped: result.skipped.clone(),
            warnings: result.warnings.clone(),
            log: LOGGER.recent(),
        }
    }

    pub fn write(&self, path: &Path) -> PersistResult<()> {
        write_json(&serde_json::to_string_pretty(self)?, path)
    }
}
