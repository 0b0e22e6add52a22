//! High-level pipeline API: workbook in, equipment document out.
//!
//! # Example
//!
//! ```rust,ignore
//! use equipdata::pipeline::{run, ExtractOptions};
//!
//! let result = run("TOOL_BOQ_BOM.xlsm", "data/equipment_data.json", &ExtractOptions::default())?;
//! println!("{} inverters, {} PV panels", result.data.inverters.len(), result.data.photovoltaics.len());
//! ```

use serde::Serialize;
use std::path::Path;

use super::extractor::{extract_row, PvOutcome, SkipReason};
use super::layout::{column_letter, PvColumns, DEFAULT_SHEET_NAME};
use super::resolver::ResolvedColumns;
use crate::error::{PersistError, PipelineResult, ValidationError};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::EquipmentData;
use crate::output::{persist, to_document};
use crate::parser::{read_sheet, Grid};
use crate::validation::validate_equipment_data;

/// Options for an extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Sheet holding the equipment data
    pub sheet_name: String,

    /// Positional columns for PV capacity and Voc
    pub pv_columns: PvColumns,

    /// Skip the schema check before writing
    pub skip_validation: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            pv_columns: PvColumns::default(),
            skip_validation: false,
        }
    }
}

/// Row counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    pub rows_processed: usize,
    /// Rows that produced an inverter record (duplicates included)
    pub inverter_rows: usize,
    pub pv_rows_extracted: usize,
    pub pv_rows_skipped: usize,
}

/// A row whose PV entry was dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 1-based spreadsheet row number
    pub row: usize,
    pub model: String,
    pub reason: SkipReason,
}

/// Result of an extraction
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub sheet: String,
    pub data: EquipmentData,
    pub columns: ResolvedColumns,
    pub pv_columns: PvColumns,
    pub stats: ExtractionStats,
    pub skipped: Vec<SkippedRow>,
    pub warnings: Vec<String>,
}

/// Extract both tables from an already-read sheet.
pub fn extract_grid(grid: &Grid, options: &ExtractOptions) -> ExtractionResult {
    let columns = ResolvedColumns::resolve(&grid.headers);
    let pv_columns = options.pv_columns;
    let mut warnings = Vec::new();

    print_column_mapping(&columns, pv_columns);

    if columns.inv_model.is_none() {
        warnings.push("No 'Inv Model' column: inverter table will be empty".to_string());
    }
    if columns.pv_model.is_none() {
        warnings.push("No 'PV Model' column: photovoltaic table will be empty".to_string());
    }

    let mut data = EquipmentData::new();
    let mut stats = ExtractionStats::default();
    let mut skipped = Vec::new();
    let mut drift_reported = false;

    for (index, row) in grid.rows.iter().enumerate() {
        stats.rows_processed += 1;
        let outcome = extract_row(row, &columns, pv_columns);

        if let Some((model, inverter)) = outcome.inverter {
            stats.inverter_rows += 1;
            data.upsert_inverter(model, inverter);
        }

        match outcome.pv {
            PvOutcome::NoModel => {}
            PvOutcome::Extracted { model, panel } => {
                stats.pv_rows_extracted += 1;
                data.upsert_photovoltaic(model, panel);
            }
            PvOutcome::Skipped { model, reason } => {
                if let SkipReason::RowTooNarrow { width, required } = &reason {
                    if !drift_reported {
                        drift_reported = true;
                        warnings.push(format!(
                            "Layout drift: rows are {} columns wide but PV columns {}/{} need {}",
                            width,
                            column_letter(pv_columns.capacity),
                            column_letter(pv_columns.voc),
                            required
                        ));
                    }
                }
                stats.pv_rows_skipped += 1;
                skipped.push(SkippedRow {
                    row: grid.row_number(index),
                    model,
                    reason,
                });
            }
        }
    }

    for warning in &warnings {
        log_warning(warning.as_str());
    }
    print_extraction_result(&data, &stats, &skipped);

    ExtractionResult {
        sheet: grid.sheet.clone(),
        data,
        columns,
        pv_columns,
        stats,
        skipped,
        warnings,
    }
}

/// Read the configured sheet and extract it.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> PipelineResult<ExtractionResult> {
    let path = path.as_ref();
    log_info(format!("📖 Reading {}", path.display()));

    let grid = read_sheet(path, &options.sheet_name)?;
    log_success(format!(
        "Sheet '{}': {} data rows, {} columns",
        grid.sheet,
        grid.rows.len(),
        grid.width()
    ));

    Ok(extract_grid(&grid, options))
}

/// Full run: read, extract, validate, write.
///
/// Every failure happens before the write, so an error never leaves a new
/// output file behind.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ExtractOptions,
) -> PipelineResult<ExtractionResult> {
    let result = extract_file(input, options)?;

    if options.skip_validation {
        log_info("(validation skipped)");
    } else {
        log_info("✔️  Validating output document...");
        let document = to_document(&result.data).map_err(PersistError::from)?;
        if let Err(errors) = validate_equipment_data(&document) {
            log_error(format!("Document rejected: {} schema violations", errors.len()));
            return Err(ValidationError::SchemaError { errors }.into());
        }
        log_success("Document matches schema");
    }

    persist(&result.data, output.as_ref())?;
    log_success(format!("💾 Saved to {}", output.as_ref().display()));

    Ok(result)
}

fn print_column_mapping(columns: &ResolvedColumns, pv_columns: PvColumns) {
    log_info("🗺️  Column mapping:");
    for (label, column) in columns.entries() {
        match column {
            Some(c) => log_info_indent(format!("{} → {} ({})", label, c.letter(), c.index), 1),
            None => log_info_indent(format!("{} → not found", label), 1),
        }
    }
    log_info_indent(
        format!("PV capacity → {} (pinned)", column_letter(pv_columns.capacity)),
        1,
    );
    log_info_indent(format!("PV Voc → {} (pinned)", column_letter(pv_columns.voc)), 1);
}

fn print_extraction_result(data: &EquipmentData, stats: &ExtractionStats, skipped: &[SkippedRow]) {
    log_success(format!(
        "{} rows → {} inverters, {} PV panels",
        stats.rows_processed,
        data.inverters.len(),
        data.photovoltaics.len()
    ));

    if !skipped.is_empty() {
        log_warning(format!("{} PV rows skipped", skipped.len()));
        for skip in skipped.iter().take(5) {
            log_info_indent(format!("row {} ({}): {}", skip.row, skip.model, skip.reason), 1);
        }
        if skipped.len() > 5 {
            log_info_indent(format!("... +{}", skipped.len() - 5), 1);
        }
    }
}
