//! # Equipdata - equipment specification extraction
//!
//! Reads the `DATA EQUIP` sheet of the BOQ/BOM workbook and normalizes it into
//! a JSON document of inverter and PV panel parameters keyed by model name.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│   Parser    │────▶│  Transform  │────▶│ Equipment   │
//! │ (xlsm/csv)  │     │   (grid)    │     │ (resolve +  │     │   JSON      │
//! └─────────────┘     └─────────────┘     │  extract)   │     └─────────────┘
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use equipdata::{run, ExtractOptions};
//!
//! let result = run("TOOL_BOQ_BOM.xlsm", "data/equipment_data.json", &ExtractOptions::default())?;
//! println!("{} inverters", result.data.inverters.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Inverter / PV records and their tables
//! - [`parser`] - Spreadsheet reading
//! - [`transform`] - Column resolution, row extraction, pipeline
//! - [`output`] - Document persistence and run report
//! - [`validation`] - Output schema check
//! - [`config`] - Environment settings
//! - [`logs`] - Run log

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Configuration
pub mod config;

// Parsing
pub mod parser;

// Extraction
pub mod transform;

// Output
pub mod output;

// Validation
pub mod validation;

pub use transform::pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, PersistError, PipelineError, ValidationError, WorkbookError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{EquipmentData, Inverter, Photovoltaic};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{read_sheet, sheet_names, Grid};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use transform::{
    extract_file,
    extract_grid,
    extract_row,
    resolve,
    run,
    ColumnRef,
    ExtractOptions,
    ExtractionResult,
    ExtractionStats,
    PvColumns,
    PvOutcome,
    ResolvedColumns,
    SkipReason,
    SkippedRow,
};

// =============================================================================
// Re-exports - Output & validation
// =============================================================================

pub use output::{persist, to_document, ExtractionReport};
pub use validation::{is_valid_equipment_data, validate_equipment_data};

pub use config::Settings;
