//! Extraction module.
//!
//! - Layout: header labels and pinned PV column positions
//! - Resolver: header label → column
//! - Extractor: one row → inverter / PV contributions
//! - Pipeline: whole-sheet extraction and the full run

pub mod extractor;
pub mod layout;
pub mod pipeline;
pub mod resolver;

pub use extractor::{extract_row, PvOutcome, RowOutcome, SkipReason};
pub use layout::{PvColumns, DEFAULT_SHEET_NAME};
pub use pipeline::*;
pub use resolver::{resolve, ColumnRef, ResolvedColumns};
