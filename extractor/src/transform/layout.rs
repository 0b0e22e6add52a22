//! Source sheet layout.
//!
//! Header labels for the fields that are looked up by name, and the pinned
//! column positions for the PV fields whose headers are blank or duplicated
//! in the workbook. When the workbook gains or loses columns, this is the
//! one place to update.

use serde::Serialize;

/// Sheet read by default.
pub const DEFAULT_SHEET_NAME: &str = "DATA EQUIP";

/// Header labels, compared trimmed and case-insensitively.
pub mod headers {
    pub const INV_MODEL: &str = "Inv Model";
    pub const INV_MIN_VOLTAGE: &str = "Min Voltage Operating";
    pub const INV_MAX_VOLTAGE: &str = "Max voltage Operating";
    pub const INV_NUM_INPUTS: &str = "Num Inputs";
    pub const INV_CAPACITY: &str = "Capacity";
    pub const PV_MODEL: &str = "PV Model";
}

/// Zero-based PV column positions of the 2025 workbook.
pub mod cols {
    /// Column AM, panel capacity in W.
    pub const PV_CAPACITY: usize = 38;
    /// Column AP, open-circuit voltage.
    pub const PV_VOC: usize = 41;
}

/// Column count of an Excel sheet (A..XFD).
pub const MAX_COLUMNS: usize = 16_384;

/// Positional columns used for the PV family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvColumns {
    pub capacity: usize,
    pub voc: usize,
}

impl PvColumns {
    /// Minimum row width needed to read both columns.
    pub fn required_width(&self) -> usize {
        self.capacity.max(self.voc).saturating_add(1)
    }
}

impl Default for PvColumns {
    fn default() -> Self {
        Self {
            capacity: cols::PV_CAPACITY,
            voc: cols::PV_VOC,
        }
    }
}

/// Spreadsheet column letter for a zero-based index (0 -> "A", 38 -> "AM").
pub fn column_letter(index: usize) -> String {
    let mut n = index.saturating_add(1);
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Parse a column reference: a zero-based index ("38") or letters ("AM", "am").
///
/// Anything past the last sheet column (XFD) is rejected.
pub fn parse_column_ref(s: &str) -> Option<usize> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(index) = s.parse::<usize>() {
        return (index < MAX_COLUMNS).then_some(index);
    }
    if s.len() > 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let n = s
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    (n <= MAX_COLUMNS).then(|| n - 1)
}
