//! Header-based column resolution.
//!
//! Labels match when they are equal after trimming and lowercasing. There is
//! no partial or fuzzy matching: a miss is reported as `None` and the caller
//! decides what absence means.

use serde::Serialize;

use super::layout::{column_letter, headers};
use crate::parser::trim_text;

/// A column found in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    /// Zero-based position from column A.
    pub index: usize,
    /// Header label as written in the sheet.
    pub label: String,
}

impl ColumnRef {
    pub fn letter(&self) -> String {
        column_letter(self.index)
    }
}

fn normalize(label: &str) -> String {
    trim_text(label).to_lowercase()
}

/// Find the first column whose label matches `target`.
pub fn resolve<S: AsRef<str>>(header_row: &[S], target: &str) -> Option<ColumnRef> {
    let wanted = normalize(target);
    header_row
        .iter()
        .position(|label| normalize(label.as_ref()) == wanted)
        .map(|index| ColumnRef {
            index,
            label: header_row[index].as_ref().to_string(),
        })
}

/// Every header-addressed field, resolved once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColumns {
    pub inv_model: Option<ColumnRef>,
    pub inv_min_voltage: Option<ColumnRef>,
    pub inv_max_voltage: Option<ColumnRef>,
    pub inv_num_inputs: Option<ColumnRef>,
    pub inv_capacity: Option<ColumnRef>,
    pub pv_model: Option<ColumnRef>,
}

impl ResolvedColumns {
    pub fn resolve<S: AsRef<str>>(header_row: &[S]) -> Self {
        Self {
            inv_model: resolve(header_row, headers::INV_MODEL),
            inv_min_voltage: resolve(header_row, headers::INV_MIN_VOLTAGE),
            inv_max_voltage: resolve(header_row, headers::INV_MAX_VOLTAGE),
            inv_num_inputs: resolve(header_row, headers::INV_NUM_INPUTS),
            inv_capacity: resolve(header_row, headers::INV_CAPACITY),
            pv_model: resolve(header_row, headers::PV_MODEL),
        }
    }

    /// (canonical label, resolution) pairs, for reporting.
    pub fn entries(&self) -> [(&'static str, Option<&ColumnRef>); 6] {
        [
            (headers::INV_MODEL, self.inv_model.as_ref()),
            (headers::INV_MIN_VOLTAGE, self.inv_min_voltage.as_ref()),
            (headers::INV_MAX_VOLTAGE, self.inv_max_voltage.as_ref()),
            (headers::INV_NUM_INPUTS, self.inv_num_inputs.as_ref()),
            (headers::INV_CAPACITY, self.inv_capacity.as_ref()),
            (headers::PV_MODEL, self.pv_model.as_ref()),
        ]
    }

    /// Labels that were not found in the header row.
    pub fn missing(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, col)| col.is_none())
            .map(|(label, _)| label)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<&'static str> {
        vec![
            "Inv Model",
            "Min Voltage Operating",
            " MAX VOLTAGE OPERATING ",
            "Num Inputs",
            "Capacity",
            "PV Model",
            "Capacity",
        ]
    }

    #[test]
    fn test_trim_and_case_insensitive() {
        let h = header();
        assert_eq!(resolve(&h, "max voltage operating").unwrap().index, 2);
        assert_eq!(resolve(&h, "  pv model").unwrap().index, 5);
    }

    #[test]
    fn test_byte_order_mark_label() {
        let h = ["\u{feff}Inv Model", "Capacity"];
        assert_eq!(resolve(&h, "Inv Model").unwrap().index, 0);
    }

    #[test]
    fn test_variants_resolve_to_same_column() {
        let h = header();
        assert_eq!(resolve(&h, "inv model"), resolve(&h, "Inv Model "));
        assert_eq!(resolve(&h, "inv model"), resolve(&h, "inv model"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let col = resolve(&header(), "Capacity").unwrap();
        assert_eq!(col.index, 4);
        assert_eq!(col.letter(), "E");
    }

    #[test]
    fn test_no_partial_match() {
        let h = vec!["Inv Model Name", "Voc"];
        assert!(resolve(&h, "Inv Model").is_none());
        assert!(resolve(&h, "Model").is_none());
    }

    #[test]
    fn test_keeps_sheet_label() {
        let col = resolve(&header(), "Max voltage Operating").unwrap();
        assert_eq!(col.label, " MAX VOLTAGE OPERATING ");
    }

    #[test]
    fn test_resolve_all_and_missing() {
        let h = vec!["Inv Model".to_string(), "Capacity".to_string()];
        let cols = ResolvedColumns::resolve(&h);

        assert_eq!(cols.inv_model.as_ref().unwrap().index, 0);
        assert_eq!(cols.inv_capacity.as_ref().unwrap().index, 1);
        assert_eq!(
            cols.missing(),
            vec!["Min Voltage Operating", "Max voltage Operating", "Num Inputs", "PV Model"]
        );
    }
}
