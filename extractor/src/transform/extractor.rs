//! Row extraction.
//!
//! Each data row can feed the inverter table, the PV table, both or neither.
//! The two paths coerce numbers differently:
//!
//! - inverter fields are lenient: anything missing or unreadable becomes `0`;
//! - PV fields are strict: a value that is present but not a number drops the
//!   whole PV entry of that row (reported as [`PvOutcome::Skipped`]).
//!
//! Neither path can fail the run.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::layout::{column_letter, PvColumns};
use super::resolver::{ColumnRef, ResolvedColumns};
use crate::models::{Inverter, Photovoltaic};
use crate::parser::{cell_text, trim_text};

/// A cell that is present but cannot be read as a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("'{0}' is not a finite number")]
    NonFinite(String),
}

/// Why a row's PV entry was dropped.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkipReason {
    /// The row ends before the positional PV columns.
    #[error("row has {width} columns, PV columns need {required}")]
    RowTooNarrow { width: usize, required: usize },

    /// A positional PV cell could not be coerced.
    #[error("column {column}: {message}")]
    InvalidValue { column: String, message: String },
}

/// PV side of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum PvOutcome {
    /// No PV model on this row.
    NoModel,
    Extracted { model: String, panel: Photovoltaic },
    Skipped { model: String, reason: SkipReason },
}

/// Everything one row contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub inverter: Option<(String, Inverter)>,
    pub pv: PvOutcome,
}

// =============================================================================
// Coercion
// =============================================================================

/// Strict numeric coercion. Missing (null or blank) reads as `0`.
pub fn strict_number(value: &Value) -> Result<f64, CoercionError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| CoercionError::NonFinite(n.to_string())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(f),
                Ok(_) => Err(CoercionError::NonFinite(s.clone())),
                Err(_) => Err(CoercionError::NotNumeric(s.clone())),
            }
        }
        other => Err(CoercionError::NotNumeric(other.to_string())),
    }
}

/// Lenient numeric coercion: anything unreadable is `0`.
pub fn lenient_number(value: &Value) -> f64 {
    strict_number(value).unwrap_or(0.0)
}

/// Trimmed model name at `column`; `None` if the column is unresolved, the
/// cell is missing, or the name is blank.
fn model_at(row: &[Value], column: Option<&ColumnRef>) -> Option<String> {
    let cell = row.get(column?.index)?;
    let model = trim_text(&cell_text(cell)?).to_string();
    if model.is_empty() {
        None
    } else {
        Some(model)
    }
}

fn lenient_at(row: &[Value], column: Option<&ColumnRef>) -> f64 {
    column
        .and_then(|c| row.get(c.index))
        .map(lenient_number)
        .unwrap_or(0.0)
}

// =============================================================================
// Extraction
// =============================================================================

/// Inverter contribution of a row.
pub fn extract_inverter(row: &[Value], columns: &ResolvedColumns) -> Option<(String, Inverter)> {
    let model = model_at(row, columns.inv_model.as_ref())?;
    let inverter = Inverter {
        min_voltage: lenient_at(row, columns.inv_min_voltage.as_ref()),
        max_voltage: lenient_at(row, columns.inv_max_voltage.as_ref()),
        num_inputs: lenient_at(row, columns.inv_num_inputs.as_ref()),
        capacity_kw: lenient_at(row, columns.inv_capacity.as_ref()),
    };
    Some((model, inverter))
}

/// PV contribution of a row, read from the pinned positional columns.
pub fn extract_photovoltaic(row: &[Value], columns: &ResolvedColumns, pv: PvColumns) -> PvOutcome {
    let Some(model) = model_at(row, columns.pv_model.as_ref()) else {
        return PvOutcome::NoModel;
    };

    match read_pv_values(row, pv) {
        Ok((capacity, voc)) => PvOutcome::Extracted {
            model,
            panel: Photovoltaic::from_raw(capacity, voc),
        },
        Err(reason) => PvOutcome::Skipped { model, reason },
    }
}

fn read_pv_values(row: &[Value], pv: PvColumns) -> Result<(f64, f64), SkipReason> {
    if row.len() < pv.required_width() {
        return Err(SkipReason::RowTooNarrow {
            width: row.len(),
            required: pv.required_width(),
        });
    }

    let read = |index: usize| {
        strict_number(&row[index]).map_err(|e| SkipReason::InvalidValue {
            column: column_letter(index),
            message: e.to_string(),
        })
    };
    Ok((read(pv.capacity)?, read(pv.voc)?))
}

/// Both contributions of a row.
pub fn extract_row(row: &[Value], columns: &ResolvedColumns, pv: PvColumns) -> RowOutcome {
    RowOutcome {
        inverter: extract_inverter(row, columns),
        pv: extract_photovoltaic(row, columns, pv),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inverter_columns() -> ResolvedColumns {
        ResolvedColumns::resolve(&[
            "Inv Model",
            "Min Voltage Operating",
            "Max voltage Operating",
            "Num Inputs",
            "Capacity",
        ])
    }

    /// 42-wide row: PV model in column 0, capacity and Voc at AM/AP.
    fn pv_row(model: Value, capacity: Value, voc: Value) -> Vec<Value> {
        let mut row = vec![Value::Null; 42];
        row[0] = model;
        row[38] = capacity;
        row[41] = voc;
        row
    }

    fn pv_columns() -> ResolvedColumns {
        ResolvedColumns::resolve(&["PV Model"])
    }

    #[test]
    fn test_inverter_full_row() {
        let row = vec![json!("SUN2000-100KTL"), json!(500), json!(800), json!(1), json!(110)];
        let (model, inv) = extract_inverter(&row, &inverter_columns()).unwrap();

        assert_eq!(model, "SUN2000-100KTL");
        assert_eq!(
            inv,
            Inverter { min_voltage: 500.0, max_voltage: 800.0, num_inputs: 1.0, capacity_kw: 110.0 }
        );
    }

    #[test]
    fn test_inverter_garbage_and_missing_become_zero() {
        let row = vec![json!("  X1 "), json!("n/a"), Value::Null, json!("2"), json!([1])];
        let (model, inv) = extract_inverter(&row, &inverter_columns()).unwrap();

        assert_eq!(model, "X1");
        assert_eq!(inv.min_voltage, 0.0);
        assert_eq!(inv.max_voltage, 0.0);
        assert_eq!(inv.num_inputs, 2.0);
        assert_eq!(inv.capacity_kw, 0.0);
    }

    #[test]
    fn test_inverter_unresolved_fields_default() {
        let cols = ResolvedColumns::resolve(&["Inv Model"]);
        let (_, inv) = extract_inverter(&[json!("X1")], &cols).unwrap();
        assert_eq!(inv, Inverter::default());
    }

    #[test]
    fn test_inverter_blank_model_skipped() {
        let cols = inverter_columns();
        assert!(extract_inverter(&[json!("   "), json!(1)], &cols).is_none());
        assert!(extract_inverter(&[Value::Null, json!(1)], &cols).is_none());
        assert!(extract_inverter(&[json!("X1")], &ResolvedColumns::default()).is_none());
    }

    #[test]
    fn test_model_byte_order_mark_trimmed() {
        let cols = inverter_columns();
        let (model, _) = extract_inverter(&[json!("\u{feff}SUN2000 ")], &cols).unwrap();
        assert_eq!(model, "SUN2000");
        assert!(extract_inverter(&[json!("\u{feff}")], &cols).is_none());
    }

    #[test]
    fn test_numeric_model_name() {
        let (model, _) = extract_inverter(&[json!(540.0)], &inverter_columns()).unwrap();
        assert_eq!(model, "540");
    }

    #[test]
    fn test_pv_extracted() {
        let row = pv_row(json!("JA-550"), json!(550), json!("49.9"));
        let outcome = extract_photovoltaic(&row, &pv_columns(), PvColumns::default());

        assert_eq!(
            outcome,
            PvOutcome::Extracted {
                model: "JA-550".into(),
                panel: Photovoltaic { power_kwp: 550.0 / 1000.0, voc: 49.9 },
            }
        );
    }

    #[test]
    fn test_pv_missing_values_are_zero() {
        let row = pv_row(json!("JA-550"), Value::Null, json!(" "));
        match extract_photovoltaic(&row, &pv_columns(), PvColumns::default()) {
            PvOutcome::Extracted { panel, .. } => assert_eq!(panel, Photovoltaic::default()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_pv_garbage_skips_entry() {
        let row = pv_row(json!("JA-550"), json!("550W"), json!(49));
        match extract_photovoltaic(&row, &pv_columns(), PvColumns::default()) {
            PvOutcome::Skipped { model, reason } => {
                assert_eq!(model, "JA-550");
                assert!(matches!(reason, SkipReason::InvalidValue { ref column, .. } if column == "AM"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_pv_narrow_row_skips_entry() {
        let row = vec![json!("JA-550"), json!(550)];
        let outcome = extract_photovoltaic(&row, &pv_columns(), PvColumns::default());
        assert_eq!(
            outcome,
            PvOutcome::Skipped {
                model: "JA-550".into(),
                reason: SkipReason::RowTooNarrow { width: 2, required: 42 },
            }
        );
    }

    #[test]
    fn test_pv_no_model() {
        let row = pv_row(Value::Null, json!(550), json!(49));
        assert_eq!(
            extract_photovoltaic(&row, &pv_columns(), PvColumns::default()),
            PvOutcome::NoModel
        );
        assert_eq!(
            extract_photovoltaic(&row, &ResolvedColumns::default(), PvColumns::default()),
            PvOutcome::NoModel
        );
    }

    #[test]
    fn test_pv_failure_does_not_touch_inverter() {
        let cols = ResolvedColumns::resolve(&["Inv Model", "PV Model", "Capacity"]);
        let row = vec![json!("INV-1"), json!("PV-1"), json!(60)];

        let outcome = extract_row(&row, &cols, PvColumns::default());
        assert_eq!(outcome.inverter.unwrap().1.capacity_kw, 60.0);
        assert!(matches!(outcome.pv, PvOutcome::Skipped { .. }));
    }

    #[test]
    fn test_custom_pv_columns() {
        let cols = pv_columns();
        let row = vec![json!("PV-1"), json!(400), json!(37.5)];
        let pv = PvColumns { capacity: 1, voc: 2 };

        match extract_photovoltaic(&row, &cols, pv) {
            PvOutcome::Extracted { panel, .. } => {
                assert_eq!(panel.power_kwp, 0.4);
                assert_eq!(panel.voc, 37.5);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_strict_number() {
        assert_eq!(strict_number(&json!(" 12.5 ")), Ok(12.5));
        assert_eq!(strict_number(&json!(true)), Ok(1.0));
        assert!(matches!(strict_number(&json!("inf")), Err(CoercionError::NonFinite(_))));
        assert!(matches!(strict_number(&json!("abc")), Err(CoercionError::NotNumeric(_))));
        assert_eq!(lenient_number(&json!("abc")), 0.0);
    }
}
