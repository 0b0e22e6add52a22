//! JSON Schema validation for the equipment document.
//!
//! The schema (`schemas/equipment-data.json`, Draft 7) is embedded at compile
//! time. It pins the two top-level tables, non-blank trimmed model keys and
//! numeric fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use equipdata::validation::is_valid_equipment_data;
//!
//! let doc = json!({
//!     "inverters": { "X1": { "minVoltage": 200, "maxVoltage": 1000, "numInputs": 2, "capacityKw": 50 } },
//!     "photovoltaics": {}
//! });
//! assert!(is_valid_equipment_data(&doc));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static EQUIPMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/equipment-data.json"))
        .expect("Invalid embedded schema")
});

/// Validate `data` against `schema`.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Simple yes/no check.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate an equipment document.
pub fn validate_equipment_data(data: &Value) -> Result<(), Vec<String>> {
    validate(&EQUIPMENT_SCHEMA, data)
}

/// Quick check of an equipment document.
pub fn is_valid_equipment_data(data: &Value) -> bool {
    is_valid(&EQUIPMENT_SCHEMA, data)
}
