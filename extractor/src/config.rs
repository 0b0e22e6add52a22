//! Run settings.
//!
//! Precedence: command-line flags, then environment (a `.env` file is loaded
//! if present), then built-in defaults.
//!
//! | Variable                     | Default                    |
//! |------------------------------|----------------------------|
//! | `EQUIPDATA_INPUT`            | (none, required)           |
//! | `EQUIPDATA_OUTPUT`           | `data/equipment_data.json` |
//! | `EQUIPDATA_SHEET`            | `DATA EQUIP`               |
//! | `EQUIPDATA_PV_CAPACITY_COL`  | `AM`                       |
//! | `EQUIPDATA_PV_VOC_COL`       | `AP`                       |

use std::env;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::output::DEFAULT_OUTPUT_PATH;
use crate::transform::layout::{parse_column_ref, PvColumns, DEFAULT_SHEET_NAME};
use crate::transform::pipeline::ExtractOptions;

pub const ENV_INPUT: &str = "EQUIPDATA_INPUT";
pub const ENV_OUTPUT: &str = "EQUIPDATA_OUTPUT";
pub const ENV_SHEET: &str = "EQUIPDATA_SHEET";
pub const ENV_PV_CAPACITY_COL: &str = "EQUIPDATA_PV_CAPACITY_COL";
pub const ENV_PV_VOC_COL: &str = "EQUIPDATA_PV_VOC_COL";

/// Settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub sheet_name: String,
    pub pv_columns: PvColumns,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            pv_columns: PvColumns::default(),
        }
    }
}

/// Command-line values that override [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sheet_name: Option<String>,
    pub pv_capacity_col: Option<usize>,
    pub pv_voc_col: Option<usize>,
}

impl Settings {
    /// Load from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(input) = get(ENV_INPUT) {
            settings.input = Some(PathBuf::from(input));
        }
        if let Some(output) = get(ENV_OUTPUT) {
            settings.output = PathBuf::from(output);
        }
        if let Some(sheet) = get(ENV_SHEET) {
            settings.sheet_name = sheet;
        }
        if let Some(col) = get(ENV_PV_CAPACITY_COL) {
            settings.pv_columns.capacity = column_setting(ENV_PV_CAPACITY_COL, &col)?;
        }
        if let Some(col) = get(ENV_PV_VOC_COL) {
            settings.pv_columns.voc = column_setting(ENV_PV_VOC_COL, &col)?;
        }

        Ok(settings)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.input.is_some() {
            self.input = overrides.input;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(sheet) = overrides.sheet_name {
            self.sheet_name = sheet;
        }
        if let Some(col) = overrides.pv_capacity_col {
            self.pv_columns.capacity = col;
        }
        if let Some(col) = overrides.pv_voc_col {
            self.pv_columns.voc = col;
        }
        self
    }

    /// Input path, which has no default.
    pub fn require_input(&self) -> ConfigResult<&PathBuf> {
        self.input.as_ref().ok_or(ConfigError::MissingInput)
    }

    pub fn extract_options(&self, skip_validation: bool) -> ExtractOptions {
        ExtractOptions {
            sheet_name: self.sheet_name.clone(),
            pv_columns: self.pv_columns,
            skip_validation,
        }
    }
}

fn column_setting(key: &str, value: &str) -> ConfigResult<usize> {
    parse_column_ref(value).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sheet_name, "DATA EQUIP");
        assert_eq!(settings.output, PathBuf::from("data/equipment_data.json"));
        assert!(matches!(settings.require_input(), Err(ConfigError::MissingInput)));
    }

    #[test]
    fn test_env_values() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_INPUT, "tool.xlsm"),
            (ENV_SHEET, "DATA EQUIP 2"),
            (ENV_PV_CAPACITY_COL, "AN"),
            (ENV_PV_VOC_COL, "42"),
            (ENV_OUTPUT, "  "),
        ]))
        .unwrap();

        assert_eq!(settings.require_input().unwrap(), &PathBuf::from("tool.xlsm"));
        assert_eq!(settings.sheet_name, "DATA EQUIP 2");
        assert_eq!(settings.pv_columns, PvColumns { capacity: 39, voc: 42 });
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_invalid_column() {
        let err = Settings::from_lookup(lookup(&[(ENV_PV_VOC_COL, "A-P")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PV_VOC_COL));
    }

    #[test]
    fn test_column_past_sheet_end_rejected() {
        let err = Settings::from_lookup(lookup(&[(ENV_PV_CAPACITY_COL, "18446744073709551615")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_PV_CAPACITY_COL));

        assert!(Settings::from_lookup(lookup(&[(ENV_PV_VOC_COL, "XFE")])).is_err());
        let settings = Settings::from_lookup(lookup(&[(ENV_PV_VOC_COL, "XFD")])).unwrap();
        assert_eq!(settings.pv_columns.voc, 16_383);
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::from_lookup(lookup(&[(ENV_INPUT, "env.xlsm"), (ENV_SHEET, "ENV")]))
            .unwrap()
            .apply(Overrides {
                input: Some(PathBuf::from("cli.xlsm")),
                pv_voc_col: Some(40),
                ..Default::default()
            });

        assert_eq!(settings.input, Some(PathBuf::from("cli.xlsm")));
        assert_eq!(settings.sheet_name, "ENV");
        assert_eq!(settings.pv_columns, PvColumns { capacity: 38, voc: 40 });

        let opts = settings.extract_options(true);
        assert!(opts.skip_validation);
        assert_eq!(opts.pv_columns.voc, 40);
    }
}
