//! Domain models for the equipment extraction pipeline.
//!
//! - [`Inverter`] - electrical parameters of one inverter model
//! - [`Photovoltaic`] - rating of one PV panel model
//! - [`EquipmentData`] - the two model-keyed tables, which serialize
//!   directly into the output document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Inverter
// =============================================================================

/// One inverter model. The model name is the table key, not a field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Inverter {
    /// Lower bound of the MPPT operating voltage.
    pub min_voltage: f64,
    /// Upper bound of the MPPT operating voltage.
    pub max_voltage: f64,
    /// Number of DC inputs.
    pub num_inputs: f64,
    /// Rated AC capacity in kW.
    pub capacity_kw: f64,
}

// =============================================================================
// Photovoltaic
// =============================================================================

/// One PV panel model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photovoltaic {
    /// Peak power in kWp.
    pub power_kwp: f64,
    /// Open-circuit voltage.
    pub voc: f64,
}

impl Photovoltaic {
    /// Build from the raw sheet values; capacity is given in watts.
    pub fn from_raw(capacity_w: f64, voc: f64) -> Self {
        Self {
            power_kwp: capacity_w / 1000.0,
            voc,
        }
    }
}

// =============================================================================
// Equipment tables
// =============================================================================

/// Both entity tables, keyed by trimmed model name.
///
/// Insert order is kept; re-inserting a model replaces its values in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EquipmentData {
    #[serde(default)]
    pub inverters: IndexMap<String, Inverter>,
    #[serde(default)]
    pub photovoltaics: IndexMap<String, Photovoltaic>,
}

impl EquipmentData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an inverter. Returns the replaced record, if any.
    pub fn upsert_inverter(&mut self, model: impl Into<String>, inverter: Inverter) -> Option<Inverter> {
        self.inverters.insert(model.into(), inverter)
    }

    /// Insert or overwrite a PV panel. Returns the replaced record, if any.
    pub fn upsert_photovoltaic(
        &mut self,
        model: impl Into<String>,
        panel: Photovoltaic,
    ) -> Option<Photovoltaic> {
        self.photovoltaics.insert(model.into(), panel)
    }

    pub fn is_empty(&self) -> bool {
        self.inverters.is_empty() && self.photovoltaics.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
