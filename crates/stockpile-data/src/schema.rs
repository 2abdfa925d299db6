//! Serde data file structs for facility definitions.
//!
//! These structs define the on-disk format. Resource types are referenced
//! by name and quantities are plain floats; the loader resolves names and
//! converts to fixed-point.

use serde::Deserialize;

fn default_priority() -> u8 {
    3
}

fn default_request_threshold() -> f64 {
    0.25
}

fn default_fulfill_threshold() -> f64 {
    0.8
}

fn default_per_module_rate() -> f64 {
    0.25
}

fn default_cost_per_cycle() -> f64 {
    1.0
}

// ===========================================================================
// Slots
// ===========================================================================

/// A storage slot entry, supporting both short tuple form and full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlotData {
    /// Short form: `("iron_ore", 100.0)`, starting empty.
    Short(String, f64),
    /// Full form with an initial amount.
    Full {
        resource: String,
        capacity: f64,
        #[serde(default)]
        initial: f64,
    },
}

impl SlotData {
    pub fn resource(&self) -> &str {
        match self {
            SlotData::Short(resource, _) | SlotData::Full { resource, .. } => resource,
        }
    }

    pub fn capacity(&self) -> f64 {
        match self {
            SlotData::Short(_, capacity) | SlotData::Full { capacity, .. } => *capacity,
        }
    }

    pub fn initial(&self) -> f64 {
        match self {
            SlotData::Short(..) => 0.0,
            SlotData::Full { initial, .. } => *initial,
        }
    }
}

// ===========================================================================
// Facility sections
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct InputData {
    pub slots: Vec<SlotData>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default = "default_request_threshold")]
    pub request_threshold: f64,
    #[serde(default = "default_fulfill_threshold")]
    pub fulfill_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionData {
    pub base_rate: f64,
    #[serde(default = "default_per_module_rate")]
    pub per_module_rate: f64,
    #[serde(default = "default_cost_per_cycle")]
    pub cost_per_cycle: f64,
    /// `"per_tick"` (default) or `"per_second"`.
    #[serde(default)]
    pub consumption: Option<String>,
}

/// A facility definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityData {
    pub name: String,
    #[serde(default)]
    pub input: Option<InputData>,
    #[serde(default)]
    pub output: Option<SlotData>,
    #[serde(default)]
    pub production: Option<ProductionData>,
}
