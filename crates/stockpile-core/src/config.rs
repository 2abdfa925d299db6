//! Per-facility configuration: input slots, request thresholds, output
//! capacity and the production recipe.
//!
//! All types derive serde so game code can embed them in its own data
//! files; `stockpile-data` provides a loader for standalone RON/JSON/TOML
//! facility definitions.

use crate::error::ConfigError;
use crate::fixed::Fixed64;
use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};

fn default_priority() -> u8 {
    3
}

fn default_request_threshold() -> Fixed64 {
    Fixed64::from_num(0.25)
}

fn default_fulfill_threshold() -> Fixed64 {
    Fixed64::from_num(0.8)
}

fn default_per_module_rate() -> Fixed64 {
    Fixed64::from_num(0.25)
}

fn default_cost_per_cycle() -> Fixed64 {
    Fixed64::ONE
}

// ---------------------------------------------------------------------------
// Input side
// ---------------------------------------------------------------------------

/// One required raw material and its storage capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub resource_type: ResourceType,
    pub capacity: Fixed64,
    /// Stock present when the facility is placed.
    #[serde(default)]
    pub initial: Fixed64,
}

impl SlotConfig {
    pub fn new(resource_type: ResourceType, capacity: Fixed64) -> Self {
        Self {
            resource_type,
            capacity,
            initial: Fixed64::ZERO,
        }
    }

    pub fn with_initial(mut self, initial: Fixed64) -> Self {
        self.initial = initial;
        self
    }
}

/// Raw-material storage and delivery-request policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub slots: Vec<SlotConfig>,
    /// Delivery priority, 1 (lowest) to 5 (highest).
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Post a request when a slot's fill ratio drops to this level.
    #[serde(default = "default_request_threshold")]
    pub request_threshold: Fixed64,
    /// Retire the request once the fill ratio climbs back to this level.
    #[serde(default = "default_fulfill_threshold")]
    pub fulfill_threshold: Fixed64,
}

impl InputConfig {
    pub fn new(slots: Vec<SlotConfig>) -> Self {
        Self {
            slots,
            priority: default_priority(),
            request_threshold: default_request_threshold(),
            fulfill_threshold: default_fulfill_threshold(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=5).contains(&self.priority) {
            return Err(ConfigError::PriorityOutOfRange(self.priority));
        }
        check_unit_range("request", self.request_threshold)?;
        check_unit_range("fulfill", self.fulfill_threshold)?;
        if self.request_threshold >= self.fulfill_threshold {
            return Err(ConfigError::ThresholdOrder {
                request: self.request_threshold,
                fulfill: self.fulfill_threshold,
            });
        }

        let mut seen = [false; ResourceType::COUNT];
        for slot in &self.slots {
            check_capacity(slot.resource_type, slot.capacity)?;
            let idx = slot.resource_type.index();
            if seen[idx] {
                return Err(ConfigError::DuplicateSlot(slot.resource_type));
            }
            seen[idx] = true;
        }
        Ok(())
    }
}

fn check_capacity(resource_type: ResourceType, capacity: Fixed64) -> Result<(), ConfigError> {
    if capacity <= Fixed64::ZERO {
        return Err(ConfigError::NonPositiveCapacity {
            resource_type,
            capacity,
        });
    }
    Ok(())
}

fn check_unit_range(name: &'static str, value: Fixed64) -> Result<(), ConfigError> {
    if value < Fixed64::ZERO || value > Fixed64::ONE {
        return Err(ConfigError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output side
// ---------------------------------------------------------------------------

/// The single produced resource and its storage capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub resource_type: ResourceType,
    pub capacity: Fixed64,
    #[serde(default)]
    pub initial: Fixed64,
}

impl OutputConfig {
    pub fn new(resource_type: ResourceType, capacity: Fixed64) -> Self {
        Self {
            resource_type,
            capacity,
            initial: Fixed64::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_capacity(self.resource_type, self.capacity)
    }
}

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

/// How the per-cycle input cost relates to tick length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionMode {
    /// `cost_per_cycle` is taken once per tick regardless of tick length.
    #[default]
    PerTick,
    /// `cost_per_cycle` is a per-second cost, scaled by elapsed time like output.
    PerSecond,
}

/// What a producer makes and how fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionConfig {
    /// Output units per second before modifiers.
    pub base_rate: Fixed64,
    /// Bonus fraction added per attached module.
    #[serde(default = "default_per_module_rate")]
    pub per_module_rate: Fixed64,
    /// Units taken from every input slot per production cycle.
    #[serde(default = "default_cost_per_cycle")]
    pub cost_per_cycle: Fixed64,
    #[serde(default)]
    pub consumption: ConsumptionMode,
}

impl ProductionConfig {
    pub fn new(base_rate: Fixed64) -> Self {
        Self {
            base_rate,
            per_module_rate: default_per_module_rate(),
            cost_per_cycle: default_cost_per_cycle(),
            consumption: ConsumptionMode::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("base rate", self.base_rate),
            ("per-module rate", self.per_module_rate),
            ("cost per cycle", self.cost_per_cycle),
        ] {
            if value < Fixed64::ZERO {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// Everything needed to assemble a [`Facility`](crate::facility::Facility).
///
/// Each part is optional: a facility missing any of the three still builds,
/// but logs once and never produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityConfig {
    pub name: String,
    #[serde(default)]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub production: Option<ProductionConfig>,
}

impl FacilityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = &self.input {
            input.validate()?;
        }
        if let Some(output) = &self.output {
            output.validate()?;
        }
        if let Some(production) = &self.production {
            production.validate()?;
        }
        Ok(())
    }
}
