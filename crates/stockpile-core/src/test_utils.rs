//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::config::{FacilityConfig, InputConfig, OutputConfig, ProductionConfig, SlotConfig};
use crate::fixed::Fixed64;
use crate::registry::{DeliveryRequest, RegistryHandle, RequestRegistry};
use crate::resource::ResourceType;
use std::cell::RefCell;
use std::rc::Rc;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Registry double
// ===========================================================================

/// Records every call, in order.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub created: Vec<DeliveryRequest>,
    pub fulfilled: Vec<DeliveryRequest>,
}

impl RecordingRegistry {
    /// Requests created and not yet fulfilled, per `(owner, resource_type)`.
    pub fn outstanding(&self) -> usize {
        self.created.len().saturating_sub(self.fulfilled.len())
    }
}

impl RequestRegistry for RecordingRegistry {
    fn create_request(&mut self, request: &DeliveryRequest) {
        self.created.push(*request);
    }

    fn fulfill_request(&mut self, request: &DeliveryRequest) {
        self.fulfilled.push(*request);
    }
}

/// A recorder plus a type-erased handle to the same registry.
pub fn recording_registry() -> (Rc<RefCell<RecordingRegistry>>, RegistryHandle) {
    let recorder = Rc::new(RefCell::new(RecordingRegistry::default()));
    let handle: RegistryHandle = recorder.clone();
    (recorder, handle)
}

// ===========================================================================
// Facility presets
// ===========================================================================

/// Iron ore + coal -> iron ingots.
///
/// Ore 20/100 (below the 25% request threshold), coal 50/50, ingot
/// capacity 10, 2 ingots per second.
pub fn smelter_config() -> FacilityConfig {
    FacilityConfig {
        name: "smelter".to_string(),
        input: Some(InputConfig::new(vec![
            SlotConfig::new(ResourceType::IronOre, fixed(100.0)).with_initial(fixed(20.0)),
            SlotConfig::new(ResourceType::Coal, fixed(50.0)).with_initial(fixed(50.0)),
        ])),
        output: Some(OutputConfig::new(ResourceType::IronIngot, fixed(10.0))),
        production: Some(ProductionConfig::new(fixed(2.0))),
    }
}

/// Wood -> planks with a single input slot.
pub fn sawmill_config(
    wood_capacity: f64,
    wood_initial: f64,
    plank_capacity: f64,
    base_rate: f64,
) -> FacilityConfig {
    FacilityConfig {
        name: "sawmill".to_string(),
        input: Some(InputConfig::new(vec![
            SlotConfig::new(ResourceType::Wood, fixed(wood_capacity))
                .with_initial(fixed(wood_initial)),
        ])),
        output: Some(OutputConfig::new(ResourceType::Plank, fixed(plank_capacity))),
        production: Some(ProductionConfig::new(fixed(base_rate))),
    }
}
