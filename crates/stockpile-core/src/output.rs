//! Finished-goods storage with edge-triggered capacity signals.
//!
//! Every mutating call returns a [`CapacitySignal`]. `BecameFull` and
//! `SpaceAvailable` are each reported exactly once per transition; while the
//! buffer stays in a state, further calls return `Unchanged`.

use crate::config::OutputConfig;
use crate::error::ConfigError;
use crate::fixed::Fixed64;
use crate::resource::{ResourceSlot, ResourceType};
use serde::{Deserialize, Serialize};

/// Capacity transition caused by a single add or take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacitySignal {
    #[default]
    Unchanged,
    /// The buffer was not full and now is.
    BecameFull,
    /// The buffer was full and now has room.
    SpaceAvailable,
}

/// Accumulates a single produced resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBuffer {
    slot: ResourceSlot,
    was_full: bool,
}

impl OutputBuffer {
    pub fn new(resource_type: ResourceType, capacity: Fixed64) -> Result<Self, ConfigError> {
        Ok(Self::from_slot(ResourceSlot::new(resource_type, capacity)?))
    }

    pub fn from_config(config: &OutputConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_slot(ResourceSlot::with_amount(
            config.resource_type,
            config.initial,
            config.capacity,
        )?))
    }

    fn from_slot(slot: ResourceSlot) -> Self {
        // A buffer restored at capacity starts in the full state.
        let was_full = slot.is_full();
        Self { slot, was_full }
    }

    pub fn has_space(&self) -> bool {
        self.slot.current_amount() < self.slot.max_amount()
    }

    /// Store produced goods, clamped to capacity.
    pub fn add_resource(&mut self, amount: Fixed64) -> CapacitySignal {
        let _accepted = self.slot.add(amount);
        self.edge()
    }

    /// Remove up to `amount`. Returns what was taken and the capacity signal.
    pub fn take_resource(&mut self, amount: Fixed64) -> (Fixed64, CapacitySignal) {
        let taken = self.slot.remove(amount);
        (taken, self.edge())
    }

    /// Empty the buffer.
    pub fn take_all_resources(&mut self) -> (Fixed64, CapacitySignal) {
        self.take_resource(Fixed64::MAX)
    }

    /// Whether a cart trip is worth making.
    pub fn has_at_least_one_unit(&self) -> bool {
        self.slot.current_amount() >= Fixed64::ONE
    }

    pub fn resource_type(&self) -> ResourceType {
        self.slot.resource_type()
    }

    pub fn current_amount(&self) -> Fixed64 {
        self.slot.current_amount()
    }

    pub fn max_amount(&self) -> Fixed64 {
        self.slot.max_amount()
    }

    pub fn slot(&self) -> &ResourceSlot {
        &self.slot
    }

    fn edge(&mut self) -> CapacitySignal {
        let full = self.slot.is_full();
        match (self.was_full, full) {
            (false, true) => {
                self.was_full = true;
                CapacitySignal::BecameFull
            }
            (true, false) => {
                self.was_full = false;
                CapacitySignal::SpaceAvailable
            }
            _ => CapacitySignal::Unchanged,
        }
    }
}
