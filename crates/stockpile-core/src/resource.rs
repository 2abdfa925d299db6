use crate::error::ConfigError;
use crate::fixed::{Fixed64, ratio};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Resource types
// ---------------------------------------------------------------------------

/// Every resource that can sit in a facility's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Wood,
    Stone,
    IronOre,
    Coal,
    CopperOre,
    IronIngot,
    CopperIngot,
    Plank,
    Tools,
}

impl ResourceType {
    /// Total number of resource types.
    pub const COUNT: usize = 9;

    /// All resource types in index order.
    pub const ALL: [ResourceType; Self::COUNT] = [
        ResourceType::Wood,
        ResourceType::Stone,
        ResourceType::IronOre,
        ResourceType::Coal,
        ResourceType::CopperOre,
        ResourceType::IronIngot,
        ResourceType::CopperIngot,
        ResourceType::Plank,
        ResourceType::Tools,
    ];

    /// Dense index for per-type array lookups.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The snake_case name used in data files.
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::Wood => "wood",
            ResourceType::Stone => "stone",
            ResourceType::IronOre => "iron_ore",
            ResourceType::Coal => "coal",
            ResourceType::CopperOre => "copper_ore",
            ResourceType::IronIngot => "iron_ingot",
            ResourceType::CopperIngot => "copper_ingot",
            ResourceType::Plank => "plank",
            ResourceType::Tools => "tools",
        }
    }

    /// Inverse of [`ResourceType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ResourceSlot
// ---------------------------------------------------------------------------

/// A bounded quantity of one resource type.
///
/// `0 <= current_amount <= max_amount` holds after every mutation; all
/// mutators clamp and report what actually moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSlot {
    resource_type: ResourceType,
    current_amount: Fixed64,
    max_amount: Fixed64,
}

impl ResourceSlot {
    /// An empty slot. Capacity must be positive.
    pub fn new(resource_type: ResourceType, max_amount: Fixed64) -> Result<Self, ConfigError> {
        Self::with_amount(resource_type, Fixed64::ZERO, max_amount)
    }

    /// A slot pre-filled with `amount`, clamped into `[0, max_amount]`.
    pub fn with_amount(
        resource_type: ResourceType,
        amount: Fixed64,
        max_amount: Fixed64,
    ) -> Result<Self, ConfigError> {
        if max_amount <= Fixed64::ZERO {
            return Err(ConfigError::NonPositiveCapacity {
                resource_type,
                capacity: max_amount,
            });
        }
        Ok(Self {
            resource_type,
            current_amount: amount.clamp(Fixed64::ZERO, max_amount),
            max_amount,
        })
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn current_amount(&self) -> Fixed64 {
        self.current_amount
    }

    pub fn max_amount(&self) -> Fixed64 {
        self.max_amount
    }

    /// `current_amount / max_amount`, in `[0, 1]`.
    pub fn fill_ratio(&self) -> Fixed64 {
        ratio(self.current_amount, self.max_amount)
    }

    /// Remaining capacity.
    pub fn headroom(&self) -> Fixed64 {
        self.max_amount - self.current_amount
    }

    pub fn is_full(&self) -> bool {
        self.current_amount >= self.max_amount
    }

    /// Add up to `amount`. Returns the amount actually accepted.
    #[must_use = "returns the amount actually accepted, which may be less than offered"]
    pub fn add(&mut self, amount: Fixed64) -> Fixed64 {
        let accepted = amount.max(Fixed64::ZERO).min(self.headroom());
        self.current_amount += accepted;
        accepted
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    #[must_use = "returns the amount actually removed, which may be less than requested"]
    pub fn remove(&mut self, amount: Fixed64) -> Fixed64 {
        let removed = amount.max(Fixed64::ZERO).min(self.current_amount);
        self.current_amount -= removed;
        removed
    }

    /// Overwrite the stored amount (save restore, debug tooling), clamped.
    pub fn set_amount(&mut self, amount: Fixed64) {
        self.current_amount = amount.clamp(Fixed64::ZERO, self.max_amount);
    }
}
