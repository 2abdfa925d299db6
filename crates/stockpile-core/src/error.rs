//! Error types shared across the economy.
//!
//! Invalid configuration is a hard error returned from constructors. A
//! missing collaborator is not: it is reported once through `log` and the
//! behavior that depends on it stays switched off for the instance's
//! lifetime.

use crate::fixed::Fixed64;
use crate::resource::ResourceType;
use std::fmt;

/// Errors raised while validating facility configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("priority {0} is outside 1..=5")]
    PriorityOutOfRange(u8),

    #[error("{name} threshold {value} is outside 0.0..=1.0")]
    ThresholdOutOfRange { name: &'static str, value: Fixed64 },

    /// The hysteresis band is empty; the request state machine would flip every tick.
    #[error("request threshold {request} must be below fulfill threshold {fulfill}")]
    ThresholdOrder { request: Fixed64, fulfill: Fixed64 },

    #[error("{resource_type} slot has non-positive capacity {capacity}")]
    NonPositiveCapacity {
        resource_type: ResourceType,
        capacity: Fixed64,
    },

    #[error("{0} appears in more than one input slot")]
    DuplicateSlot(ResourceType),

    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: Fixed64 },
}

/// A reference a component needs but was not given at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    RequestRegistry,
    InputBuffer,
    OutputBuffer,
    ProductionConfig,
}

impl Collaborator {
    /// What stops working without this collaborator.
    pub fn disables(self) -> &'static str {
        match self {
            Collaborator::RequestRegistry => "delivery requests are",
            Collaborator::InputBuffer
            | Collaborator::OutputBuffer
            | Collaborator::ProductionConfig => "production is",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collaborator::RequestRegistry => "request registry",
            Collaborator::InputBuffer => "input buffer",
            Collaborator::OutputBuffer => "output buffer",
            Collaborator::ProductionConfig => "production config",
        })
    }
}

/// Logged, never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{owner} has no {collaborator}; {} disabled", .collaborator.disables())]
pub struct MissingCollaborator {
    pub owner: String,
    pub collaborator: Collaborator,
}

impl MissingCollaborator {
    pub fn new(owner: impl Into<String>, collaborator: Collaborator) -> Self {
        Self {
            owner: owner.into(),
            collaborator,
        }
    }

    /// Emit the one-time warning for this instance.
    pub(crate) fn report(&self) {
        log::warn!("{self}");
    }
}
