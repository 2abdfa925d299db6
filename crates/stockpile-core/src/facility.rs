//! A production unit: one [`InputBuffer`], one [`OutputBuffer`] and the
//! [`Producer`] between them.
//!
//! [`Facility`] is the surface the rest of the game talks to. It runs the
//! per-tick order (request evaluation, then production), and it is the only
//! path by which output-buffer signals reach the producer, so every
//! full/space transition is seen synchronously.

use crate::config::FacilityConfig;
use crate::error::{Collaborator, ConfigError, MissingCollaborator};
use crate::fixed::Fixed64;
use crate::id::BufferId;
use crate::input::{InputBuffer, RequestEvent};
use crate::output::OutputBuffer;
use crate::producer::{Producer, ProducerState, TickOutcome};
use crate::registry::{PositionProvider, RegistryHandle};
use crate::resource::ResourceType;

/// What one [`Facility::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityTick {
    pub requests: Vec<RequestEvent>,
    /// `None` when production is disabled for this facility.
    pub production: Option<TickOutcome>,
}

#[derive(Debug)]
pub struct Facility {
    name: String,
    input: Option<InputBuffer>,
    output: Option<OutputBuffer>,
    producer: Option<Producer>,
    ticks: u64,
}

impl Facility {
    /// Assemble a facility from configuration.
    ///
    /// Invalid configuration is an error. A missing input, output or
    /// production section is not: the facility builds, logs once, and never
    /// produces.
    pub fn new(
        id: BufferId,
        config: &FacilityConfig,
        registry: Option<RegistryHandle>,
        position: impl PositionProvider + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let input = config
            .input
            .as_ref()
            .map(|c| InputBuffer::new(id, c, registry, position))
            .transpose()?;
        let output = config
            .output
            .as_ref()
            .map(OutputBuffer::from_config)
            .transpose()?;
        let producer = config
            .production
            .as_ref()
            .map(|c| Producer::new(config.name.clone(), c.clone()))
            .transpose()?;

        let missing = [
            (input.is_none(), Collaborator::InputBuffer),
            (output.is_none(), Collaborator::OutputBuffer),
            (producer.is_none(), Collaborator::ProductionConfig),
        ];
        if let Some((_, collaborator)) = missing.into_iter().find(|(absent, _)| *absent) {
            MissingCollaborator::new(config.name.clone(), collaborator).report();
        }

        Ok(Self {
            name: config.name.clone(),
            input,
            output,
            producer,
            ticks: 0,
        })
    }

    /// Advance the facility by `dt` seconds.
    pub fn tick(&mut self, dt: Fixed64) -> FacilityTick {
        self.ticks += 1;
        let requests = self
            .input
            .as_mut()
            .map(InputBuffer::tick_requests)
            .unwrap_or_default();

        let production = match (&mut self.input, &mut self.output, &mut self.producer) {
            (Some(input), Some(output), Some(producer)) => {
                Some(producer.tick(input, output, dt))
            }
            _ => None,
        };

        FacilityTick {
            requests,
            production,
        }
    }

    // -----------------------------------------------------------------------
    // Delivery agent surface
    // -----------------------------------------------------------------------

    /// Drop off cargo. Returns the amount accepted.
    #[must_use = "returns the amount accepted; the rest stays with the carrier"]
    pub fn deliver(&mut self, resource_type: ResourceType, amount: Fixed64) -> Fixed64 {
        match &mut self.input {
            Some(input) => input.add_resource(resource_type, amount),
            None => Fixed64::ZERO,
        }
    }

    /// Pick up finished goods. Returns the amount taken.
    #[must_use = "returns the amount actually taken"]
    pub fn take_output(&mut self, amount: Fixed64) -> Fixed64 {
        let Some(output) = &mut self.output else {
            return Fixed64::ZERO;
        };
        let (taken, signal) = output.take_resource(amount);
        if let Some(producer) = &mut self.producer {
            producer.on_capacity_signal(signal);
        }
        taken
    }

    /// Pick up everything in the output buffer.
    #[must_use = "returns the amount actually taken"]
    pub fn take_all_output(&mut self) -> Fixed64 {
        self.take_output(Fixed64::MAX)
    }

    /// Whether at least one whole unit is waiting for pickup.
    pub fn has_output_ready(&self) -> bool {
        self.output
            .as_ref()
            .is_some_and(OutputBuffer::has_at_least_one_unit)
    }

    pub fn output_type(&self) -> Option<ResourceType> {
        self.output.as_ref().map(OutputBuffer::resource_type)
    }

    /// The registry retired one of this facility's requests after a delivery.
    pub fn on_request_fulfilled(&mut self, resource_type: ResourceType) -> bool {
        self.input
            .as_mut()
            .is_some_and(|input| input.on_request_fulfilled(resource_type))
    }

    // -----------------------------------------------------------------------
    // Module and efficiency surface
    // -----------------------------------------------------------------------

    pub fn set_module_count(&mut self, module_count: u32) {
        if let Some(producer) = &mut self.producer {
            producer.update_production_rate(module_count);
        }
    }

    pub fn set_efficiency(&mut self, efficiency: Fixed64) {
        if let Some(producer) = &mut self.producer {
            producer.set_efficiency(efficiency);
        }
    }

    pub fn efficiency(&self) -> Option<Fixed64> {
        self.producer.as_ref().map(Producer::efficiency)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// False when any of input, output or production config was missing.
    pub fn can_produce(&self) -> bool {
        self.input.is_some() && self.output.is_some() && self.producer.is_some()
    }

    pub fn producer_state(&self) -> Option<ProducerState> {
        self.producer.as_ref().map(Producer::state)
    }

    pub fn is_paused(&self) -> bool {
        self.producer.as_ref().is_some_and(Producer::is_paused)
    }

    pub fn is_requesting(&self) -> bool {
        self.input.as_ref().is_some_and(InputBuffer::is_requesting)
    }

    pub fn input(&self) -> Option<&InputBuffer> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&OutputBuffer> {
        self.output.as_ref()
    }

    pub fn producer(&self) -> Option<&Producer> {
        self.producer.as_ref()
    }
}
