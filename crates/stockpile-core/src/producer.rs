use crate::config::{ConsumptionMode, ProductionConfig};
use crate::error::ConfigError;
use crate::fixed::{Fixed64, fixed64_to_f64};
use crate::input::InputBuffer;
use crate::output::{CapacitySignal, OutputBuffer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Producer state
// ---------------------------------------------------------------------------

/// Whether the producer is allowed to run.
///
/// Only output capacity pauses production. A producer short on input stays
/// `Running` and simply makes no progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProducerState {
    #[default]
    Running,
    Paused,
}

/// The outcome of a single production tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Input was consumed and output stored.
    Produced {
        /// Units taken from each input slot.
        consumed: Fixed64,
        /// Units that actually landed in the output buffer.
        produced: Fixed64,
    },
    /// Some input slot is below the cycle cost; nothing happened.
    Starved,
    /// The output buffer had no room at tick start; the producer paused.
    OutputFull,
    /// Already paused; nothing happened.
    Paused,
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

/// Converts input stock into output goods at a modified rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    label: String,
    config: ProductionConfig,
    state: ProducerState,
    module_count: u32,
    /// `1 + module_count * per_module_rate`.
    module_bonus: Fixed64,
    efficiency: Fixed64,
}

impl Producer {
    /// `label` names the owning facility in log output.
    pub fn new(label: impl Into<String>, config: ProductionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            label: label.into(),
            config,
            state: ProducerState::Running,
            module_count: 0,
            module_bonus: Fixed64::ONE,
            efficiency: Fixed64::ONE,
        })
    }

    /// Advance production by `dt` seconds.
    ///
    /// Order matters: input sufficiency is checked before output space, so an
    /// input-starved facility with a full output reports `Starved` and stays
    /// `Running` until it has stock again.
    pub fn tick(
        &mut self,
        input: &mut InputBuffer,
        output: &mut OutputBuffer,
        dt: Fixed64,
    ) -> TickOutcome {
        if self.state == ProducerState::Paused {
            return TickOutcome::Paused;
        }

        let cost = self.cycle_cost(dt);
        if !input.has_enough_resources(cost) {
            return TickOutcome::Starved;
        }
        if !output.has_space() {
            self.pause();
            return TickOutcome::OutputFull;
        }

        input.consume_resources(cost);

        let before = output.current_amount();
        let signal = output.add_resource(self.effective_rate().saturating_mul(dt));
        let produced = output.current_amount() - before;
        self.on_capacity_signal(signal);

        TickOutcome::Produced {
            consumed: cost,
            produced,
        }
    }

    /// React to an output buffer transition. Called inline by whoever
    /// mutated the buffer.
    pub fn on_capacity_signal(&mut self, signal: CapacitySignal) {
        match signal {
            CapacitySignal::BecameFull => self.pause(),
            CapacitySignal::SpaceAvailable => self.resume(),
            CapacitySignal::Unchanged => {}
        }
    }

    fn pause(&mut self) {
        if self.state == ProducerState::Paused {
            return;
        }
        self.state = ProducerState::Paused;
        log::debug!("{}: production paused, output full", self.label);
    }

    fn resume(&mut self) {
        if self.state == ProducerState::Running {
            return;
        }
        self.state = ProducerState::Running;
        log::debug!("{}: production resumed, output has space", self.label);
    }

    fn cycle_cost(&self, dt: Fixed64) -> Fixed64 {
        match self.config.consumption {
            ConsumptionMode::PerTick => self.config.cost_per_cycle,
            ConsumptionMode::PerSecond => self.config.cost_per_cycle.saturating_mul(dt),
        }
    }

    // -----------------------------------------------------------------------
    // Modifiers
    // -----------------------------------------------------------------------

    /// Recompute the module bonus after modules were attached or removed.
    pub fn update_production_rate(&mut self, module_count: u32) {
        self.module_count = module_count;
        self.module_bonus = Fixed64::ONE.saturating_add(
            Fixed64::saturating_from_num(module_count).saturating_mul(self.config.per_module_rate),
        );
        log::info!(
            "{}: {module_count} modules, rate multiplier {:.2}x",
            self.label,
            fixed64_to_f64(self.module_bonus)
        );
    }

    /// Set the efficiency multiplier. Not clamped; UIs typically offer 0.5–1.5.
    pub fn set_efficiency(&mut self, efficiency: Fixed64) {
        self.efficiency = efficiency;
    }

    pub fn efficiency(&self) -> Fixed64 {
        self.efficiency
    }

    pub fn module_bonus(&self) -> Fixed64 {
        self.module_bonus
    }

    pub fn module_count(&self) -> u32 {
        self.module_count
    }

    /// Output units per second: `base_rate * module_bonus * efficiency`.
    pub fn effective_rate(&self) -> Fixed64 {
        self.config
            .base_rate
            .saturating_mul(self.module_bonus)
            .saturating_mul(self.efficiency)
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ProducerState::Paused
    }

    pub fn config(&self) -> &ProductionConfig {
        &self.config
    }
}
