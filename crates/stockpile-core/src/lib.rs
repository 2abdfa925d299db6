//! Stockpile Core -- per-facility resource economy for production buildings.
//!
//! A facility consumes raw-material stock, converts it into output goods at
//! a configurable rate, and signals a logistics layer when it needs
//! restocking. Three pieces form a feedback loop:
//!
//! 1. **Input** -- [`input::InputBuffer`] holds the required slots and posts
//!    or retires delivery requests with a hysteresis band per resource.
//! 2. **Production** -- [`producer::Producer`] consumes a per-cycle cost,
//!    adds `rate * dt` output, and pauses when output is full.
//! 3. **Output** -- [`output::OutputBuffer`] reports edge-triggered
//!    full/space signals that pause and resume the producer.
//!
//! [`facility::Facility`] wires the three together and is the surface the
//! rest of the game calls:
//!
//! ```rust,ignore
//! let board: RegistryHandle = Rc::new(RefCell::new(LogisticsBoard::new()));
//! let mut smelter = Facility::new(BufferId(0), &config, Some(board), GridPos::new(4, 2))?;
//! let tick = smelter.tick(f64_to_fixed64(1.0 / 60.0));
//! let ingots = smelter.take_all_output();
//! ```
//!
//! # Key Types
//!
//! - [`facility::Facility`] -- one production unit, ticked once per step.
//! - [`registry::RequestRegistry`] -- contract for the logistics layer.
//! - [`board::LogisticsBoard`] -- bookkeeping-only registry.
//! - [`config::FacilityConfig`] -- serde configuration for a facility.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod board;
pub mod config;
pub mod error;
pub mod facility;
pub mod fixed;
pub mod id;
pub mod input;
pub mod output;
pub mod producer;
pub mod registry;
pub mod resource;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
