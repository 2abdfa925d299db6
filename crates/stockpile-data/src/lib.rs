//! Data-file loading for stockpile facilities.
//!
//! Facility definitions live in `facilities.{ron,toml,json}`; the loader
//! detects the format, resolves resource names and validates the result
//! into [`stockpile_core::config::FacilityConfig`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_facilities, load_facilities_from_dir};
