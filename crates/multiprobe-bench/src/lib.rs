//! Measurement harness for multi-probe consistent hashing.
//!
//! Compares probe combinations on speed, distribution accuracy and
//! stickiness across a grid of weighted node scenarios:
//!
//! - [`KeySet`]: seeded random keys, saved and loaded as JSON.
//! - [`combinations`] / [`probe_combinations`]: the probe sets to compare.
//! - [`Scenario`]: weighted node layouts.
//! - [`Runner`]: runs the grid and produces [`BenchResult`] rows.
//! - [`report`]: CSV, JSON and table output.

mod combinations;
mod error;
mod keys;
pub mod report;
mod runner;
mod scenario;

pub use combinations::{ProbeCombination, combinations, probe_combinations};
pub use error::BenchError;
pub use keys::{IP_ADDRESSES_FILE, KeySet, STRINGS_FILE};
pub use runner::{BenchResult, RunSettings, Runner, SettingsSummary, format_elapsed};
pub use scenario::{Scenario, default_scenarios};
