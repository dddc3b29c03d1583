//! Epidemia Deterministic Scenario Harness
//!
//! Runs named epidemic scenarios from a single 64-bit seed and checks each
//! run against invariants that must hold whatever the random draws were.
//!
//! # Seeding
//!
//! The master seed is split into independent streams:
//! - **Graph**: contact network generation
//! - **Population**: ages, vaccination and initial infections
//! - **Engine**: per-day transition draws
//!
//! # Usage
//!
//! ```no_run
//! use epidemia_sim::{ScenarioRunner, ScenarioId};
//!
//! let runner = ScenarioRunner::new(42).with_nodes(500).with_days(60);
//! let result = runner.run(ScenarioId::Baseline);
//! assert!(result.passed);
//! ```

mod context;
mod oracle;
mod runner;
mod exporter;
pub mod scenarios;

pub use context::{RngStream, SimContext};
pub use oracle::{Oracle, Violation};
pub use runner::{ScenarioResult, ScenarioRun, ScenarioRunner};
pub use exporter::{NetworkStructure, SimExport};
pub use scenarios::ScenarioId;
