//! Epidemia Core - SIHRD Epidemic Simulation over Contact Networks
//!
//! This library models disease spread through five compartments
//! (Susceptible, Infected, Hospitalized, Recovered, Deceased):
//! 1. **Population**: per-individual age, vaccination and risk factor
//! 2. **Transition Engine**: stochastic day-step driven by risk and neighbor pressure
//! 3. **Timeline**: per-day compartment counts for downstream analysis
//!
//! A simpler three-compartment SIR variant (`sir`) stops as soon as nobody
//! is infected.
//!
//! All randomness flows through an explicitly passed `rand::Rng`, so a
//! seeded generator reproduces a run exactly.

pub mod status;
pub mod risk;
pub mod population;
pub mod params;
pub mod interventions;
pub mod engine;
pub mod timeline;
pub mod simulation;
pub mod summary;
pub mod sir;
mod error;

// Re-export key types for convenience
pub use status::Status;
pub use population::{AttributeStore, Attributes, EpidemicRecord, Population, PopulationBuilder, VaccinationPolicy};
pub use params::SimulationParams;
pub use interventions::InterventionParams;
pub use engine::{DayStep, DayTransitions, TransitionEngine};
pub use timeline::{CompartmentCounts, StatusHistory, Timeline};
pub use simulation::{run, Simulation, SimulationOutput};
pub use summary::SimulationSummary;
pub use sir::{run_sir, SirOutput, SirParams};
pub use error::SimError;
