//! Three-compartment SIR variant.
//!
//! A simpler model than the SIHRD engine: no hospital, no deaths, and no
//! individual risk. Each individual infected at the start of a day tries
//! every susceptible contact once with `infection_prob`, and recovers once
//! `recovery_time` days have passed since its infection.
//!
//! Unlike the SIHRD driver, a run stops as soon as nobody is infected, so
//! the timeline can be shorter than `max_days`. Entry `d` holds the counts
//! at the *end* of day `d`.

use crate::engine::chance;
use crate::error::{check_probability, SimError};
use crate::population::Population;
use crate::status::Status;
use crate::timeline::{CompartmentCounts, Timeline};
use epidemia_env::{ContactGraph, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters of an SIR run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SirParams {
    /// Upper bound on simulated days
    pub max_days: u32,
    
    /// Per-contact, per-day transmission probability
    pub infection_prob: f64,
    
    /// Days from infection to recovery
    pub recovery_time: u32,
}

impl Default for SirParams {
    fn default() -> Self {
        Self {
            max_days: 100,
            infection_prob: 0.05,
            recovery_time: 14,
        }
    }
}

impl SirParams {
    pub fn with_max_days(mut self, days: u32) -> Self {
        self.max_days = days;
        self
    }
    
    pub fn with_infection_prob(mut self, p: f64) -> Self {
        self.infection_prob = p;
        self
    }
    
    pub fn with_recovery_time(mut self, days: u32) -> Self {
        self.recovery_time = days;
        self
    }
    
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_days == 0 {
            return Err(SimError::config("max_days", "must be greater than 0"));
        }
        check_probability("infection_prob", self.infection_prob)?;
        Ok(())
    }
}

/// Result of an SIR run.
#[derive(Debug, Clone, PartialEq)]
pub struct SirOutput {
    /// End-of-day counts (hospitalized and deceased are always 0)
    pub timeline: Timeline,
    
    /// Status of every node after the last simulated day
    pub statuses: Vec<Status>,
    
    /// True if the run ended before `max_days` because nobody was infected
    pub stopped_early: bool,
}

impl SirOutput {
    /// Number of days actually simulated.
    pub fn days_run(&self) -> usize {
        self.timeline.len()
    }
}

/// Runs the SIR variant from the statuses of `population`.
///
/// # Errors
/// `SimError::Configuration` for invalid parameters, `SimError::Precondition`
/// if the population does not match the graph or holds anything other than
/// SUSCEPTIBLE and INFECTED individuals.
pub fn run_sir<G, R>(
    graph: &G,
    population: &Population,
    params: &SirParams,
    rng: &mut R,
) -> Result<SirOutput, SimError>
where
    G: ContactGraph + ?Sized,
    R: Rng + ?Sized,
{
    params.validate()?;
    population.check_graph(graph)?;
    
    let mut statuses = population.statuses();
    let mut infection_day: Vec<u32> = Vec::with_capacity(statuses.len());
    for (i, record) in population.records().iter().enumerate() {
        match record.status {
            Status::Susceptible | Status::Infected => {
                infection_day.push(record.infection_day.unwrap_or_default());
            }
            other => {
                return Err(SimError::precondition(format!(
                    "node {} is {}, SIR runs start from SUSCEPTIBLE or INFECTED only",
                    NodeId::from_index(i),
                    other
                )));
            }
        }
    }
    
    info!(
        "Starting SIR run: {} nodes, up to {} days, {} initially infected",
        statuses.len(),
        params.max_days,
        population.initial_infected().len()
    );
    
    let mut timeline = Timeline::with_capacity(params.max_days as usize);
    let mut active: Vec<NodeId> = Vec::new();
    
    for day in 0..params.max_days {
        // Nodes infected today only become contagious tomorrow
        active.clear();
        active.extend(
            graph
                .nodes()
                .filter(|n| statuses[n.index()] == Status::Infected),
        );
        if active.is_empty() {
            break;
        }
        
        for &node in &active {
            for &neighbor in graph.neighbors(node) {
                let j = neighbor.index();
                if statuses[j] == Status::Susceptible && chance(rng, params.infection_prob) {
                    statuses[j] = Status::Infected;
                    infection_day[j] = day;
                }
            }
            
            let i = node.index();
            if day.saturating_sub(infection_day[i]) >= params.recovery_time {
                statuses[i] = Status::Recovered;
            }
        }
        
        let counts = CompartmentCounts::tally(statuses.iter().copied());
        timeline.push(counts);
        debug!(
            "  day={} | S={} I={} R={}",
            day, counts.susceptible, counts.infected, counts.recovered
        );
    }
    
    let stopped_early = (timeline.len() as u32) < params.max_days;
    if stopped_early {
        info!("SIR run ended after {} days: no infected left", timeline.len());
    }
    
    Ok(SirOutput {
        timeline,
        statuses,
        stopped_early,
    })
}
