//! Final aggregate statistics of a run.

use crate::population::Population;
use crate::status::Status;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Headline numbers reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Individuals infected at any point (I + H + R + D on the last day)
    pub total_infected: usize,
    
    /// RECOVERED on the last day
    pub total_recovered: usize,
    
    /// DECEASED on the last day
    pub total_deceased: usize,
    
    /// Highest daily INFECTED count
    pub peak_infected: usize,
    
    /// Day of the INFECTED peak
    pub peak_infected_day: Option<usize>,
    
    /// Highest daily HOSPITALIZED count
    pub peak_hospitalized: usize,
    
    /// recovered / (recovered + deceased), 0 when nobody resolved
    pub recovery_rate: f64,
    
    /// Mean risk factor of the population
    pub average_risk_factor: f64,
    
    /// Mean age of the population
    pub average_age: f64,
}

impl SimulationSummary {
    /// Summarizes a timeline plus the population it was produced from.
    pub fn from_run(timeline: &Timeline, population: &Population) -> Self {
        let last = timeline.last().copied().unwrap_or_default();
        let resolved = last.recovered + last.deceased;
        let recovery_rate = if resolved > 0 {
            last.recovered as f64 / resolved as f64
        } else {
            0.0
        };
        
        Self {
            total_infected: last.ever_infected(),
            total_recovered: last.recovered,
            total_deceased: last.deceased,
            peak_infected: timeline.peak(Status::Infected),
            peak_infected_day: timeline.peak_day(Status::Infected),
            peak_hospitalized: timeline.peak(Status::Hospitalized),
            recovery_rate,
            average_risk_factor: population.attributes().mean_risk_factor(),
            average_age: population.attributes().mean_age(),
        }
    }
}
