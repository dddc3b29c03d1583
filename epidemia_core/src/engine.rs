//! The transition engine - advances the population by one simulated day.
//!
//! Every decision for day D reads the start-of-day snapshot only. Writes go
//! to a separate next-day buffer, so the order in which nodes are visited
//! never changes *what* can happen to a node, only which random numbers it
//! consumes.
//!
//! # Rules
//!
//! ```text
//! SUSCEPTIBLE   k infected neighbors > 0:
//!                 infect with (1 - (1 - p_inf)^k) * risk
//! INFECTED      counter >= 5, never hospitalized:
//!                 hospitalize with p_hosp * risk (no other draw)
//!               otherwise, counter >= recovery_time:
//!                 recover with 0.1
//!               still infected: counter += 1
//! HOSPITALIZED  day - admission >= hospital_recovery_time:
//!                 die with p_death * risk, else recover
//! RECOVERED / DECEASED: absorbing
//! ```

use crate::error::SimError;
use crate::params::{SimulationParams, DAILY_RECOVERY_PROB, HOSPITALIZATION_ELIGIBLE_DAY};
use crate::population::{AttributeStore, EpidemicRecord};
use crate::status::Status;
use epidemia_env::{ContactGraph, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Transitions that happened during one day-step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTransitions {
    /// SUSCEPTIBLE -> INFECTED
    pub new_infections: usize,
    
    /// INFECTED -> HOSPITALIZED
    pub hospitalizations: usize,
    
    /// INFECTED or HOSPITALIZED -> RECOVERED
    pub recoveries: usize,
    
    /// HOSPITALIZED -> DECEASED
    pub deaths: usize,
}

impl DayTransitions {
    /// Returns true if nobody changed compartment.
    pub fn is_quiet(&self) -> bool {
        self.new_infections + self.hospitalizations + self.recoveries + self.deaths == 0
    }
}

/// Result of one day-step.
#[derive(Debug, Clone)]
pub struct DayStep {
    /// Records at the start of the next day
    pub records: Vec<EpidemicRecord>,
    
    /// Transition counts for the day
    pub transitions: DayTransitions,
}

/// Draws a Bernoulli outcome, clamping the probability into [0, 1].
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Infection probability for a susceptible node with `infected_neighbors`.
pub fn infection_probability(base_prob: f64, infected_neighbors: usize, risk_factor: f64) -> f64 {
    if infected_neighbors == 0 {
        return 0.0;
    }
    let exposure = 1.0 - (1.0 - base_prob).powi(infected_neighbors as i32);
    (exposure * risk_factor).clamp(0.0, 1.0)
}

/// Day-stepping state machine over a contact graph.
pub struct TransitionEngine<'a, G: ?Sized> {
    graph: &'a G,
    params: &'a SimulationParams,
}

impl<'a, G: ContactGraph + ?Sized> TransitionEngine<'a, G> {
    /// Creates an engine after validating the parameters.
    pub fn new(graph: &'a G, params: &'a SimulationParams) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self { graph, params })
    }
    
    /// Returns the run parameters.
    pub fn params(&self) -> &SimulationParams {
        self.params
    }
    
    /// Advances exactly one day.
    ///
    /// Random numbers are consumed in ascending node order, and only when a
    /// rule actually calls for a draw.
    ///
    /// # Errors
    /// `SimError::Precondition` if the records or attributes do not match the
    /// graph, or a record's day counters contradict its status. Nothing is
    /// drawn in that case.
    pub fn step<R: Rng + ?Sized>(
        &self,
        attributes: &AttributeStore,
        current: &[EpidemicRecord],
        day: u32,
        rng: &mut R,
    ) -> Result<DayStep, SimError> {
        self.check_inputs(attributes, current, day)?;
        
        let mut next = current.to_vec();
        let mut transitions = DayTransitions::default();
        
        for node in self.graph.nodes() {
            let i = node.index();
            let record = current[i];
            let risk = attributes.risk_factor(node).unwrap_or_default();
            
            match record.status {
                Status::Susceptible => {
                    let k = self.infected_neighbors(node, current);
                    if k > 0 {
                        let p = infection_probability(self.params.infection_prob, k, risk);
                        if chance(rng, p) {
                            next[i] = EpidemicRecord::infected(day);
                            transitions.new_infections += 1;
                        }
                    }
                }
                
                Status::Infected => {
                    // Checked in check_inputs
                    let counter = record.infection_day.unwrap_or_default();
                    let mut outcome = Status::Infected;
                    
                    // An eligible node only faces the hospitalization draw
                    if counter >= HOSPITALIZATION_ELIGIBLE_DAY && record.hospitalization_day.is_none() {
                        if chance(rng, self.params.hospitalization_prob * risk) {
                            outcome = Status::Hospitalized;
                        }
                    } else if counter >= self.params.recovery_time && chance(rng, DAILY_RECOVERY_PROB) {
                        outcome = Status::Recovered;
                    }
                    
                    match outcome {
                        Status::Hospitalized => {
                            next[i].status = Status::Hospitalized;
                            next[i].hospitalization_day = Some(day);
                            transitions.hospitalizations += 1;
                        }
                        Status::Recovered => {
                            next[i].status = Status::Recovered;
                            transitions.recoveries += 1;
                        }
                        _ => {
                            next[i].infection_day = Some(counter + 1);
                        }
                    }
                }
                
                Status::Hospitalized => {
                    let admitted = record.hospitalization_day.unwrap_or(day);
                    if day - admitted >= self.params.hospital_recovery_time {
                        if chance(rng, self.params.death_prob * risk) {
                            next[i].status = Status::Deceased;
                            transitions.deaths += 1;
                        } else {
                            next[i].status = Status::Recovered;
                            transitions.recoveries += 1;
                        }
                    }
                }
                
                Status::Recovered | Status::Deceased => {}
            }
        }
        
        Ok(DayStep {
            records: next,
            transitions,
        })
    }
    
    /// Counts neighbors INFECTED in the start-of-day snapshot.
    fn infected_neighbors(&self, node: NodeId, current: &[EpidemicRecord]) -> usize {
        self.graph
            .neighbors(node)
            .iter()
            .filter(|n| {
                current
                    .get(n.index())
                    .map_or(false, |r| r.status == Status::Infected)
            })
            .count()
    }
    
    fn check_inputs(
        &self,
        attributes: &AttributeStore,
        current: &[EpidemicRecord],
        day: u32,
    ) -> Result<(), SimError> {
        let node_count = self.graph.node_count();
        if current.len() != node_count {
            return Err(SimError::precondition(format!(
                "{} epidemic records for a graph of {} nodes",
                current.len(),
                node_count
            )));
        }
        if attributes.len() != node_count {
            return Err(SimError::precondition(format!(
                "{} attribute records for a graph of {} nodes",
                attributes.len(),
                node_count
            )));
        }
        attributes.check_all()?;
        
        for (i, record) in current.iter().enumerate() {
            let node = NodeId::from_index(i);
            record.check(node)?;
            if let Some(admitted) = record.hospitalization_day {
                if record.status == Status::Hospitalized && admitted > day {
                    return Err(SimError::precondition(format!(
                        "node {} admitted on day {} after current day {}",
                        node, admitted, day
                    )));
                }
            }
        }
        Ok(())
    }
}
