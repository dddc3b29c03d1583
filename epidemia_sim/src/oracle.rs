//! Invariant oracle for simulation runs.
//!
//! The Oracle holds the ground truth a run must respect regardless of seed:
//! - Population conservation on every day
//! - Monotone DECEASED series
//! - Only legal transitions, absorbing terminal states
//! - Scenario-specific expectations (no spread, constant timeline, exact front)

use epidemia_core::{CompartmentCounts, SimulationOutput, Status};
use epidemia_env::{ContactGraph, NodeId};
use std::collections::VecDeque;
use thiserror::Error;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Timeline has {actual} days, expected {expected}")]
    TimelineLength { expected: usize, actual: usize },
    
    #[error("Day {day}: compartments sum to {total}, population is {expected}")]
    PopulationNotConserved { day: usize, total: usize, expected: usize },
    
    #[error("Day {day}: deceased fell from {before} to {after}")]
    DeceasedDecreased { day: usize, before: usize, after: usize },
    
    #[error("Node {node} moved {from} -> {to} on day {day}")]
    IllegalTransition { node: NodeId, day: usize, from: Status, to: Status },
    
    #[error("Day {day}: {infected} ever infected exceeds the {seeded} seeded nodes")]
    SpreadWithoutContact { day: usize, infected: usize, seeded: usize },
    
    #[error("Day {day}: counts changed without any seeded infection")]
    UnseededChange { day: usize },
    
    #[error("Day {day}: node {node} is {actual}, expected {expected}")]
    FrontMismatch { day: usize, node: NodeId, expected: Status, actual: Status },
    
    #[error("Status history missing")]
    MissingHistory,
}

/// Checks a run's output against its invariants.
pub struct Oracle<'a, G: ?Sized> {
    graph: &'a G,
    output: &'a SimulationOutput,
}

impl<'a, G: ContactGraph + ?Sized> Oracle<'a, G> {
    /// Creates an oracle over a finished run.
    pub fn new(graph: &'a G, output: &'a SimulationOutput) -> Self {
        Self { graph, output }
    }
    
    /// Checks the invariants every run must satisfy.
    pub fn check_core(&self, expected_days: usize) -> Vec<Violation> {
        let mut violations = Vec::new();
        let timeline = &self.output.timeline;
        let node_count = self.graph.node_count();
        
        if timeline.len() != expected_days {
            violations.push(Violation::TimelineLength {
                expected: expected_days,
                actual: timeline.len(),
            });
        }
        
        for (day, counts) in timeline.days().iter().enumerate() {
            if counts.total() != node_count {
                violations.push(Violation::PopulationNotConserved {
                    day,
                    total: counts.total(),
                    expected: node_count,
                });
            }
        }
        
        for (day, pair) in timeline.days().windows(2).enumerate() {
            if pair[1].deceased < pair[0].deceased {
                violations.push(Violation::DeceasedDecreased {
                    day: day + 1,
                    before: pair[0].deceased,
                    after: pair[1].deceased,
                });
            }
        }
        
        violations.extend(self.check_transitions());
        violations
    }
    
    /// Checks every node's trajectory for illegal moves.
    ///
    /// Includes the step from the last snapshot to the final population.
    pub fn check_transitions(&self) -> Vec<Violation> {
        let history = match &self.output.history {
            Some(history) => history,
            None => return Vec::new(),
        };
        let final_statuses = self.output.population.statuses();
        let days: Vec<&[Status]> = history
            .iter()
            .chain(std::iter::once(final_statuses.as_slice()))
            .collect();
        
        let mut violations = Vec::new();
        for (day, pair) in days.windows(2).enumerate() {
            for (i, (&from, &to)) in pair[0].iter().zip(pair[1].iter()).enumerate() {
                if !from.can_transition_to(to) {
                    violations.push(Violation::IllegalTransition {
                        node: NodeId::from_index(i),
                        day,
                        from,
                        to,
                    });
                }
            }
        }
        violations
    }
    
    /// Without edges nobody beyond the seed set may ever be infected.
    pub fn check_no_spread(&self) -> Vec<Violation> {
        let seeded = self.output.population.initial_infected().len();
        self.output
            .timeline
            .days()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.ever_infected() > seeded)
            .map(|(day, c)| Violation::SpreadWithoutContact {
                day,
                infected: c.ever_infected(),
                seeded,
            })
            .collect()
    }
    
    /// With no seeded infection every day equals `(N, 0, 0, 0, 0)`.
    pub fn check_constant(&self) -> Vec<Violation> {
        let expected = CompartmentCounts {
            susceptible: self.graph.node_count(),
            ..Default::default()
        };
        self.output
            .timeline
            .days()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != expected)
            .map(|(day, _)| Violation::UnseededChange { day })
            .collect()
    }
    
    /// Under certain infection with no resolution, day `d` infects exactly
    /// the nodes within `d` hops of the seed set.
    pub fn check_certain_front(&self) -> Vec<Violation> {
        let history = match &self.output.history {
            Some(history) => history,
            None => return vec![Violation::MissingHistory],
        };
        let distance = self.hop_distances();
        
        let mut violations = Vec::new();
        for (day, snapshot) in history.iter().enumerate() {
            for (i, &actual) in snapshot.iter().enumerate() {
                let within = distance[i].map_or(false, |d| d <= day);
                let expected = if within { Status::Infected } else { Status::Susceptible };
                if actual != expected {
                    violations.push(Violation::FrontMismatch {
                        day,
                        node: NodeId::from_index(i),
                        expected,
                        actual,
                    });
                }
            }
        }
        violations
    }
    
    /// Breadth-first hop distance from the seed set (`None` = unreachable).
    fn hop_distances(&self) -> Vec<Option<usize>> {
        let mut distance = vec![None; self.graph.node_count()];
        let mut queue = VecDeque::new();
        for &seed in self.output.population.initial_infected() {
            distance[seed.index()] = Some(0);
            queue.push_back(seed);
        }
        
        while let Some(node) = queue.pop_front() {
            let next = distance[node.index()].unwrap_or_default() + 1;
            for &neighbor in self.graph.neighbors(node) {
                if distance[neighbor.index()].is_none() {
                    distance[neighbor.index()] = Some(next);
                    queue.push_back(neighbor);
                }
            }
        }
        distance
    }
}
