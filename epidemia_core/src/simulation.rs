//! Simulation driver - runs the transition engine for `max_days` days.

use crate::engine::{DayTransitions, TransitionEngine};
use crate::error::SimError;
use crate::params::SimulationParams;
use crate::population::Population;
use crate::summary::SimulationSummary;
use crate::timeline::{CompartmentCounts, StatusHistory, Timeline};
use epidemia_env::ContactGraph;
use rand::Rng;
use tracing::{debug, info};

/// Everything a completed run produces.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Compartment counts at the start of each day
    pub timeline: Timeline,
    
    /// Per-node status at the start of each day (if recorded)
    pub history: Option<StatusHistory>,
    
    /// Transitions during each day
    pub transitions: Vec<DayTransitions>,
    
    /// Population after the last day-step
    pub population: Population,
}

impl SimulationOutput {
    /// Computes final aggregate statistics.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_run(&self.timeline, &self.population)
    }
}

/// SIHRD simulation over a contact graph.
///
/// # Example
///
/// ```
/// use epidemia_core::{PopulationBuilder, Simulation, SimulationParams};
/// use epidemia_env::generators;
/// use rand::SeedableRng;
///
/// let graph = generators::cycle(100);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let population = PopulationBuilder::new(0.05).build(&graph, &mut rng).unwrap();
///
/// let params = SimulationParams::default().with_max_days(30);
/// let output = Simulation::new(&graph, params)
///     .unwrap()
///     .run(population, &mut rng)
///     .unwrap();
///
/// assert_eq!(output.timeline.len(), 30);
/// ```
pub struct Simulation<'g, G: ?Sized> {
    graph: &'g G,
    params: SimulationParams,
    record_history: bool,
}

impl<'g, G: ContactGraph + ?Sized> Simulation<'g, G> {
    /// Creates a driver. Parameters are validated before anything runs.
    pub fn new(graph: &'g G, params: SimulationParams) -> Result<Self, SimError> {
        params.validate()?;
        Ok(Self {
            graph,
            params,
            record_history: true,
        })
    }
    
    /// Enables or disables per-node status history (enabled by default).
    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }
    
    /// Returns the run parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }
    
    /// Runs all `max_days` days.
    ///
    /// Day `d` of the timeline holds the counts at the start of day `d`.
    /// There is no early exit: the timeline always has `max_days` entries.
    pub fn run<R: Rng + ?Sized>(&self, mut population: Population, rng: &mut R) -> Result<SimulationOutput, SimError> {
        population.check_graph(self.graph)?;
        let engine = TransitionEngine::new(self.graph, &self.params)?;
        
        let days = self.params.max_days as usize;
        let mut timeline = Timeline::with_capacity(days);
        let mut history = self.record_history.then(StatusHistory::default);
        let mut transitions = Vec::with_capacity(days);
        
        info!(
            "Starting SIHRD run: {} nodes, {} days, {} initially infected",
            population.len(),
            days,
            population.initial_infected().len()
        );
        
        for day in 0..self.params.max_days {
            let counts = CompartmentCounts::from_records(population.records());
            timeline.push(counts);
            if let Some(history) = history.as_mut() {
                history.push(population.statuses());
            }
            
            let step = engine.step(population.attributes(), population.records(), day, rng)?;
            population.replace_records(step.records);
            transitions.push(step.transitions);
            
            if day % 10 == 0 {
                debug!(
                    "  day={} | S={} I={} H={} R={} D={} | +{} infections",
                    day,
                    counts.susceptible,
                    counts.infected,
                    counts.hospitalized,
                    counts.recovered,
                    counts.deceased,
                    step.transitions.new_infections
                );
            }
        }
        
        if let Some(last) = timeline.last() {
            info!(
                "Run complete: S={} I={} H={} R={} D={}",
                last.susceptible, last.infected, last.hospitalized, last.recovered, last.deceased
            );
        }
        
        Ok(SimulationOutput {
            timeline,
            history,
            transitions,
            population,
        })
    }
}

/// Convenience wrapper: validates, runs, and returns the output.
pub fn run<G, R>(
    graph: &G,
    population: Population,
    params: SimulationParams,
    rng: &mut R,
) -> Result<SimulationOutput, SimError>
where
    G: ContactGraph + ?Sized,
    R: Rng + ?Sized,
{
    Simulation::new(graph, params)?.run(population, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{AttributeStore, Attributes, PopulationBuilder};
    use crate::status::Status;
    use epidemia_env::{generators, AdjacencyGraph, NodeId};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    
    fn seeded_population(graph: &AdjacencyGraph, fraction: f64, seed: u64) -> Population {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        PopulationBuilder::new(fraction).build(graph, &mut rng).unwrap()
    }
    
    fn check_conservation(output: &SimulationOutput, node_count: usize) {
        for (day, counts) in output.timeline.days().iter().enumerate() {
            assert_eq!(counts.total(), node_count, "day {}", day);
        }
    }
    
    fn check_absorbing(history: &StatusHistory, node_count: usize) {
        for i in 0..node_count {
            let trajectory = history.trajectory(NodeId::from_index(i));
            for pair in trajectory.windows(2) {
                assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
                if pair[0].is_terminal() {
                    assert_eq!(pair[0], pair[1]);
                }
            }
        }
    }
    
    #[test]
    fn test_cycle_front_one_hop_per_day() {
        let graph = generators::cycle(100);
        let attributes = AttributeStore::uniform(100, Attributes::with_risk_factor(100, false, 1.0));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let population = PopulationBuilder::new(0.01)
            .preserve_attributes(attributes)
            .build(&graph, &mut rng)
            .unwrap();
        let patient_zero = population.initial_infected()[0];
        
        let params = SimulationParams {
            max_days: 5,
            infection_prob: 1.0,
            hospitalization_prob: 0.0,
            death_prob: 0.0,
            recovery_time: 1000,
            hospital_recovery_time: 21,
        };
        let output = run(&graph, population, params, &mut rng).unwrap();
        
        assert_eq!(output.timeline.series(Status::Infected), vec![1, 3, 5, 7, 9]);
        check_conservation(&output, 100);
        
        // Day 4: exactly the nodes within 4 hops of patient zero
        let history = output.history.as_ref().unwrap();
        for node in graph.nodes() {
            let offset = (node.0 as i64 - patient_zero.0 as i64).rem_euclid(100);
            let hops = offset.min(100 - offset);
            let expected = if hops <= 4 { Status::Infected } else { Status::Susceptible };
            assert_eq!(history.status(4, node), Some(expected), "node {}", node);
        }
    }
    
    #[test]
    fn test_disconnected_graph_never_spreads() {
        let graph = generators::empty(200);
        let population = seeded_population(&graph, 0.05, 3);
        let params = SimulationParams::default().with_infection_prob(1.0).with_max_days(60);
        
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let output = run(&graph, population, params, &mut rng).unwrap();
        
        for counts in output.timeline.days() {
            assert!(counts.infected <= 10);
            assert!(counts.ever_infected() <= 10);
        }
        assert!(output.transitions.iter().all(|t| t.new_infections == 0));
    }
    
    #[test]
    fn test_zero_infection_stability() {
        let mut graph_rng = ChaCha8Rng::seed_from_u64(1);
        let graph = generators::barabasi_albert(500, 3, &mut graph_rng).unwrap();
        let population = seeded_population(&graph, 0.0, 1);
        
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let output = run(&graph, population, SimulationParams::default(), &mut rng).unwrap();
        
        let expected = CompartmentCounts {
            susceptible: 500,
            ..Default::default()
        };
        assert_eq!(output.timeline.len(), 100);
        assert!(output.timeline.days().iter().all(|c| *c == expected));
    }
    
    #[test]
    fn test_no_early_exit() {
        let graph = generators::empty(10);
        let population = seeded_population(&graph, 0.0, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        
        let output = run(&graph, population, SimulationParams::default().with_max_days(250), &mut rng).unwrap();
        
        assert_eq!(output.timeline.len(), 250);
        assert_eq!(output.history.unwrap().len(), 250);
        assert_eq!(output.transitions.len(), 250);
    }
    
    #[test]
    fn test_empty_graph_runs() {
        let graph = generators::empty(0);
        let population = seeded_population(&graph, 0.5, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        
        let output = run(&graph, population, SimulationParams::default().with_max_days(5), &mut rng).unwrap();
        
        assert_eq!(output.timeline.len(), 5);
        assert!(output.timeline.days().iter().all(|c| c.total() == 0));
        assert_eq!(output.summary().recovery_rate, 0.0);
    }
    
    #[test]
    fn test_history_optional() {
        let graph = generators::cycle(20);
        let population = seeded_population(&graph, 0.1, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        
        let output = Simulation::new(&graph, SimulationParams::default().with_max_days(8))
            .unwrap()
            .with_history(false)
            .run(population, &mut rng)
            .unwrap();
        
        assert!(output.history.is_none());
        assert_eq!(output.timeline.len(), 8);
    }
    
    #[test]
    fn test_invalid_params_fail_before_running() {
        let graph = generators::cycle(20);
        let params = SimulationParams::default().with_infection_prob(-1.0);
        
        let err = Simulation::new(&graph, params).err().unwrap();
        assert!(err.is_configuration());
    }
    
    #[test]
    fn test_population_graph_mismatch() {
        let graph = generators::cycle(20);
        let other = generators::cycle(21);
        let population = seeded_population(&other, 0.1, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        
        let result = run(&graph, population, SimulationParams::default(), &mut rng);
        assert!(matches!(result, Err(SimError::Precondition(_))));
    }
    
    #[test]
    fn test_deterministic_under_fixed_seed() {
        let mut graph_rng = ChaCha8Rng::seed_from_u64(12);
        let graph = generators::barabasi_albert(800, 4, &mut graph_rng).unwrap();
        let params = SimulationParams::default().with_infection_prob(0.2).with_max_days(80);
        
        let run_once = || {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            let population = PopulationBuilder::new(0.01).build(&graph, &mut rng).unwrap();
            run(&graph, population, params.clone(), &mut rng).unwrap()
        };
        let a = run_once();
        let b = run_once();
        
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.history, b.history);
        assert_eq!(a.transitions, b.transitions);
    }
    
    #[test]
    fn test_full_epidemic_invariants() {
        let mut graph_rng = ChaCha8Rng::seed_from_u64(5);
        let graph = generators::barabasi_albert(1000, 5, &mut graph_rng).unwrap();
        let population = seeded_population(&graph, 0.02, 5);
        let params = SimulationParams {
            max_days: 120,
            infection_prob: 0.3,
            hospitalization_prob: 0.5,
            death_prob: 0.5,
            recovery_time: 7,
            hospital_recovery_time: 5,
        };
        
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let output = run(&graph, population, params, &mut rng).unwrap();
        
        check_conservation(&output, 1000);
        check_absorbing(output.history.as_ref().unwrap(), 1000);
        
        let deceased = output.timeline.series(Status::Deceased);
        assert!(deceased.windows(2).all(|w| w[0] <= w[1]));
        
        // Aggressive parameters: the outbreak must take off and resolve some cases
        let last = output.timeline.last().unwrap();
        assert!(last.ever_infected() > 100, "{:?}", last);
        assert!(last.recovered + last.deceased > 0, "{:?}", last);
    }
    
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]
        
        #[test]
        fn prop_conservation_and_absorbing_states(
            seed in any::<u64>(),
            infection_prob in 0.0f64..=1.0,
            hospitalization_prob in 0.0f64..=1.0,
            death_prob in 0.0f64..=1.0,
            recovery_time in 1u32..20,
            hospital_recovery_time in 1u32..20,
            fraction in 0.0f64..=0.2,
        ) {
            let mut graph_rng = ChaCha8Rng::seed_from_u64(seed);
            let graph = generators::barabasi_albert(150, 2, &mut graph_rng).unwrap();
            let population = seeded_population(&graph, fraction, seed);
            let params = SimulationParams {
                max_days: 40,
                infection_prob,
                hospitalization_prob,
                death_prob,
                recovery_time,
                hospital_recovery_time,
            };
            
            let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0xabcdef);
            let output = run(&graph, population, params, &mut rng).unwrap();
            
            prop_assert_eq!(output.timeline.len(), 40);
            for counts in output.timeline.days() {
                prop_assert_eq!(counts.total(), 150);
            }
            let deceased = output.timeline.series(Status::Deceased);
            prop_assert!(deceased.windows(2).all(|w| w[0] <= w[1]));
            
            let history = output.history.as_ref().unwrap();
            for i in 0..150 {
                let trajectory = history.trajectory(NodeId::from_index(i));
                for pair in trajectory.windows(2) {
                    prop_assert!(pair[0].can_transition_to(pair[1]));
                }
            }
        }
    }
}
