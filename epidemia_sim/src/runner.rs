//! Scenario runner - builds, executes and checks epidemic scenarios.

use crate::context::{RngStream, SimContext};
use crate::oracle::{Oracle, Violation};
use crate::scenarios::ScenarioId;

use epidemia_core::{
    AttributeStore, Attributes, InterventionParams, Population, PopulationBuilder, SimError,
    Simulation, SimulationOutput, SimulationParams, SimulationSummary, VaccinationPolicy,
};
use epidemia_env::{generators, AdjacencyGraph, ContactGraph};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Ring size of the certain-infection scenario.
pub const CYCLE_FRONT_NODES: usize = 100;

/// Seed fraction used on the edgeless graph.
pub const ISOLATED_SEED_FRACTION: f64 = 0.05;

/// Vaccination coverage of the high-vaccination scenario.
pub const HIGH_VACCINATION_RATE: f64 = 0.95;

/// Horizon of the long-haul scenario.
pub const LONG_HAUL_DAYS: u32 = 365;

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,
    
    /// Seed used
    pub seed: u64,
    
    /// Whether the run satisfied every check
    pub passed: bool,
    
    /// Days simulated
    pub days: usize,
    
    /// Individuals in the population
    pub node_count: usize,
    
    /// Failure message if any
    pub failure_reason: Option<String>,
    
    /// Final statistics (default when the run never started)
    pub summary: SimulationSummary,
}

/// A finished scenario with everything needed for export.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub scenario: ScenarioId,
    pub seed: u64,
    pub graph: AdjacencyGraph,
    pub params: SimulationParams,
    pub output: SimulationOutput,
}

/// Inputs of one scenario before the day loop starts.
struct ScenarioSetup {
    graph: AdjacencyGraph,
    population: Population,
    params: SimulationParams,
}

/// Runs epidemic scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Master seed
    seed: u64,
    
    /// Nodes in generated networks
    nodes: usize,
    
    /// Barabási-Albert attachment count
    edges_per_node: usize,
    
    /// Fraction infected on day 0
    initial_infected: f64,
    
    /// Rates and interventions shared by all scenarios
    interventions: InterventionParams,
}

impl ScenarioRunner {
    /// Creates a runner with a 3000-node network and default rates.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            nodes: 3000,
            edges_per_node: 5,
            initial_infected: 0.01,
            interventions: InterventionParams::default(),
        }
    }
    
    /// Sets the network size.
    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }
    
    /// Sets the attachment count of generated networks.
    pub fn with_edges_per_node(mut self, m: usize) -> Self {
        self.edges_per_node = m;
        self
    }
    
    /// Sets the simulated horizon.
    pub fn with_days(mut self, days: u32) -> Self {
        self.interventions.simulation_days = days;
        self
    }
    
    /// Sets the day-0 infected fraction.
    pub fn with_initial_infected(mut self, fraction: f64) -> Self {
        self.initial_infected = fraction;
        self
    }
    
    /// Replaces the rates and interventions, horizon included.
    pub fn with_interventions(mut self, interventions: InterventionParams) -> Self {
        self.interventions = interventions;
        self
    }
    
    /// Master seed of this runner.
    pub fn seed(&self) -> u64 {
        self.seed
    }
    
    /// Runs a scenario and checks it, folding errors into a failed result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        
        let run = match self.execute(scenario) {
            Ok(run) => run,
            Err(e) => {
                warn!("{} could not run: {}", scenario.name(), e);
                return ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    days: 0,
                    node_count: 0,
                    failure_reason: Some(e.to_string()),
                    summary: SimulationSummary::default(),
                };
            }
        };
        
        self.evaluate(&run)
    }
    
    /// Checks a finished run against the oracle.
    pub fn evaluate(&self, run: &ScenarioRun) -> ScenarioResult {
        let scenario = run.scenario;
        let violations = self.check(run);
        let passed = violations.is_empty();
        let summary = run.output.summary();
        
        if passed {
            info!(
                "✓ {} complete: {} infected, {} deceased, peak {} on day {:?}",
                scenario.name(),
                summary.total_infected,
                summary.total_deceased,
                summary.peak_infected,
                summary.peak_infected_day
            );
        } else {
            for violation in &violations {
                warn!("{}: {}", scenario.name(), violation);
            }
        }
        
        ScenarioResult {
            scenario,
            seed: run.seed,
            passed,
            days: run.output.timeline.len(),
            node_count: run.graph.node_count(),
            failure_reason: failure_reason(&violations),
            summary,
        }
    }
    
    /// Builds and simulates a scenario without checking it.
    pub fn execute(&self, scenario: ScenarioId) -> Result<ScenarioRun, SimError> {
        let context = SimContext::new(self.seed);
        let setup = self.setup(scenario, &context)?;
        
        debug!(
            "{}: {} nodes, {} edges, {} seeded, {} days",
            scenario.name(),
            setup.graph.node_count(),
            setup.graph.edge_count(),
            setup.population.initial_infected().len(),
            setup.params.max_days
        );
        
        let mut rng = context.rng(RngStream::Engine);
        let output = Simulation::new(&setup.graph, setup.params.clone())?
            .with_history(true)
            .run(setup.population, &mut rng)?;
        
        Ok(ScenarioRun {
            scenario,
            seed: self.seed,
            graph: setup.graph,
            params: setup.params,
            output,
        })
    }
    
    fn setup(&self, scenario: ScenarioId, context: &SimContext) -> Result<ScenarioSetup, SimError> {
        let mut graph_rng = context.rng(RngStream::Graph);
        let mut population_rng = context.rng(RngStream::Population);
        let base = self.interventions.to_simulation_params()?;
        let policy = self.interventions.vaccination_policy();
        
        let scale_free = |rng: &mut ChaCha8Rng| generators::barabasi_albert(self.nodes, self.edges_per_node, rng);
        
        let setup = match scenario {
            ScenarioId::Baseline => {
                let graph = scale_free(&mut graph_rng)?;
                let population = PopulationBuilder::new(self.initial_infected)
                    .with_vaccination(policy)
                    .build(&graph, &mut population_rng)?;
                ScenarioSetup { graph, population, params: base }
            }
            ScenarioId::CycleFront => {
                let graph = generators::cycle(CYCLE_FRONT_NODES);
                let attributes = AttributeStore::uniform(graph.node_count(), Attributes::new(100, false));
                let population = PopulationBuilder::new(self.initial_infected.max(0.01))
                    .preserve_attributes(attributes)
                    .build(&graph, &mut population_rng)?;
                let params = SimulationParams {
                    infection_prob: 1.0,
                    hospitalization_prob: 0.0,
                    death_prob: 0.0,
                    recovery_time: base.max_days.saturating_add(1),
                    ..base
                };
                ScenarioSetup { graph, population, params }
            }
            ScenarioId::Isolated => {
                let graph = generators::empty(self.nodes);
                let population = PopulationBuilder::new(ISOLATED_SEED_FRACTION)
                    .with_vaccination(policy)
                    .build(&graph, &mut population_rng)?;
                let params = base.with_infection_prob(1.0);
                ScenarioSetup { graph, population, params }
            }
            ScenarioId::NoSeed => {
                let graph = scale_free(&mut graph_rng)?;
                let population = PopulationBuilder::new(0.0)
                    .with_vaccination(policy)
                    .build(&graph, &mut population_rng)?;
                ScenarioSetup { graph, population, params: base }
            }
            ScenarioId::HighVaccination => {
                let graph = scale_free(&mut graph_rng)?;
                let population = PopulationBuilder::new(self.initial_infected)
                    .with_vaccination(VaccinationPolicy::Rate(HIGH_VACCINATION_RATE))
                    .build(&graph, &mut population_rng)?;
                ScenarioSetup { graph, population, params: base }
            }
            ScenarioId::MaskMandate => {
                let masked = InterventionParams {
                    mask_usage: 1.0,
                    ..self.interventions.clone()
                };
                let graph = scale_free(&mut graph_rng)?;
                let population = PopulationBuilder::new(self.initial_infected)
                    .with_vaccination(policy)
                    .build(&graph, &mut population_rng)?;
                ScenarioSetup { graph, population, params: masked.to_simulation_params()? }
            }
            ScenarioId::LongHaul => {
                let graph = scale_free(&mut graph_rng)?;
                let population = PopulationBuilder::new(self.initial_infected)
                    .with_vaccination(policy)
                    .build(&graph, &mut population_rng)?;
                ScenarioSetup { graph, population, params: base.with_max_days(LONG_HAUL_DAYS) }
            }
        };
        Ok(setup)
    }
    
    /// Runs the oracle checks that apply to a scenario.
    fn check(&self, run: &ScenarioRun) -> Vec<Violation> {
        let oracle = Oracle::new(&run.graph, &run.output);
        let mut violations = oracle.check_core(run.params.max_days as usize);
        
        match run.scenario {
            ScenarioId::CycleFront => violations.extend(oracle.check_certain_front()),
            ScenarioId::Isolated => violations.extend(oracle.check_no_spread()),
            ScenarioId::NoSeed => violations.extend(oracle.check_constant()),
            _ => {}
        }
        violations
    }
}

/// Condenses violations into one message, `None` when there are none.
fn failure_reason(violations: &[Violation]) -> Option<String> {
    let first = violations.first()?;
    if violations.len() == 1 {
        Some(first.to_string())
    } else {
        Some(format!("{} (and {} more violations)", first, violations.len() - 1))
    }
}
