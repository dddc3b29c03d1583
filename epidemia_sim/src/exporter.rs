//! JSON exporter for offline analysis and plotting.
//!
//! Exports one scenario run: parameters, compartment series, per-day node
//! states and the contact network itself.

use crate::runner::ScenarioRun;

use epidemia_core::{DayTransitions, SimulationParams, SimulationSummary, Timeline};
use epidemia_env::{ContactGraph, Edge, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Nodes and edges of the contact network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStructure {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<Edge>,
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,
    
    /// Seed used
    pub seed: u64,
    
    /// Engine parameters of the run
    pub params: SimulationParams,
    
    /// Compartment series, one entry per day
    pub timeline: Timeline,
    
    /// Node id -> status code at the start of each day
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub network_states: Vec<BTreeMap<String, u8>>,
    
    pub network_structure: NetworkStructure,
    
    /// Final statistics
    pub final_stats: SimulationSummary,
    
    /// Transition counts during each day
    pub daily_transitions: Vec<DayTransitions>,
    
    /// Whether the run passed its checks
    pub passed: bool,
}

impl SimExport {
    /// Builds an export from a finished run.
    pub fn from_run(run: &ScenarioRun, passed: bool) -> Self {
        let network_states = run
            .output
            .history
            .iter()
            .flat_map(|history| history.iter())
            .map(|snapshot| {
                snapshot
                    .iter()
                    .enumerate()
                    .map(|(i, status)| (i.to_string(), status.code()))
                    .collect()
            })
            .collect();
        
        Self {
            scenario: run.scenario.name().to_string(),
            seed: run.seed,
            params: run.params.clone(),
            timeline: run.output.timeline.clone(),
            network_states,
            network_structure: NetworkStructure {
                nodes: run.graph.nodes().collect(),
                edges: run.graph.edges(),
            },
            final_stats: run.output.summary(),
            daily_transitions: run.output.transitions.clone(),
            passed,
        }
    }
    
    /// Number of exported days.
    pub fn day_count(&self) -> usize {
        self.timeline.len()
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScenarioRunner;
    use crate::scenarios::ScenarioId;
    
    fn cycle_run() -> ScenarioRun {
        ScenarioRunner::new(42)
            .with_days(5)
            .execute(ScenarioId::CycleFront)
            .unwrap()
    }
    
    #[test]
    fn test_export_shape() {
        let export = SimExport::from_run(&cycle_run(), true);
        
        assert_eq!(export.scenario, "cycle_front");
        assert_eq!(export.day_count(), 5);
        assert_eq!(export.network_states.len(), 5);
        assert_eq!(export.network_states[0].len(), 100);
        assert_eq!(export.network_structure.nodes.len(), 100);
        assert_eq!(export.network_structure.edges.len(), 100);
        assert_eq!(export.daily_transitions.len(), 5);
    }
    
    #[test]
    fn test_states_use_status_codes() {
        let run = cycle_run();
        let seed = run.output.population.initial_infected()[0];
        let export = SimExport::from_run(&run, true);
        
        assert_eq!(export.network_states[0][&seed.to_string()], 1);
        assert_eq!(export.network_states[0].values().filter(|&&c| c == 1).count(), 1);
        assert!(export.network_states[4].values().all(|&c| c <= 1));
    }
    
    #[test]
    fn test_json_layout() {
        let export = SimExport::from_run(&cycle_run(), true);
        let value: serde_json::Value = serde_json::to_value(&export).unwrap();
        
        assert_eq!(value["seed"], 42);
        assert_eq!(value["timeline"]["infected"][0], 1);
        assert_eq!(value["network_structure"]["edges"][0]["source"], 0);
        assert_eq!(value["final_stats"]["total_deceased"], 0);
        assert_eq!(value["params"]["infection_prob"], 1.0);
    }
    
    #[test]
    fn test_write_to_file() {
        let export = SimExport::from_run(&cycle_run(), false);
        let path = std::env::temp_dir().join(format!("epidemia_export_{}.json", std::process::id()));
        
        export.write_to_file(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        
        let parsed: SimExport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.timeline, export.timeline);
        assert!(!parsed.passed);
    }
}
