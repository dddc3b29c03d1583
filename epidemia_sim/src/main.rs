//! Epidemia scenario CLI
//!
//! Run seeded epidemic scenarios and check their invariants.

use clap::Parser;
use epidemia_core::InterventionParams;
use epidemia_sim::{ScenarioId, ScenarioResult, ScenarioRunner, SimExport};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Epidemia deterministic scenario CLI
#[derive(Parser, Debug)]
#[command(name = "epidemia-sim")]
#[command(about = "Run seeded SIHRD epidemic scenarios", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,
    
    /// Scenario to run (baseline, cycle_front, isolated, no_seed, high_vaccination, mask_mandate, long_haul, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,
    
    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,
    
    /// Nodes in the generated contact network
    #[arg(short, long, default_value = "3000")]
    nodes: usize,
    
    /// Edges attached per new node
    #[arg(short, long, default_value = "5")]
    edges_per_node: usize,
    
    /// Days to simulate (overrides the config file)
    #[arg(short, long)]
    days: Option<u32>,
    
    /// Fraction of the population infected on day 0
    #[arg(short, long, default_value = "0.01")]
    initial_infected: f64,
    
    /// JSON file with rates and interventions
    #[arg(short, long)]
    config: Option<PathBuf>,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
    
    /// Export a single scenario run to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,
}

/// Log filter used when RUST_LOG is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn load_interventions(path: &Path) -> Result<InterventionParams, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let params: InterventionParams = serde_json::from_str(&contents)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

fn build_runner(args: &Args, seed: u64, interventions: &InterventionParams) -> ScenarioRunner {
    let runner = ScenarioRunner::new(seed)
        .with_interventions(interventions.clone())
        .with_nodes(args.nodes)
        .with_edges_per_node(args.edges_per_node)
        .with_initial_infected(args.initial_infected);
    match args.days {
        Some(days) => runner.with_days(days),
        None => runner,
    }
}

/// Runs one scenario and writes its export, returning whether it passed.
fn run_with_export(runner: &ScenarioRunner, scenario: ScenarioId, path: &Path) -> bool {
    let run = match runner.execute(scenario) {
        Ok(run) => run,
        Err(e) => {
            error!("✗ {} could not run: {}", scenario.name(), e);
            return false;
        }
    };
    let result = runner.evaluate(&run);
    let export = SimExport::from_run(&run, result.passed);
    
    if let Err(e) = export.write_to_file(path) {
        error!("Failed to write export: {}", e);
        return false;
    }
    info!("Exported {} days to {}", export.day_count(), path.display());
    
    if result.passed {
        info!("✓ {} (seed={}) PASSED", scenario.name(), result.seed);
    } else {
        error!(
            "✗ {} FAILED: {}",
            scenario.name(),
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
    result.passed
}

fn main() {
    let args = Args::parse();
    
    // Initialize logging (RUST_LOG wins over --verbose)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(args.verbose)));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
    
    if !args.json {
        info!("Epidemia scenario runner v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
    
    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                error!("{}", e);
                let names: Vec<&str> = ScenarioId::all().iter().map(|s| s.name()).collect();
                error!("Available scenarios: {}, all", names.join(", "));
                std::process::exit(1);
            }
        }
    };
    
    let interventions = match &args.config {
        Some(path) => match load_interventions(path) {
            Ok(params) => params,
            Err(e) => {
                error!("Invalid config: {}", e);
                std::process::exit(1);
            }
        },
        None => InterventionParams::default(),
    };
    
    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };
    
    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            error!("--export only supports a single scenario, not 'all'");
            std::process::exit(1);
        }
        
        let runner = build_runner(&args, base_seed, &interventions);
        if !run_with_export(&runner, scenarios[0], export_path) {
            std::process::exit(1);
        }
        return;
    }
    
    // Run simulations
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = build_runner(&args, seed, &interventions);
        
        for scenario in &scenarios {
            let result = runner.run(*scenario);
            
            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", scenario.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
            all_results.push(result);
        }
    }
    
    // Summary
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;
    
    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "days": r.days,
                    "nodes": r.node_count,
                    "failure_reason": r.failure_reason,
                    "summary": r.summary,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        
        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);
            
            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }
    
    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_directive_parses() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "info");
        for verbose in [true, false] {
            assert!(default_directive(verbose).parse::<EnvFilter>().is_ok());
        }
    }
    
    #[test]
    fn test_verbose_flag_and_overrides() {
        let args = Args::parse_from(["epidemia-sim", "-v", "--days", "12", "-S", "no_seed"]);
        assert!(args.verbose);
        assert_eq!(args.days, Some(12));
        
        let runner = build_runner(&args, 3, &InterventionParams::default());
        let result = runner.with_nodes(50).with_edges_per_node(2).run(ScenarioId::NoSeed);
        assert_eq!(result.days, 12);
    }
}
