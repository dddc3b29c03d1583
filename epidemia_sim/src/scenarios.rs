//! Epidemic scenarios for deterministic simulation runs.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// EPI-001: Scale-free network, default rates
    Baseline,
    
    /// EPI-002: Certain infection on a 100-node ring
    CycleFront,
    
    /// EPI-003: Seeded infections on a graph without edges
    Isolated,
    
    /// EPI-004: Nobody infected on day 0
    NoSeed,
    
    /// EPI-005: 95% vaccination coverage
    HighVaccination,
    
    /// EPI-006: Universal mask usage
    MaskMandate,
    
    /// EPI-007: Full-year horizon
    LongHaul,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::CycleFront,
            ScenarioId::Isolated,
            ScenarioId::NoSeed,
            ScenarioId::HighVaccination,
            ScenarioId::MaskMandate,
            ScenarioId::LongHaul,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::CycleFront => "cycle_front",
            ScenarioId::Isolated => "isolated",
            ScenarioId::NoSeed => "no_seed",
            ScenarioId::HighVaccination => "high_vaccination",
            ScenarioId::MaskMandate => "mask_mandate",
            ScenarioId::LongHaul => "long_haul",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "Barabási-Albert network, default rates, 1% seeded",
            ScenarioId::CycleFront => "100-node ring, certain infection, front advances one hop per day",
            ScenarioId::Isolated => "No contacts at all, infection must never spread",
            ScenarioId::NoSeed => "Zero initial infections, timeline stays constant",
            ScenarioId::HighVaccination => "95% vaccination coverage on the baseline network",
            ScenarioId::MaskMandate => "Universal masks halve per-contact transmission",
            ScenarioId::LongHaul => "Baseline run over a 365-day horizon",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "epi-001" => Ok(ScenarioId::Baseline),
            "cycle_front" | "cyclefront" | "epi-002" => Ok(ScenarioId::CycleFront),
            "isolated" | "epi-003" => Ok(ScenarioId::Isolated),
            "no_seed" | "noseed" | "epi-004" => Ok(ScenarioId::NoSeed),
            "high_vaccination" | "highvaccination" | "epi-005" => Ok(ScenarioId::HighVaccination),
            "mask_mandate" | "maskmandate" | "epi-006" => Ok(ScenarioId::MaskMandate),
            "long_haul" | "longhaul" | "epi-007" => Ok(ScenarioId::LongHaul),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
