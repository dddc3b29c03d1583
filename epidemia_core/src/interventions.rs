//! Intervention-level parameters.
//!
//! Analysts describe a run in terms of rates and interventions (vaccination
//! coverage, mask usage). This module validates that description and maps it
//! onto engine parameters and a vaccination policy.

use crate::error::{check_probability, SimError};
use crate::params::SimulationParams;
use crate::population::VaccinationPolicy;
use serde::{Deserialize, Serialize};

/// Fraction of transmission removed by universal mask usage.
pub const MASK_EFFECTIVENESS: f64 = 0.5;

/// Hospital stays last this many times the natural recovery time.
pub const HOSPITAL_STAY_FACTOR: f64 = 1.5;

/// Longest accepted horizon in days.
pub const MAX_SIMULATION_DAYS: u32 = 3650;

/// Rates and interventions describing one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionParams {
    /// Number of simulated days
    pub simulation_days: u32,
    
    /// Base per-contact transmission probability
    pub transmission_rate: f64,
    
    /// Daily recovery rate; its inverse is the recovery time in days
    pub recovery_rate: f64,
    
    /// Death probability on hospital discharge
    pub mortality_rate: f64,
    
    /// Daily hospitalization probability
    pub hospitalization_rate: f64,
    
    /// Vaccination coverage (`None` = default 70% rate)
    pub vaccination_rate: Option<f64>,
    
    /// Fraction of contacts wearing masks
    pub mask_usage: f64,
}

impl Default for InterventionParams {
    fn default() -> Self {
        Self {
            simulation_days: 100,
            transmission_rate: 0.3,
            recovery_rate: 0.1,
            mortality_rate: 0.02,
            hospitalization_rate: 0.15,
            vaccination_rate: None,
            mask_usage: 0.0,
        }
    }
}

impl InterventionParams {
    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.simulation_days == 0 || self.simulation_days > MAX_SIMULATION_DAYS {
            return Err(SimError::config(
                "simulation_days",
                format!("must be within [1, {}], got {}", MAX_SIMULATION_DAYS, self.simulation_days),
            ));
        }
        check_probability("transmission_rate", self.transmission_rate)?;
        check_probability("recovery_rate", self.recovery_rate)?;
        if self.recovery_rate == 0.0 {
            return Err(SimError::config("recovery_rate", "must be greater than 0"));
        }
        check_probability("mortality_rate", self.mortality_rate)?;
        check_probability("hospitalization_rate", self.hospitalization_rate)?;
        if let Some(rate) = self.vaccination_rate {
            check_probability("vaccination_rate", rate)?;
        }
        check_probability("mask_usage", self.mask_usage)?;
        Ok(())
    }
    
    /// Per-contact infection probability after masking.
    pub fn effective_infection_prob(&self) -> f64 {
        self.transmission_rate * (1.0 - self.mask_usage * MASK_EFFECTIVENESS)
    }
    
    /// Natural recovery time in days.
    pub fn recovery_time(&self) -> u32 {
        ((1.0 / self.recovery_rate).floor() as u32).max(1)
    }
    
    /// Hospital stay before resolution in days.
    pub fn hospital_recovery_time(&self) -> u32 {
        ((self.recovery_time() as f64 * HOSPITAL_STAY_FACTOR).floor() as u32).max(1)
    }
    
    /// Maps onto validated engine parameters.
    pub fn to_simulation_params(&self) -> Result<SimulationParams, SimError> {
        self.validate()?;
        let params = SimulationParams {
            max_days: self.simulation_days,
            infection_prob: self.effective_infection_prob(),
            hospitalization_prob: self.hospitalization_rate,
            death_prob: self.mortality_rate,
            recovery_time: self.recovery_time(),
            hospital_recovery_time: self.hospital_recovery_time(),
        };
        params.validate()?;
        Ok(params)
    }
    
    /// Vaccination policy for fresh attributes.
    pub fn vaccination_policy(&self) -> VaccinationPolicy {
        match self.vaccination_rate {
            Some(rate) => VaccinationPolicy::Rate(rate),
            None => VaccinationPolicy::BaseRate,
        }
    }
}
