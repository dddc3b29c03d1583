//! Run parameters of the transition engine.

use crate::error::{check_probability, SimError};
use serde::{Deserialize, Serialize};

/// Day from which an infected individual can be hospitalized.
pub const HOSPITALIZATION_ELIGIBLE_DAY: u32 = 5;

/// Daily recovery chance once an infection reaches `recovery_time`.
pub const DAILY_RECOVERY_PROB: f64 = 0.1;

/// Parameters fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of simulated days (timeline length)
    pub max_days: u32,
    
    /// Base per-contact infection probability
    pub infection_prob: f64,
    
    /// Daily hospitalization probability (scaled by risk)
    pub hospitalization_prob: f64,
    
    /// Probability of death on hospital discharge (scaled by risk)
    pub death_prob: f64,
    
    /// Infection day counter value at which natural recovery becomes possible
    pub recovery_time: u32,
    
    /// Days in hospital before the outcome is resolved
    pub hospital_recovery_time: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_days: 100,
            infection_prob: 0.05,
            hospitalization_prob: 0.15,
            death_prob: 0.02,
            recovery_time: 14,
            hospital_recovery_time: 21,
        }
    }
}

impl SimulationParams {
    /// Sets the number of simulated days.
    pub fn with_max_days(mut self, days: u32) -> Self {
        self.max_days = days;
        self
    }
    
    /// Sets the base per-contact infection probability.
    pub fn with_infection_prob(mut self, p: f64) -> Self {
        self.infection_prob = p;
        self
    }
    
    /// Sets the hospitalization probability.
    pub fn with_hospitalization_prob(mut self, p: f64) -> Self {
        self.hospitalization_prob = p;
        self
    }
    
    /// Sets the death probability.
    pub fn with_death_prob(mut self, p: f64) -> Self {
        self.death_prob = p;
        self
    }
    
    /// Sets the natural recovery threshold.
    pub fn with_recovery_time(mut self, days: u32) -> Self {
        self.recovery_time = days;
        self
    }
    
    /// Sets the hospital stay before resolution.
    pub fn with_hospital_recovery_time(mut self, days: u32) -> Self {
        self.hospital_recovery_time = days;
        self
    }
    
    /// Checks every parameter against its valid range.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_days == 0 {
            return Err(SimError::config("max_days", "must be greater than 0"));
        }
        check_probability("infection_prob", self.infection_prob)?;
        check_probability("hospitalization_prob", self.hospitalization_prob)?;
        check_probability("death_prob", self.death_prob)?;
        if self.recovery_time < 1 {
            return Err(SimError::config("recovery_time", "must be at least 1 day"));
        }
        if self.hospital_recovery_time < 1 {
            return Err(SimError::config("hospital_recovery_time", "must be at least 1 day"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_params_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }
    
    #[test]
    fn test_rejects_out_of_range() {
        let cases = [
            SimulationParams::default().with_max_days(0),
            SimulationParams::default().with_infection_prob(1.01),
            SimulationParams::default().with_hospitalization_prob(-0.5),
            SimulationParams::default().with_death_prob(f64::INFINITY),
            SimulationParams::default().with_recovery_time(0),
            SimulationParams::default().with_hospital_recovery_time(0),
        ];
        
        for params in cases {
            let err = params.validate().unwrap_err();
            assert!(err.is_configuration(), "{:?}", params);
        }
    }
    
    #[test]
    fn test_partial_json_uses_defaults() {
        let params: SimulationParams = serde_json::from_str(r#"{"max_days": 30, "infection_prob": 0.2}"#).unwrap();
        
        assert_eq!(params.max_days, 30);
        assert_eq!(params.infection_prob, 0.2);
        assert_eq!(params.recovery_time, 14);
    }
}
