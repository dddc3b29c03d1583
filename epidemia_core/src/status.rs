//! Epidemic compartments.

use serde::{Deserialize, Serialize};

/// The five mutually exclusive compartments of the SIHRD model.
///
/// ```text
/// SUSCEPTIBLE ──► INFECTED ──► HOSPITALIZED ──► DECEASED
///                    │               │
///                    └──► RECOVERED ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Susceptible,
    Infected,
    Hospitalized,
    Recovered,
    Deceased,
}

impl Status {
    /// All compartments in timeline order.
    pub const ALL: [Status; 5] = [
        Status::Susceptible,
        Status::Infected,
        Status::Hospitalized,
        Status::Recovered,
        Status::Deceased,
    ];
    
    /// Returns true for absorbing states (no outgoing transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Recovered | Status::Deceased)
    }
    
    /// Returns true if this individual has been infected at some point.
    pub fn ever_infected(&self) -> bool {
        !matches!(self, Status::Susceptible)
    }
    
    /// Numeric code used in exported per-node snapshots (0..=4).
    pub fn code(&self) -> u8 {
        match self {
            Status::Susceptible => 0,
            Status::Infected => 1,
            Status::Hospitalized => 2,
            Status::Recovered => 3,
            Status::Deceased => 4,
        }
    }
    
    /// Returns the lowercase series name.
    pub fn name(&self) -> &'static str {
        match self {
            Status::Susceptible => "susceptible",
            Status::Infected => "infected",
            Status::Hospitalized => "hospitalized",
            Status::Recovered => "recovered",
            Status::Deceased => "deceased",
        }
    }
    
    /// Returns true if a single day-step may move `self` to `next`.
    pub fn can_transition_to(&self, next: Status) -> bool {
        if *self == next {
            return true;
        }
        match self {
            Status::Susceptible => next == Status::Infected,
            Status::Infected => matches!(next, Status::Hospitalized | Status::Recovered),
            Status::Hospitalized => next.is_terminal(),
            Status::Recovered | Status::Deceased => false,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
