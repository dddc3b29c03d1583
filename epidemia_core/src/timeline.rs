//! Timeline aggregation - per-day compartment counts and status snapshots.

use crate::population::EpidemicRecord;
use crate::status::Status;
use epidemia_env::NodeId;
use serde::{Deserialize, Serialize};

/// Number of individuals in each compartment on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompartmentCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub hospitalized: usize,
    pub recovered: usize,
    pub deceased: usize,
}

impl CompartmentCounts {
    /// Counts a stream of statuses.
    pub fn tally<I: IntoIterator<Item = Status>>(statuses: I) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            *counts.slot_mut(status) += 1;
        }
        counts
    }
    
    /// Counts a day's records. An empty slice gives all zeros.
    pub fn from_records(records: &[EpidemicRecord]) -> Self {
        Self::tally(records.iter().map(|r| r.status))
    }
    
    /// Returns the count of one compartment.
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Susceptible => self.susceptible,
            Status::Infected => self.infected,
            Status::Hospitalized => self.hospitalized,
            Status::Recovered => self.recovered,
            Status::Deceased => self.deceased,
        }
    }
    
    fn slot_mut(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Susceptible => &mut self.susceptible,
            Status::Infected => &mut self.infected,
            Status::Hospitalized => &mut self.hospitalized,
            Status::Recovered => &mut self.recovered,
            Status::Deceased => &mut self.deceased,
        }
    }
    
    /// Sum over all compartments (the population size).
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.hospitalized + self.recovered + self.deceased
    }
    
    /// Individuals currently carrying the disease (I + H).
    pub fn active(&self) -> usize {
        self.infected + self.hospitalized
    }
    
    /// Individuals that have ever left SUSCEPTIBLE.
    pub fn ever_infected(&self) -> usize {
        self.total() - self.susceptible
    }
    
    /// Counts as an `(S, I, H, R, D)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize, usize) {
        (self.susceptible, self.infected, self.hospitalized, self.recovered, self.deceased)
    }
}

/// Per-day compartment counts of a run, day 0 first.
///
/// Serializes as five named series:
/// `{"susceptible": [...], "infected": [...], ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    days: Vec<CompartmentCounts>,
}

impl Timeline {
    /// Creates an empty timeline with room for `days` entries.
    pub fn with_capacity(days: usize) -> Self {
        Self {
            days: Vec::with_capacity(days),
        }
    }
    
    /// Appends the counts of the next day.
    pub fn push(&mut self, counts: CompartmentCounts) {
        self.days.push(counts);
    }
    
    /// Number of recorded days.
    pub fn len(&self) -> usize {
        self.days.len()
    }
    
    /// Returns true if no day was recorded.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
    
    /// Counts of one day.
    pub fn day(&self, day: usize) -> Option<&CompartmentCounts> {
        self.days.get(day)
    }
    
    /// Counts of the last recorded day.
    pub fn last(&self) -> Option<&CompartmentCounts> {
        self.days.last()
    }
    
    /// All days in order.
    pub fn days(&self) -> &[CompartmentCounts] {
        &self.days
    }
    
    /// One compartment as a series over days.
    pub fn series(&self, status: Status) -> Vec<usize> {
        self.days.iter().map(|c| c.get(status)).collect()
    }
    
    /// Highest daily count of a compartment (0 for an empty timeline).
    pub fn peak(&self, status: Status) -> usize {
        self.days.iter().map(|c| c.get(status)).max().unwrap_or(0)
    }
    
    /// First day on which a compartment reached its peak.
    pub fn peak_day(&self, status: Status) -> Option<usize> {
        let peak = self.peak(status);
        self.days.iter().position(|c| c.get(status) == peak)
    }
}

/// Wire form of a timeline.
#[derive(Serialize, Deserialize)]
struct TimelineSeries {
    susceptible: Vec<usize>,
    infected: Vec<usize>,
    hospitalized: Vec<usize>,
    recovered: Vec<usize>,
    deceased: Vec<usize>,
}

impl Serialize for Timeline {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TimelineSeries {
            susceptible: self.series(Status::Susceptible),
            infected: self.series(Status::Infected),
            hospitalized: self.series(Status::Hospitalized),
            recovered: self.series(Status::Recovered),
            deceased: self.series(Status::Deceased),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Timeline {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let series = TimelineSeries::deserialize(deserializer)?;
        let len = series.susceptible.len();
        let lengths = [
            series.infected.len(),
            series.hospitalized.len(),
            series.recovered.len(),
            series.deceased.len(),
        ];
        if lengths.iter().any(|&l| l != len) {
            return Err(serde::de::Error::custom("timeline series have different lengths"));
        }
        
        let days = (0..len)
            .map(|d| CompartmentCounts {
                susceptible: series.susceptible[d],
                infected: series.infected[d],
                hospitalized: series.hospitalized[d],
                recovered: series.recovered[d],
                deceased: series.deceased[d],
            })
            .collect();
        Ok(Self { days })
    }
}

/// Full per-node status snapshot for every day of a run.
///
/// Memory is O(days x nodes); runs that only need counts skip it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistory {
    snapshots: Vec<Vec<Status>>,
}

impl StatusHistory {
    /// Appends a day's snapshot.
    pub fn push(&mut self, snapshot: Vec<Status>) {
        self.snapshots.push(snapshot);
    }
    
    /// Number of recorded days.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
    
    /// Returns true if no day was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
    
    /// Snapshot of one day.
    pub fn day(&self, day: usize) -> Option<&[Status]> {
        self.snapshots.get(day).map(|s| s.as_slice())
    }
    
    /// Status of one node on one day.
    pub fn status(&self, day: usize, node: NodeId) -> Option<Status> {
        self.snapshots.get(day)?.get(node.index()).copied()
    }
    
    /// Status of one node over all days.
    pub fn trajectory(&self, node: NodeId) -> Vec<Status> {
        self.snapshots
            .iter()
            .filter_map(|s| s.get(node.index()).copied())
            .collect()
    }
    
    /// Iterates snapshots, day 0 first.
    pub fn iter(&self) -> impl Iterator<Item = &[Status]> {
        self.snapshots.iter().map(|s| s.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_tally_sums_to_population() {
        let statuses = [
            Status::Susceptible,
            Status::Susceptible,
            Status::Infected,
            Status::Hospitalized,
            Status::Deceased,
        ];
        let counts = CompartmentCounts::tally(statuses);
        
        assert_eq!(counts.as_tuple(), (2, 1, 1, 0, 1));
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.active(), 2);
        assert_eq!(counts.ever_infected(), 3);
    }
    
    #[test]
    fn test_zero_population_counts() {
        let counts = CompartmentCounts::from_records(&[]);
        assert_eq!(counts, CompartmentCounts::default());
        assert_eq!(counts.total(), 0);
    }
    
    #[test]
    fn test_timeline_series_and_peak() {
        let mut timeline = Timeline::with_capacity(3);
        for infected in [1, 4, 2] {
            timeline.push(CompartmentCounts {
                susceptible: 10 - infected,
                infected,
                ..Default::default()
            });
        }
        
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.series(Status::Infected), vec![1, 4, 2]);
        assert_eq!(timeline.peak(Status::Infected), 4);
        assert_eq!(timeline.peak_day(Status::Infected), Some(1));
        assert_eq!(timeline.peak(Status::Deceased), 0);
        assert_eq!(Timeline::default().peak(Status::Infected), 0);
    }
    
    #[test]
    fn test_timeline_serializes_named_series() {
        let mut timeline = Timeline::default();
        timeline.push(CompartmentCounts { susceptible: 3, infected: 1, ..Default::default() });
        timeline.push(CompartmentCounts { susceptible: 2, infected: 2, ..Default::default() });
        
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["susceptible"], serde_json::json!([3, 2]));
        assert_eq!(json["infected"], serde_json::json!([1, 2]));
        assert_eq!(json["deceased"], serde_json::json!([0, 0]));
        
        let back: Timeline = serde_json::from_value(json).unwrap();
        assert_eq!(back, timeline);
    }
    
    #[test]
    fn test_timeline_rejects_ragged_series() {
        let json = serde_json::json!({
            "susceptible": [1, 2],
            "infected": [0],
            "hospitalized": [0, 0],
            "recovered": [0, 0],
            "deceased": [0, 0],
        });
        assert!(serde_json::from_value::<Timeline>(json).is_err());
    }
    
    #[test]
    fn test_history_lookup() {
        let mut history = StatusHistory::default();
        history.push(vec![Status::Infected, Status::Susceptible]);
        history.push(vec![Status::Recovered, Status::Infected]);
        
        assert_eq!(history.status(1, NodeId(1)), Some(Status::Infected));
        assert_eq!(history.status(2, NodeId(0)), None);
        assert_eq!(history.trajectory(NodeId(0)), vec![Status::Infected, Status::Recovered]);
    }
}
