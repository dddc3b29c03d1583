//! Population state: per-individual attributes and epidemic records.
//!
//! Attributes and records are arenas indexed by `NodeId::index()`, kept
//! apart from the contact graph (the graph stays purely topological).

use crate::error::{check_probability, SimError};
use crate::risk::{risk_factor, DEFAULT_VACCINATION_RATE, MAX_AGE};
use crate::status::Status;
use epidemia_env::{ContactGraph, NodeId};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// =============================================================================
// INDIVIDUAL ATTRIBUTES
// =============================================================================

/// Fixed traits of one individual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Age in years, 0..=100
    pub age: u8,
    
    /// Vaccination status
    pub vaccinated: bool,
    
    /// Multiplier on all per-day probabilities, in (0, 1]
    pub risk_factor: f64,
}

impl Attributes {
    /// Creates attributes with the risk factor derived from age and vaccination.
    pub fn new(age: u8, vaccinated: bool) -> Self {
        Self {
            age,
            vaccinated,
            risk_factor: risk_factor(age, vaccinated),
        }
    }
    
    /// Creates attributes with an explicit risk factor.
    ///
    /// Used for externally supplied populations and for pinning risk in tests.
    pub fn with_risk_factor(age: u8, vaccinated: bool, risk_factor: f64) -> Self {
        Self {
            age,
            vaccinated,
            risk_factor,
        }
    }
    
    fn check(&self, node: NodeId) -> Result<(), SimError> {
        if self.age > MAX_AGE {
            return Err(SimError::precondition(format!(
                "node {} has age {} (maximum {})",
                node, self.age, MAX_AGE
            )));
        }
        if !(self.risk_factor > 0.0 && self.risk_factor <= 1.0) {
            return Err(SimError::precondition(format!(
                "node {} has risk factor {} outside (0, 1]",
                node, self.risk_factor
            )));
        }
        Ok(())
    }
}

/// How vaccination status is drawn for freshly generated attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VaccinationPolicy {
    /// Bernoulli draw at the default 70% rate
    #[default]
    BaseRate,
    
    /// Bernoulli draw at a caller-chosen rate
    Rate(f64),
}

impl VaccinationPolicy {
    /// Returns the vaccination probability.
    pub fn rate(&self) -> f64 {
        match self {
            VaccinationPolicy::BaseRate => DEFAULT_VACCINATION_RATE,
            VaccinationPolicy::Rate(rate) => *rate,
        }
    }
}

/// Per-node attribute storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStore {
    records: Vec<Attributes>,
}

impl AttributeStore {
    /// Wraps existing attribute records (index = node id).
    pub fn from_records(records: Vec<Attributes>) -> Self {
        Self { records }
    }
    
    /// Creates `count` copies of the same attributes.
    pub fn uniform(count: usize, attributes: Attributes) -> Self {
        Self {
            records: vec![attributes; count],
        }
    }
    
    /// Draws attributes for every node of a graph.
    ///
    /// Per node, in ascending id order: `age ~ Uniform{0..=100}`, then
    /// vaccination from `vaccinated_for` if given, else from `policy`.
    pub fn generate<G, R>(
        graph: &G,
        policy: VaccinationPolicy,
        mut vaccinated_for: Option<&mut dyn FnMut(NodeId) -> bool>,
        rng: &mut R,
    ) -> Result<Self, SimError>
    where
        G: ContactGraph + ?Sized,
        R: Rng + ?Sized,
    {
        let rate = policy.rate();
        check_probability("vaccination_rate", rate)?;
        let vaccination = Bernoulli::new(rate)
            .map_err(|e| SimError::config("vaccination_rate", e.to_string()))?;
        let ages = Uniform::new_inclusive(0u8, MAX_AGE);
        
        let mut records = Vec::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let age = ages.sample(rng);
            let vaccinated = match vaccinated_for.as_deref_mut() {
                Some(decide) => decide(node),
                None => vaccination.sample(rng),
            };
            records.push(Attributes::new(age, vaccinated));
        }
        
        Ok(Self { records })
    }
    
    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
    
    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    
    /// Returns the attributes of a node.
    pub fn get(&self, node: NodeId) -> Option<&Attributes> {
        self.records.get(node.index())
    }
    
    /// Replaces the attributes of a node.
    pub fn set(&mut self, node: NodeId, attributes: Attributes) -> Result<(), SimError> {
        attributes.check(node)?;
        let slot = self.records
            .get_mut(node.index())
            .ok_or_else(|| SimError::precondition(format!("no attributes for node {}", node)))?;
        *slot = attributes;
        Ok(())
    }
    
    /// Overrides vaccination status and recomputes the risk factor.
    pub fn set_vaccinated(&mut self, node: NodeId, vaccinated: bool) -> Result<(), SimError> {
        let age = self
            .get(node)
            .ok_or_else(|| SimError::precondition(format!("no attributes for node {}", node)))?
            .age;
        self.set(node, Attributes::new(age, vaccinated))
    }
    
    /// Returns the risk factor of a node.
    pub fn risk_factor(&self, node: NodeId) -> Option<f64> {
        self.get(node).map(|a| a.risk_factor)
    }
    
    /// Iterates attributes in node order.
    pub fn iter(&self) -> impl Iterator<Item = &Attributes> {
        self.records.iter()
    }
    
    /// Mean age (0 for an empty store).
    pub fn mean_age(&self) -> f64 {
        mean(self.records.iter().map(|a| a.age as f64), self.len())
    }
    
    /// Mean risk factor (0 for an empty store).
    pub fn mean_risk_factor(&self) -> f64 {
        mean(self.records.iter().map(|a| a.risk_factor), self.len())
    }
    
    /// Fraction of vaccinated individuals (0 for an empty store).
    pub fn vaccinated_fraction(&self) -> f64 {
        mean(self.records.iter().map(|a| if a.vaccinated { 1.0 } else { 0.0 }), self.len())
    }
    
    /// Validates every record (age range, risk factor in (0, 1]).
    pub(crate) fn check_all(&self) -> Result<(), SimError> {
        for (index, attributes) in self.records.iter().enumerate() {
            attributes.check(NodeId::from_index(index))?;
        }
        Ok(())
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

// =============================================================================
// EPIDEMIC RECORDS
// =============================================================================

/// Mutable epidemic bookkeeping of one individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpidemicRecord {
    /// Current compartment
    pub status: Status,
    
    /// Infection day counter; `None` while never infected
    ///
    /// Set to the day of infection, then advanced by one for every day the
    /// individual stays INFECTED.
    pub infection_day: Option<u32>,
    
    /// Day of hospital admission; `None` unless ever hospitalized
    pub hospitalization_day: Option<u32>,
}

impl EpidemicRecord {
    /// A never-infected individual.
    pub fn susceptible() -> Self {
        Self {
            status: Status::Susceptible,
            infection_day: None,
            hospitalization_day: None,
        }
    }
    
    /// An individual infected on `day`.
    pub fn infected(day: u32) -> Self {
        Self {
            status: Status::Infected,
            infection_day: Some(day),
            hospitalization_day: None,
        }
    }
    
    /// Checks the day counters are consistent with the status.
    pub fn check(&self, node: NodeId) -> Result<(), SimError> {
        let consistent = match self.status {
            Status::Susceptible => self.infection_day.is_none() && self.hospitalization_day.is_none(),
            Status::Infected => self.infection_day.is_some() && self.hospitalization_day.is_none(),
            Status::Hospitalized => self.hospitalization_day.is_some(),
            Status::Recovered | Status::Deceased => true,
        };
        if consistent {
            Ok(())
        } else {
            Err(SimError::precondition(format!(
                "node {} is {} with infection_day={:?} hospitalization_day={:?}",
                node, self.status, self.infection_day, self.hospitalization_day
            )))
        }
    }
}

impl Default for EpidemicRecord {
    fn default() -> Self {
        Self::susceptible()
    }
}

// =============================================================================
// POPULATION
// =============================================================================

/// Attributes plus epidemic records for every node of a contact graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    attributes: AttributeStore,
    records: Vec<EpidemicRecord>,
    initial_infected: Vec<NodeId>,
}

impl Population {
    /// Assembles a population from existing parts.
    ///
    /// Every record is checked for consistent day counters.
    pub fn from_parts(attributes: AttributeStore, records: Vec<EpidemicRecord>) -> Result<Self, SimError> {
        if attributes.len() != records.len() {
            return Err(SimError::precondition(format!(
                "{} attribute records but {} epidemic records",
                attributes.len(),
                records.len()
            )));
        }
        attributes.check_all()?;
        for (index, record) in records.iter().enumerate() {
            record.check(NodeId::from_index(index))?;
        }
        
        let initial_infected = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == Status::Infected)
            .map(|(i, _)| NodeId::from_index(i))
            .collect();
        
        Ok(Self {
            attributes,
            records,
            initial_infected,
        })
    }
    
    /// Returns the number of individuals.
    pub fn len(&self) -> usize {
        self.records.len()
    }
    
    /// Returns true for an empty population.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    
    /// Returns the attribute store.
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }
    
    /// Returns the attribute store for overrides before a run.
    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }
    
    /// Returns all epidemic records in node order.
    pub fn records(&self) -> &[EpidemicRecord] {
        &self.records
    }
    
    /// Returns the record of a node.
    pub fn record(&self, node: NodeId) -> Option<&EpidemicRecord> {
        self.records.get(node.index())
    }
    
    /// Returns the status of a node.
    pub fn status(&self, node: NodeId) -> Option<Status> {
        self.record(node).map(|r| r.status)
    }
    
    /// Returns the nodes infected at initialization, ascending.
    pub fn initial_infected(&self) -> &[NodeId] {
        &self.initial_infected
    }
    
    /// Returns the status of every node.
    pub fn statuses(&self) -> Vec<Status> {
        self.records.iter().map(|r| r.status).collect()
    }
    
    /// Checks that this population describes exactly the nodes of `graph`.
    pub fn check_graph<G: ContactGraph + ?Sized>(&self, graph: &G) -> Result<(), SimError> {
        if self.len() != graph.node_count() {
            return Err(SimError::precondition(format!(
                "population has {} individuals but graph has {} nodes",
                self.len(),
                graph.node_count()
            )));
        }
        Ok(())
    }
    
    pub(crate) fn replace_records(&mut self, records: Vec<EpidemicRecord>) {
        debug_assert_eq!(records.len(), self.records.len());
        self.records = records;
    }
    
    /// Splits into attribute store and records.
    pub fn into_parts(self) -> (AttributeStore, Vec<EpidemicRecord>) {
        (self.attributes, self.records)
    }
}

/// Initializes a population over a contact graph.
///
/// # Example
///
/// ```
/// use epidemia_core::PopulationBuilder;
/// use epidemia_env::generators;
/// use rand::SeedableRng;
///
/// let graph = generators::cycle(200);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let population = PopulationBuilder::new(0.05).build(&graph, &mut rng).unwrap();
///
/// assert_eq!(population.initial_infected().len(), 10);
/// ```
pub struct PopulationBuilder<'a> {
    /// Fraction of nodes infected on day 0
    infected_fraction: f64,
    
    /// Vaccination draw for fresh attributes
    vaccination: VaccinationPolicy,
    
    /// Per-node vaccination override for fresh attributes
    vaccinated_for: Option<Box<dyn FnMut(NodeId) -> bool + 'a>>,
    
    /// Attributes reused instead of drawn
    preserved: Option<AttributeStore>,
}

impl<'a> PopulationBuilder<'a> {
    /// Creates a builder infecting `infected_fraction` of the population.
    pub fn new(infected_fraction: f64) -> Self {
        Self {
            infected_fraction,
            vaccination: VaccinationPolicy::BaseRate,
            vaccinated_for: None,
            preserved: None,
        }
    }
    
    /// Sets the vaccination policy for fresh attributes.
    pub fn with_vaccination(mut self, policy: VaccinationPolicy) -> Self {
        self.vaccination = policy;
        self
    }
    
    /// Decides vaccination per node instead of drawing it.
    pub fn with_vaccination_fn<F>(mut self, decide: F) -> Self
    where
        F: FnMut(NodeId) -> bool + 'a,
    {
        self.vaccinated_for = Some(Box::new(decide));
        self
    }
    
    /// Reuses existing attributes; only records and initial infections are drawn.
    pub fn preserve_attributes(mut self, attributes: AttributeStore) -> Self {
        self.preserved = Some(attributes);
        self
    }
    
    /// Builds the population.
    ///
    /// Exactly `round(node_count * infected_fraction)` nodes, sampled
    /// uniformly without replacement, start INFECTED with infection day 0.
    pub fn build<G, R>(self, graph: &G, rng: &mut R) -> Result<Population, SimError>
    where
        G: ContactGraph + ?Sized,
        R: Rng + ?Sized,
    {
        check_probability("initial_infected_fraction", self.infected_fraction)?;
        let node_count = graph.node_count();
        
        let attributes = match self.preserved {
            Some(store) => {
                if store.len() != node_count {
                    return Err(SimError::precondition(format!(
                        "preserved attributes cover {} nodes but graph has {}",
                        store.len(),
                        node_count
                    )));
                }
                store.check_all()?;
                if self.vaccinated_for.is_some() {
                    warn!("Vaccination override ignored: attributes are preserved");
                }
                store
            }
            None => {
                let mut vaccinated_for = self.vaccinated_for;
                let decide = vaccinated_for
                    .as_mut()
                    .map(|f| f.as_mut() as &mut dyn FnMut(NodeId) -> bool);
                AttributeStore::generate(graph, self.vaccination, decide, rng)?
            }
        };
        
        let infected_count = (node_count as f64 * self.infected_fraction).round() as usize;
        let infected_count = infected_count.min(node_count);
        if infected_count == 0 && self.infected_fraction > 0.0 && node_count > 0 {
            warn!(
                "Initial infected fraction {} rounds to zero of {} nodes",
                self.infected_fraction, node_count
            );
        }
        
        let mut records = vec![EpidemicRecord::susceptible(); node_count];
        let mut initial_infected: Vec<NodeId> = rand::seq::index::sample(rng, node_count, infected_count)
            .into_iter()
            .map(NodeId::from_index)
            .collect();
        initial_infected.sort_unstable();
        for node in &initial_infected {
            records[node.index()] = EpidemicRecord::infected(0);
        }
        
        debug!(
            "Population initialized: {} nodes, {} infected, {:.1}% vaccinated",
            node_count,
            initial_infected.len(),
            attributes.vaccinated_fraction() * 100.0
        );
        
        Ok(Population {
            attributes,
            records,
            initial_infected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use epidemia_env::generators;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    
    #[test]
    fn test_exact_initial_infected_count() {
        let graph = generators::empty(1000);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        
        let population = PopulationBuilder::new(0.0126).build(&graph, &mut rng).unwrap();
        
        // round(1000 * 0.0126) = 13, not the truncated 12
        assert_eq!(population.initial_infected().len(), 13);
        let infected = population.records().iter().filter(|r| r.status == Status::Infected).count();
        assert_eq!(infected, 13);
    }
    
    #[test]
    fn test_initial_records() {
        let graph = generators::cycle(50);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let population = PopulationBuilder::new(0.1).build(&graph, &mut rng).unwrap();
        
        for node in graph.nodes() {
            let record = population.record(node).unwrap();
            match record.status {
                Status::Infected => assert_eq!(record.infection_day, Some(0)),
                Status::Susceptible => assert_eq!(record.infection_day, None),
                other => panic!("unexpected initial status {}", other),
            }
            assert_eq!(record.hospitalization_day, None);
        }
    }
    
    #[test]
    fn test_initial_infected_distinct_and_sorted() {
        let graph = generators::empty(100);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let population = PopulationBuilder::new(0.5).build(&graph, &mut rng).unwrap();
        
        let nodes = population.initial_infected();
        assert_eq!(nodes.len(), 50);
        assert!(nodes.windows(2).all(|w| w[0] < w[1]));
    }
    
    #[test]
    fn test_full_and_zero_fraction() {
        let graph = generators::empty(20);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        
        let all = PopulationBuilder::new(1.0).build(&graph, &mut rng).unwrap();
        assert_eq!(all.initial_infected().len(), 20);
        
        let none = PopulationBuilder::new(0.0).build(&graph, &mut rng).unwrap();
        assert!(none.initial_infected().is_empty());
    }
    
    #[test]
    fn test_rejects_fraction_out_of_range() {
        let graph = generators::empty(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        
        let err = PopulationBuilder::new(1.5).build(&graph, &mut rng).unwrap_err();
        assert!(err.is_configuration());
    }
    
    #[test]
    fn test_generated_attributes_in_range() {
        let graph = generators::empty(2000);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let population = PopulationBuilder::new(0.0).build(&graph, &mut rng).unwrap();
        let attributes = population.attributes();
        
        assert_eq!(attributes.len(), 2000);
        for a in attributes.iter() {
            assert!(a.age <= MAX_AGE);
            assert!(a.risk_factor > 0.0 && a.risk_factor <= 1.0);
            assert_relative_eq!(a.risk_factor, risk_factor(a.age, a.vaccinated));
        }
        
        // 70% base rate, loose bound for 2000 draws
        let vaccinated = attributes.vaccinated_fraction();
        assert!((vaccinated - 0.7).abs() < 0.05, "vaccinated fraction {}", vaccinated);
    }
    
    #[test]
    fn test_vaccination_rate_policy() {
        let graph = generators::empty(500);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        
        let nobody = PopulationBuilder::new(0.0)
            .with_vaccination(VaccinationPolicy::Rate(0.0))
            .build(&graph, &mut rng)
            .unwrap();
        assert_eq!(nobody.attributes().vaccinated_fraction(), 0.0);
        
        let bad = PopulationBuilder::new(0.0)
            .with_vaccination(VaccinationPolicy::Rate(1.2))
            .build(&graph, &mut rng);
        assert!(bad.unwrap_err().is_configuration());
    }
    
    #[test]
    fn test_vaccination_fn_override() {
        let graph = generators::empty(10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        
        let population = PopulationBuilder::new(0.0)
            .with_vaccination_fn(|node| node.0 % 2 == 0)
            .build(&graph, &mut rng)
            .unwrap();
        
        for node in graph.nodes() {
            let vaccinated = population.attributes().get(node).unwrap().vaccinated;
            assert_eq!(vaccinated, node.0 % 2 == 0);
        }
    }
    
    #[test]
    fn test_preserve_attributes_mode() {
        let graph = generators::cycle(30);
        let stored = AttributeStore::uniform(30, Attributes::new(85, false));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        
        let population = PopulationBuilder::new(0.1)
            .preserve_attributes(stored.clone())
            .build(&graph, &mut rng)
            .unwrap();
        
        // Attributes untouched, infections still drawn
        assert_eq!(population.attributes(), &stored);
        assert_eq!(population.initial_infected().len(), 3);
    }
    
    #[test]
    fn test_preserve_attributes_size_mismatch() {
        let graph = generators::cycle(30);
        let stored = AttributeStore::uniform(29, Attributes::new(40, true));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        
        let err = PopulationBuilder::new(0.1)
            .preserve_attributes(stored)
            .build(&graph, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimError::Precondition(_)));
    }
    
    #[test]
    fn test_preserve_attributes_rejects_bad_risk() {
        let graph = generators::empty(2);
        let stored = AttributeStore::uniform(2, Attributes::with_risk_factor(40, false, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        
        let result = PopulationBuilder::new(0.0).preserve_attributes(stored).build(&graph, &mut rng);
        assert!(matches!(result, Err(SimError::Precondition(_))));
    }
    
    #[test]
    fn test_same_seed_same_population() {
        let graph = generators::cycle(300);
        let mut rng1 = ChaCha8Rng::seed_from_u64(77);
        let mut rng2 = ChaCha8Rng::seed_from_u64(77);
        
        let p1 = PopulationBuilder::new(0.02).build(&graph, &mut rng1).unwrap();
        let p2 = PopulationBuilder::new(0.02).build(&graph, &mut rng2).unwrap();
        
        assert_eq!(p1, p2);
    }
    
    #[test]
    fn test_set_vaccinated_recomputes_risk() {
        let mut store = AttributeStore::uniform(3, Attributes::new(100, false));
        store.set_vaccinated(NodeId(1), true).unwrap();
        
        assert_relative_eq!(store.risk_factor(NodeId(1)).unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(store.risk_factor(NodeId(0)).unwrap(), 1.0);
        assert!(store.set_vaccinated(NodeId(3), true).is_err());
    }
    
    #[test]
    fn test_record_consistency_checks() {
        let hospitalized_without_day = EpidemicRecord {
            status: Status::Hospitalized,
            infection_day: Some(6),
            hospitalization_day: None,
        };
        assert!(hospitalized_without_day.check(NodeId(0)).is_err());
        assert!(EpidemicRecord::infected(3).check(NodeId(0)).is_ok());
        
        let store = AttributeStore::uniform(1, Attributes::new(30, false));
        let result = Population::from_parts(store, vec![hospitalized_without_day]);
        assert!(matches!(result, Err(SimError::Precondition(_))));
    }
    
    #[test]
    fn test_empty_population_means() {
        let store = AttributeStore::default();
        assert_eq!(store.mean_age(), 0.0);
        assert_eq!(store.mean_risk_factor(), 0.0);
    }
}
