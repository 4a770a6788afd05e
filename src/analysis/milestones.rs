//! Milestone detection: one-shot threshold events plus running trait
//! records.

use crate::config::AnalysisConfig;
use crate::genetics::traits::TraitKind;
use crate::organism::OrganismId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Population loss fraction that counts as a mass extinction
const MASS_EXTINCTION_FRACTION: f32 = 0.5;

/// Milestone kinds. Threshold kinds fire at most once per run; trait
/// records fire whenever the all-time maximum is beaten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneKind {
    PopulationReached(u32),
    GenerationReached(u32),
    SpeciesCountReached(u32),
    DaysSurvived(u32),
    FirstSpeciation,
    MassExtinction,
    TraitRecord(TraitKind),
}

/// A milestone that fired
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub day: u32,
    /// The organism behind the milestone, when one can be named: the
    /// record holder for trait records, the newest generation's member
    /// for generation thresholds
    pub organism_id: Option<OrganismId>,
    /// The number that crossed: population, generation, record value, ...
    pub value: f32,
    pub description: String,
}

/// What the tracker sees once per day
#[derive(Clone, Copy, Debug)]
pub struct DayObservation {
    pub day: u32,
    pub population: usize,
    pub previous_population: usize,
    pub max_generation: u32,
    /// An organism of the highest living generation
    pub max_generation_holder: Option<OrganismId>,
    pub species_count: usize,
    pub trait_maxima: [f32; TraitKind::COUNT],
    /// The organism holding each trait maximum
    pub trait_maxima_holders: [Option<OrganismId>; TraitKind::COUNT],
}

/// Detects milestones across the run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MilestoneTracker {
    achieved: HashSet<MilestoneKind>,
    /// All-time per-trait maxima; `None` until the first observation,
    /// which seeds the baseline without firing records
    trait_records: Option<[f32; TraitKind::COUNT]>,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one day's numbers and return every milestone that fired
    pub fn observe(&mut self, obs: &DayObservation, config: &AnalysisConfig) -> Vec<Milestone> {
        let mut fired = Vec::new();

        for &threshold in &config.population_thresholds {
            if obs.population as u32 >= threshold {
                self.fire_once(
                    MilestoneKind::PopulationReached(threshold),
                    obs.day,
                    None,
                    obs.population as f32,
                    format!("population reached {}", threshold),
                    &mut fired,
                );
            }
        }
        for &threshold in &config.generation_thresholds {
            if obs.max_generation >= threshold {
                self.fire_once(
                    MilestoneKind::GenerationReached(threshold),
                    obs.day,
                    obs.max_generation_holder,
                    obs.max_generation as f32,
                    format!("generation {} born", threshold),
                    &mut fired,
                );
            }
        }
        for &threshold in &config.species_thresholds {
            if obs.species_count as u32 >= threshold {
                self.fire_once(
                    MilestoneKind::SpeciesCountReached(threshold),
                    obs.day,
                    None,
                    obs.species_count as f32,
                    format!("{} species recorded", threshold),
                    &mut fired,
                );
            }
        }
        for &threshold in &config.day_thresholds {
            if obs.day >= threshold {
                self.fire_once(
                    MilestoneKind::DaysSurvived(threshold),
                    obs.day,
                    None,
                    obs.day as f32,
                    format!("survived {} days", threshold),
                    &mut fired,
                );
            }
        }

        if obs.species_count >= 2 {
            self.fire_once(
                MilestoneKind::FirstSpeciation,
                obs.day,
                None,
                obs.species_count as f32,
                "first new species branched off".to_string(),
                &mut fired,
            );
        }

        if obs.previous_population > 0
            && (obs.population as f32)
                <= obs.previous_population as f32 * (1.0 - MASS_EXTINCTION_FRACTION)
        {
            self.fire_once(
                MilestoneKind::MassExtinction,
                obs.day,
                None,
                obs.population as f32,
                format!(
                    "mass extinction: population fell {} to {}",
                    obs.previous_population, obs.population
                ),
                &mut fired,
            );
        }

        self.check_trait_records(obs, &mut fired);
        fired
    }

    fn fire_once(
        &mut self,
        kind: MilestoneKind,
        day: u32,
        organism_id: Option<OrganismId>,
        value: f32,
        description: String,
        fired: &mut Vec<Milestone>,
    ) {
        if self.achieved.insert(kind) {
            fired.push(Milestone {
                kind,
                day,
                organism_id,
                value,
                description,
            });
        }
    }

    fn check_trait_records(&mut self, obs: &DayObservation, fired: &mut Vec<Milestone>) {
        match &mut self.trait_records {
            // First observation seeds the baseline silently
            None => self.trait_records = Some(obs.trait_maxima),
            Some(records) => {
                for kind in TraitKind::ALL {
                    let current = obs.trait_maxima[kind.index()];
                    if current > records[kind.index()] + f32::EPSILON {
                        records[kind.index()] = current;
                        fired.push(Milestone {
                            kind: MilestoneKind::TraitRecord(kind),
                            day: obs.day,
                            organism_id: obs.trait_maxima_holders[kind.index()],
                            value: current,
                            description: format!("new {} record: {:.2}", kind.name(), current),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(day: u32, population: usize) -> DayObservation {
        DayObservation {
            day,
            population,
            previous_population: population,
            max_generation: 0,
            max_generation_holder: None,
            species_count: 1,
            trait_maxima: [0.0; TraitKind::COUNT],
            trait_maxima_holders: [None; TraitKind::COUNT],
        }
    }

    #[test]
    fn test_population_milestone_fires_once() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        let fired = tracker.observe(&observation(1, 30), &config);
        assert!(fired
            .iter()
            .any(|m| m.kind == MilestoneKind::PopulationReached(25)));

        // Same threshold never fires again, even after dipping below
        let fired = tracker.observe(&observation(2, 10), &config);
        assert!(fired.is_empty());
        let fired = tracker.observe(&observation(3, 30), &config);
        assert!(!fired
            .iter()
            .any(|m| m.kind == MilestoneKind::PopulationReached(25)));
    }

    #[test]
    fn test_first_speciation() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        let mut obs = observation(1, 5);
        assert!(tracker.observe(&obs, &config).is_empty());

        obs.day = 2;
        obs.species_count = 2;
        let fired = tracker.observe(&obs, &config);
        assert!(fired
            .iter()
            .any(|m| m.kind == MilestoneKind::FirstSpeciation));
    }

    #[test]
    fn test_mass_extinction_fires_at_half_loss() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        // 40 -> 21 is under a 50% loss
        let mut obs = observation(1, 21);
        obs.previous_population = 40;
        assert!(!tracker
            .observe(&obs, &config)
            .iter()
            .any(|m| m.kind == MilestoneKind::MassExtinction));

        let mut obs = observation(2, 10);
        obs.previous_population = 40;
        assert!(tracker
            .observe(&obs, &config)
            .iter()
            .any(|m| m.kind == MilestoneKind::MassExtinction));
    }

    #[test]
    fn test_mass_extinction_in_small_population() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        // 8 -> 3 is a 62% loss; population size does not gate the event
        let mut obs = observation(1, 3);
        obs.previous_population = 8;
        let fired = tracker.observe(&obs, &config);
        assert!(fired
            .iter()
            .any(|m| m.kind == MilestoneKind::MassExtinction));
    }

    #[test]
    fn test_milestones_name_the_organism() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        let mut obs = observation(1, 5);
        obs.trait_maxima[TraitKind::Size.index()] = 2.0;
        obs.trait_maxima_holders[TraitKind::Size.index()] = Some(41);
        assert!(tracker.observe(&obs, &config).is_empty());

        // A new record is attributed to its holder
        obs.day = 2;
        obs.trait_maxima[TraitKind::Size.index()] = 2.5;
        obs.trait_maxima_holders[TraitKind::Size.index()] = Some(77);
        let fired = tracker.observe(&obs, &config);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].organism_id, Some(77));

        // A generation threshold names a member of that generation;
        // population thresholds have no single organism behind them
        let mut obs = observation(3, 30);
        obs.max_generation = 10;
        obs.max_generation_holder = Some(90);
        let fired = tracker.observe(&obs, &config);
        let generation = fired
            .iter()
            .find(|m| m.kind == MilestoneKind::GenerationReached(10))
            .unwrap();
        assert_eq!(generation.organism_id, Some(90));
        let population = fired
            .iter()
            .find(|m| m.kind == MilestoneKind::PopulationReached(25))
            .unwrap();
        assert_eq!(population.organism_id, None);
    }

    #[test]
    fn test_trait_records_seed_silently() {
        let config = AnalysisConfig::default();
        let mut tracker = MilestoneTracker::new();

        let mut obs = observation(1, 5);
        obs.trait_maxima[TraitKind::Speed.index()] = 20.0;
        let fired = tracker.observe(&obs, &config);
        assert!(fired.is_empty());

        // Beating the seeded maximum fires a record
        obs.day = 2;
        obs.trait_maxima[TraitKind::Speed.index()] = 22.0;
        let fired = tracker.observe(&obs, &config);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, MilestoneKind::TraitRecord(TraitKind::Speed));

        // Matching the record does not fire
        obs.day = 3;
        let fired = tracker.observe(&obs, &config);
        assert!(fired.is_empty());
    }
}
