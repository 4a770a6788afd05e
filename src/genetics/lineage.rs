//! Lineage tracking: descendant lines of the founding organisms, with a
//! dominance score for ranking them.

use crate::organism::OrganismId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A founding organism's line of descent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lineage {
    pub founder_id: OrganismId,
    /// Ids of currently living members
    pub alive: HashSet<OrganismId>,
    /// Every organism the line ever produced, founder included
    pub total_descendants: usize,
    pub peak_population: usize,
    pub founded_day: u32,
    pub extinct_day: Option<u32>,
}

impl Lineage {
    pub fn is_extinct(&self) -> bool {
        self.extinct_day.is_some()
    }
}

/// Tracks all lineages and maps each organism back to its founder
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LineageTracker {
    lineages: HashMap<OrganismId, Lineage>,
    founder_of: HashMap<OrganismId, OrganismId>,
}

impl LineageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lineage for a founding organism
    pub fn register_founder(&mut self, founder_id: OrganismId, day: u32) {
        self.lineages.entry(founder_id).or_insert_with(|| Lineage {
            founder_id,
            alive: HashSet::from([founder_id]),
            total_descendants: 1,
            peak_population: 1,
            founded_day: day,
            extinct_day: None,
        });
        self.founder_of.insert(founder_id, founder_id);
    }

    /// Record a birth into the parent's lineage
    pub fn register_birth(&mut self, parent_id: OrganismId, child_id: OrganismId) {
        let Some(&founder) = self.founder_of.get(&parent_id) else {
            return;
        };
        if let Some(lineage) = self.lineages.get_mut(&founder) {
            lineage.alive.insert(child_id);
            lineage.total_descendants += 1;
            lineage.peak_population = lineage.peak_population.max(lineage.alive.len());
            self.founder_of.insert(child_id, founder);
        }
    }

    /// Record a death; an emptied lineage is marked extinct at `day`
    pub fn register_death(&mut self, organism_id: OrganismId, day: u32) {
        let Some(&founder) = self.founder_of.get(&organism_id) else {
            return;
        };
        if let Some(lineage) = self.lineages.get_mut(&founder) {
            lineage.alive.remove(&organism_id);
            if lineage.alive.is_empty() && lineage.extinct_day.is_none() {
                lineage.extinct_day = Some(day);
            }
        }
    }

    /// Dominance score for ranking lineages: current population share
    /// weighs most, with longevity, total output, and peak size as
    /// secondary components.
    pub fn dominance(&self, founder_id: OrganismId, total_alive: usize, day: u32) -> f32 {
        let Some(lineage) = self.lineages.get(&founder_id) else {
            return 0.0;
        };
        let share = if total_alive > 0 {
            lineage.alive.len() as f32 / total_alive as f32
        } else {
            0.0
        };
        let age_days = day.saturating_sub(lineage.founded_day) as f32;
        share * 100.0
            + age_days * 0.5
            + lineage.total_descendants as f32 * 0.1
            + lineage.peak_population as f32 * 0.2
    }

    /// The most dominant living lineage, if any
    pub fn dominant(&self, total_alive: usize, day: u32) -> Option<&Lineage> {
        self.lineages
            .values()
            .filter(|l| !l.is_extinct())
            .max_by(|a, b| {
                self.dominance(a.founder_id, total_alive, day)
                    .total_cmp(&self.dominance(b.founder_id, total_alive, day))
            })
    }

    pub fn get(&self, founder_id: OrganismId) -> Option<&Lineage> {
        self.lineages.get(&founder_id)
    }

    pub fn living_count(&self) -> usize {
        self.lineages.values().filter(|l| !l.is_extinct()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lineage> {
        self.lineages.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_death_accounting() {
        let mut tracker = LineageTracker::new();
        tracker.register_founder(1, 0);

        tracker.register_birth(1, 2);
        tracker.register_birth(2, 3);

        let lineage = tracker.get(1).unwrap();
        assert_eq!(lineage.alive.len(), 3);
        assert_eq!(lineage.total_descendants, 3);
        assert_eq!(lineage.peak_population, 3);

        tracker.register_death(2, 5);
        let lineage = tracker.get(1).unwrap();
        assert_eq!(lineage.alive.len(), 2);
        // Peak does not shrink
        assert_eq!(lineage.peak_population, 3);
        assert!(!lineage.is_extinct());
    }

    #[test]
    fn test_lineage_extinction() {
        let mut tracker = LineageTracker::new();
        tracker.register_founder(1, 0);
        tracker.register_birth(1, 2);

        tracker.register_death(1, 3);
        tracker.register_death(2, 7);

        let lineage = tracker.get(1).unwrap();
        assert_eq!(lineage.extinct_day, Some(7));
        assert_eq!(tracker.living_count(), 0);
    }

    #[test]
    fn test_grandchildren_stay_in_line() {
        let mut tracker = LineageTracker::new();
        tracker.register_founder(1, 0);
        tracker.register_founder(10, 0);

        tracker.register_birth(1, 2);
        tracker.register_birth(2, 3);
        tracker.register_birth(10, 11);

        assert_eq!(tracker.get(1).unwrap().total_descendants, 3);
        assert_eq!(tracker.get(10).unwrap().total_descendants, 2);
    }

    #[test]
    fn test_dominance_prefers_larger_line() {
        let mut tracker = LineageTracker::new();
        tracker.register_founder(1, 0);
        tracker.register_founder(2, 0);
        for child in 10..15 {
            tracker.register_birth(1, child);
        }

        let dominant = tracker.dominant(7, 10).unwrap();
        assert_eq!(dominant.founder_id, 1);
        assert!(tracker.dominance(1, 7, 10) > tracker.dominance(2, 7, 10));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut tracker = LineageTracker::new();
        tracker.register_birth(99, 100);
        tracker.register_death(99, 1);
        assert_eq!(tracker.living_count(), 0);
        assert_eq!(tracker.dominance(99, 10, 1), 0.0);
    }
}
