//! Speciation: offspring that drift far enough from their parent found a
//! new species, identified by the founder's own organism id.

use crate::config::Config;
use crate::organism::{Organism, OrganismId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A species and its bookkeeping
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    /// Species id, equal to the founding organism's id
    pub id: OrganismId,
    pub founder_id: OrganismId,
    /// Live member count as of the last census
    pub population: usize,
    pub founded_day: u32,
    /// Day the species lost its last member, if it has
    pub extinct_day: Option<u32>,
}

impl Species {
    pub fn is_extinct(&self) -> bool {
        self.extinct_day.is_some()
    }
}

/// Registry of every species ever founded
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SpeciesRegistry {
    species: HashMap<OrganismId, Species>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a founding. The initial population founds one species
    /// together; later foundings are single offspring.
    pub fn found(&mut self, species_id: OrganismId, founder_id: OrganismId, day: u32) {
        self.species.entry(species_id).or_insert(Species {
            id: species_id,
            founder_id,
            population: 0,
            founded_day: day,
            extinct_day: None,
        });
    }

    /// Species id for a new offspring: its own id when the genetic distance
    /// to the parent reaches the threshold, the parent's otherwise.
    pub fn assign_species(
        &mut self,
        parent: &Organism,
        child_id: OrganismId,
        child: &Organism,
        config: &Config,
        day: u32,
    ) -> OrganismId {
        let distance = child.traits.genetic_distance(&parent.traits, &config.traits);
        if distance >= config.speciation.threshold {
            self.found(child_id, child_id, day);
            child_id
        } else {
            parent.species_id
        }
    }

    /// Recount live members per species and mark newly emptied species
    /// extinct. Extinction day sticks at the first day it was observed.
    pub fn census<'a>(&mut self, members: impl Iterator<Item = &'a Organism>, day: u32) {
        for species in self.species.values_mut() {
            species.population = 0;
        }
        for organism in members {
            if let Some(species) = self.species.get_mut(&organism.species_id) {
                species.population += 1;
            }
        }
        for species in self.species.values_mut() {
            if species.population == 0 && species.extinct_day.is_none() {
                species.extinct_day = Some(day);
            }
        }
    }

    pub fn get(&self, id: OrganismId) -> Option<&Species> {
        self.species.get(&id)
    }

    pub fn living_count(&self) -> usize {
        self.species.values().filter(|s| !s.is_extinct()).count()
    }

    pub fn total_count(&self) -> usize {
        self.species.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }
}
