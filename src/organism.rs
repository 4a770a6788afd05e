//! Organism entity: trait vector, energy, age, and per-day transient state.

use crate::config::{Config, TraitBoundsConfig};
use crate::environment::food::FoodId;
use crate::genetics::traits::{TraitKind, TraitVector};
use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Arena handle for an organism (stable across removals of others)
    pub struct OrganismKey;
}

/// Stable serial identifier, unique across the whole run
pub type OrganismId = u64;

/// Base body radius before the size contribution
const BASE_RADIUS: f32 = 2.0;
/// Radius gained per unit of the size trait
const RADIUS_PER_SIZE: f32 = 2.0;
/// Fraction of base speed lost at maximum size (floor is 30% of base)
const MAX_SIZE_SPEED_PENALTY: f32 = 0.7;

/// Why an organism died, for the daily death breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Did not eat during the day
    Starvation,
    /// Reached its maximum age
    OldAge,
    /// Energy dropped to zero (metabolism or temperature)
    LowEnergy,
    /// Touched a hazard obstacle
    Hazard,
}

impl DeathCause {
    pub fn name(&self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::OldAge => "old_age",
            DeathCause::LowEnergy => "low_energy",
            DeathCause::Hazard => "hazard",
        }
    }
}

/// An organism in the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Organism {
    // Identity
    pub id: OrganismId,
    pub species_id: OrganismId,
    pub generation: u32,

    // Heritable traits
    pub traits: TraitVector,

    // Physical state
    pub position: Vec2,
    pub energy: f32,
    pub age: u32,

    // Per-day transient state
    pub has_food_today: bool,
    pub target_food: Option<FoodId>,

    // Death accounting
    pub cause_of_death: Option<DeathCause>,
}

impl Organism {
    pub fn new(
        id: OrganismId,
        species_id: OrganismId,
        generation: u32,
        traits: TraitVector,
        position: Vec2,
        energy: f32,
    ) -> Self {
        Self {
            id,
            species_id,
            generation,
            traits,
            position,
            energy,
            age: 0,
            has_food_today: false,
            target_food: None,
            cause_of_death: None,
        }
    }

    /// Body radius used for food capture and obstacle collision
    #[inline]
    pub fn radius(&self) -> f32 {
        BASE_RADIUS + self.traits.get(TraitKind::Size) * RADIUS_PER_SIZE
    }

    /// Movement speed after the size penalty: larger size linearly reduces
    /// speed, never below 30% of the base speed trait.
    pub fn effective_speed(&self, bounds: &TraitBoundsConfig) -> f32 {
        let base = self.traits.get(TraitKind::Speed);
        let size_norm = bounds
            .range(TraitKind::Size)
            .normalized(self.traits.get(TraitKind::Size));
        let factor = (1.0 - MAX_SIZE_SPEED_PENALTY * size_norm).max(1.0 - MAX_SIZE_SPEED_PENALTY);
        base * factor
    }

    /// Sense range after the night and weather visibility multipliers
    #[inline]
    pub fn effective_sense_range(&self, night_multiplier: f32, visibility: f32) -> f32 {
        self.traits.get(TraitKind::SenseRange) * night_multiplier * visibility
    }

    /// Apply aging and the flat end-of-day metabolism cost. The cost is
    /// scaled up by the metabolism trait and down by energy efficiency.
    pub fn end_of_day_update(&mut self, config: &Config) {
        self.age += 1;

        let metabolism = self.traits.get(TraitKind::Metabolism);
        let efficiency = self.traits.get(TraitKind::EnergyEfficiency).max(0.1);
        self.energy -= config.energy.daily_metabolism * metabolism / efficiency;
        self.energy = self.energy.min(config.energy.max_energy);
    }

    /// Reached the maximum age encoded by the max-age trait
    #[inline]
    pub fn is_past_max_age(&self) -> bool {
        self.age as f32 >= self.traits.get(TraitKind::MaxAge)
    }

    /// Clear the per-day transient state at the start of a new day
    pub fn reset_daily_state(&mut self) {
        self.has_food_today = false;
        self.target_food = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_organism(config: &Config) -> Organism {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let traits = TraitVector::random(&config.traits, &mut rng);
        Organism::new(1, 1, 0, traits, Vec2::new(100.0, 100.0), 60.0)
    }

    #[test]
    fn test_size_penalty_floor() {
        let config = Config::default();
        let mut org = test_organism(&config);

        org.traits.set(TraitKind::Speed, 20.0);
        org.traits.set(TraitKind::Size, config.traits.size.max);
        let slowest = org.effective_speed(&config.traits);
        assert!((slowest - 20.0 * 0.3).abs() < 1e-4);

        org.traits.set(TraitKind::Size, config.traits.size.min);
        let fastest = org.effective_speed(&config.traits);
        assert!((fastest - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_effective_sense_range() {
        let config = Config::default();
        let mut org = test_organism(&config);
        org.traits.set(TraitKind::SenseRange, 100.0);

        assert_eq!(org.effective_sense_range(1.0, 1.0), 100.0);
        assert_eq!(org.effective_sense_range(0.5, 0.6), 30.0);
    }

    #[test]
    fn test_end_of_day_metabolism() {
        let config = Config::default();
        let mut org = test_organism(&config);
        org.traits.set(TraitKind::Metabolism, 1.0);
        org.traits.set(TraitKind::EnergyEfficiency, 1.0);
        org.energy = 50.0;

        org.end_of_day_update(&config);

        assert_eq!(org.age, 1);
        assert!((org.energy - (50.0 - config.energy.daily_metabolism)).abs() < 1e-4);
    }

    #[test]
    fn test_efficiency_reduces_cost() {
        let config = Config::default();
        let mut frugal = test_organism(&config);
        let mut wasteful = frugal.clone();

        frugal.traits.set(TraitKind::Metabolism, 1.0);
        frugal.traits.set(TraitKind::EnergyEfficiency, 2.0);
        wasteful.traits.set(TraitKind::Metabolism, 2.0);
        wasteful.traits.set(TraitKind::EnergyEfficiency, 0.5);

        frugal.energy = 50.0;
        wasteful.energy = 50.0;
        frugal.end_of_day_update(&config);
        wasteful.end_of_day_update(&config);

        assert!(frugal.energy > wasteful.energy);
    }

    #[test]
    fn test_max_age() {
        let config = Config::default();
        let mut org = test_organism(&config);
        org.traits.set(TraitKind::MaxAge, 5.0);

        org.age = 4;
        assert!(!org.is_past_max_age());
        org.age = 5;
        assert!(org.is_past_max_age());
    }

    #[test]
    fn test_reset_daily_state() {
        let config = Config::default();
        let mut org = test_organism(&config);
        org.has_food_today = true;
        org.target_food = Some(3);

        org.reset_daily_state();

        assert!(!org.has_food_today);
        assert!(org.target_food.is_none());
    }
}
