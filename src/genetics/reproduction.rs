//! Asexual reproduction with per-trait mutation.
//!
//! Every fed organism gets one reproduction roll at the day boundary. The
//! offspring inherits the parent's traits with independent mutations and
//! spawns a short distance away.

use crate::config::Config;
use crate::geometry::Vec2;
use crate::organism::{Organism, OrganismId};
use rand::Rng;

/// Floor on the reproduction probability so low fertility never fully
/// sterilizes a line
pub const MIN_PROBABILITY: f32 = 0.1;
/// Ceiling so reproduction is never certain
pub const MAX_PROBABILITY: f32 = 0.95;

/// Probability that a fed organism reproduces tonight
#[inline]
pub fn reproduction_probability(fertility: f32, config: &Config) -> f32 {
    (config.reproduction.base_probability * fertility).clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Build an offspring from a parent: mutated traits, next generation,
/// spawned at a random angle around the parent and clamped into the world.
/// The species id starts as the parent's; the speciation check may replace
/// it with the offspring's own id.
pub fn spawn_offspring(
    parent: &Organism,
    id: OrganismId,
    config: &Config,
    rng: &mut impl Rng,
) -> Organism {
    let traits = parent.traits.mutated(&config.traits, rng);

    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let offset = Vec2::new(angle.cos(), angle.sin()) * config.reproduction.spawn_distance;
    let bounds = Vec2::new(config.world.width, config.world.height);
    let position = (parent.position + offset).clamped(bounds);

    Organism::new(
        id,
        parent.species_id,
        parent.generation + 1,
        traits,
        position,
        config.reproduction.offspring_energy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::traits::{TraitKind, TraitVector};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn parent(config: &Config) -> Organism {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let traits = TraitVector::random(&config.traits, &mut rng);
        Organism::new(7, 7, 3, traits, Vec2::new(400.0, 300.0), 80.0)
    }

    #[test]
    fn test_probability_clamped() {
        let config = Config::default();
        // base 0.45: fertility 0.1 would be 0.045, floored at 0.1
        assert_eq!(reproduction_probability(0.1, &config), MIN_PROBABILITY);
        // fertility 4.0 would be 1.8, capped at 0.95
        assert_eq!(reproduction_probability(4.0, &config), MAX_PROBABILITY);
        // in between is linear
        assert!((reproduction_probability(1.0, &config) - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_empirical_frequency_matches_probability() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let p = reproduction_probability(1.0, &config);

        let trials = 2000;
        let hits = (0..trials)
            .filter(|_| rng.gen::<f32>() < p)
            .count();

        let frequency = hits as f32 / trials as f32;
        assert!(
            (frequency - p).abs() < 0.04,
            "frequency {} too far from probability {}",
            frequency,
            p
        );
    }

    #[test]
    fn test_offspring_inherits_with_mutation() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let parent = parent(&config);

        let child = spawn_offspring(&parent, 99, &config, &mut rng);

        assert_eq!(child.id, 99);
        assert_eq!(child.species_id, parent.species_id);
        assert_eq!(child.generation, parent.generation + 1);
        assert_eq!(child.age, 0);
        assert_eq!(child.energy, config.reproduction.offspring_energy);
        for kind in TraitKind::ALL {
            let delta = (child.traits.get(kind) - parent.traits.get(kind)).abs();
            assert!(delta <= config.traits.range(kind).mutation_range + 1e-5);
        }
    }

    #[test]
    fn test_offspring_spawn_distance() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let parent = parent(&config);

        for _ in 0..50 {
            let child = spawn_offspring(&parent, 1, &config, &mut rng);
            let d = child.position.distance(parent.position);
            // Clamping at the world edge can only shorten the offset
            assert!(d <= config.reproduction.spawn_distance + 1e-4);
            assert!(child.position.x >= 0.0 && child.position.x <= config.world.width);
            assert!(child.position.y >= 0.0 && child.position.y <= config.world.height);
        }
    }

    #[test]
    fn test_offspring_clamped_at_edge() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut parent = parent(&config);
        parent.position = Vec2::ZERO;

        for _ in 0..50 {
            let child = spawn_offspring(&parent, 1, &config, &mut rng);
            assert!(child.position.x >= 0.0 && child.position.y >= 0.0);
        }
    }
}
