//! Fitness scoring: how well an organism's traits fit the active food
//! pattern, with the top fifth of the population marked elite.

use crate::config::TraitBoundsConfig;
use crate::environment::SpawnPattern;
use crate::genetics::traits::TraitKind;
use crate::organism::{Organism, OrganismId};
use serde::{Deserialize, Serialize};

/// Multiplier for organisms that ate today
const FED_MULTIPLIER: f32 = 1.2;
/// Generation bonus per generation and its cap
const GENERATION_BONUS: f32 = 0.01;
const GENERATION_BONUS_CAP: f32 = 0.2;
/// Fraction of the population marked elite
const ELITE_FRACTION: f32 = 0.2;

/// Per-trait weights for one food pattern
#[derive(Clone, Copy, Debug)]
pub struct WeightProfile {
    weights: [f32; TraitKind::COUNT],
}

impl WeightProfile {
    fn new(entries: &[(TraitKind, f32)]) -> Self {
        let mut weights = [1.0f32; TraitKind::COUNT];
        for &(kind, w) in entries {
            weights[kind.index()] = w;
        }
        Self { weights }
    }

    /// Weights rewarding the traits that matter under each pattern:
    /// clustered food favors finding and reaching the clusters, scattered
    /// food favors covering ground cheaply, ring food concentrates
    /// contests so size and aggression pay.
    pub fn for_pattern(pattern: SpawnPattern) -> WeightProfile {
        match pattern {
            SpawnPattern::Random => WeightProfile::new(&[]),
            SpawnPattern::Clustered => WeightProfile::new(&[
                (TraitKind::SenseRange, 2.0),
                (TraitKind::Speed, 1.5),
            ]),
            SpawnPattern::Scattered => WeightProfile::new(&[
                (TraitKind::Speed, 2.0),
                (TraitKind::EnergyEfficiency, 1.5),
            ]),
            SpawnPattern::Ring => WeightProfile::new(&[
                (TraitKind::Size, 1.5),
                (TraitKind::Aggression, 2.0),
            ]),
        }
    }

    pub fn weight(&self, kind: TraitKind) -> f32 {
        self.weights[kind.index()]
    }
}

/// One organism's score in the daily ranking
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FitnessEntry {
    pub organism_id: OrganismId,
    pub score: f32,
    pub elite: bool,
}

/// Score a single organism against the active pattern's weight profile.
/// Trait values are normalized into their configured ranges so no trait
/// dominates by unit alone.
pub fn fitness_score(
    organism: &Organism,
    profile: &WeightProfile,
    bounds: &TraitBoundsConfig,
) -> f32 {
    let mut score = 0.0f32;
    for kind in TraitKind::ALL {
        let normalized = bounds.range(kind).normalized(organism.traits.get(kind));
        score += normalized * profile.weight(kind);
    }
    score += (organism.generation as f32 * GENERATION_BONUS).min(GENERATION_BONUS_CAP);
    if organism.has_food_today {
        score *= FED_MULTIPLIER;
    }
    score
}

/// Rank the population by fitness, best first, and mark the top fifth
/// (at least one organism) elite.
pub fn rank<'a>(
    organisms: impl Iterator<Item = &'a Organism>,
    pattern: SpawnPattern,
    bounds: &TraitBoundsConfig,
) -> Vec<FitnessEntry> {
    let profile = WeightProfile::for_pattern(pattern);
    let mut entries: Vec<FitnessEntry> = organisms
        .map(|o| FitnessEntry {
            organism_id: o.id,
            score: fitness_score(o, &profile, bounds),
            elite: false,
        })
        .collect();

    entries.sort_by(|a, b| b.score.total_cmp(&a.score));

    if !entries.is_empty() {
        let elite_count = ((entries.len() as f32 * ELITE_FRACTION).floor() as usize).max(1);
        for entry in entries.iter_mut().take(elite_count) {
            entry.elite = true;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::genetics::traits::TraitVector;
    use crate::geometry::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn organism(id: OrganismId, config: &Config, rng: &mut ChaCha8Rng) -> Organism {
        let traits = TraitVector::random(&config.traits, rng);
        Organism::new(id, id, 0, traits, Vec2::ZERO, 60.0)
    }

    #[test]
    fn test_fed_bonus() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut org = organism(1, &config, &mut rng);
        let profile = WeightProfile::for_pattern(SpawnPattern::Random);

        let hungry = fitness_score(&org, &profile, &config.traits);
        org.has_food_today = true;
        let fed = fitness_score(&org, &profile, &config.traits);

        assert!((fed - hungry * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_generation_bonus_capped() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut org = organism(1, &config, &mut rng);
        let profile = WeightProfile::for_pattern(SpawnPattern::Random);

        org.generation = 0;
        let gen0 = fitness_score(&org, &profile, &config.traits);
        org.generation = 10;
        let gen10 = fitness_score(&org, &profile, &config.traits);
        org.generation = 1000;
        let gen1000 = fitness_score(&org, &profile, &config.traits);

        assert!((gen10 - gen0 - 0.1).abs() < 1e-4);
        assert!((gen1000 - gen0 - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_pattern_profiles_reward_matching_traits() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut scout = organism(1, &config, &mut rng);
        let mut brute = organism(2, &config, &mut rng);
        for kind in TraitKind::ALL {
            let range = config.traits.range(kind);
            let mid = (range.min + range.max) / 2.0;
            scout.traits.set(kind, mid);
            brute.traits.set(kind, mid);
        }
        scout
            .traits
            .set(TraitKind::SenseRange, config.traits.sense_range.max);
        brute
            .traits
            .set(TraitKind::Aggression, config.traits.aggression.max);

        let clustered = WeightProfile::for_pattern(SpawnPattern::Clustered);
        let ring = WeightProfile::for_pattern(SpawnPattern::Ring);

        assert!(
            fitness_score(&scout, &clustered, &config.traits)
                > fitness_score(&brute, &clustered, &config.traits)
        );
        assert!(
            fitness_score(&brute, &ring, &config.traits)
                > fitness_score(&scout, &ring, &config.traits)
        );
    }

    #[test]
    fn test_ranking_order_and_elites() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let organisms: Vec<Organism> = (0..10).map(|i| organism(i, &config, &mut rng)).collect();

        let ranking = rank(organisms.iter(), SpawnPattern::Random, &config.traits);

        assert_eq!(ranking.len(), 10);
        for pair in ranking.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranking.iter().filter(|e| e.elite).count(), 2);
        assert!(ranking[0].elite && ranking[1].elite);
        assert!(!ranking[2].elite);
    }

    #[test]
    fn test_single_organism_is_elite() {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let only = organism(1, &config, &mut rng);

        let ranking = rank(std::iter::once(&only), SpawnPattern::Random, &config.traits);
        assert_eq!(ranking.len(), 1);
        assert!(ranking[0].elite);
    }
}
