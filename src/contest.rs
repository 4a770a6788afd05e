//! Resource contention: when several unfed organisms reach the same food
//! item, a weighted contest decides who eats.

use crate::config::ContestConfig;
use crate::genetics::traits::{TraitKind, TraitVector};
use crate::organism::{Organism, OrganismKey};
use rand::Rng;
use slotmap::SlotMap;

/// Contest score for one contestant: aggression and size help, defense
/// investment costs, plus a uniform random component.
pub fn contest_score(traits: &TraitVector, config: &ContestConfig, rng: &mut impl Rng) -> f32 {
    let aggression = traits.get(TraitKind::Aggression) * config.aggression_weight;
    let random = if config.random_range > 0.0 {
        rng.gen_range(0.0..config.random_range)
    } else {
        0.0
    };
    let size_bonus = traits.get(TraitKind::Size) * config.size_bonus_weight;
    let defense_penalty = traits.get(TraitKind::Defense) * config.defense_penalty_weight;
    aggression + random + size_bonus - defense_penalty
}

/// Pick the winner among the contestants. A lone contestant wins outright;
/// otherwise the highest score wins, with ties going to the earliest
/// contestant in the list.
pub fn resolve(
    contestants: &[OrganismKey],
    organisms: &SlotMap<OrganismKey, Organism>,
    config: &ContestConfig,
    rng: &mut impl Rng,
) -> Option<OrganismKey> {
    match contestants {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut winner = None;
            let mut best = f32::NEG_INFINITY;
            for &key in contestants {
                let Some(organism) = organisms.get(key) else {
                    continue;
                };
                let score = contest_score(&organism.traits, config, rng);
                if score > best {
                    best = score;
                    winner = Some(key);
                }
            }
            winner
        }
    }
}
