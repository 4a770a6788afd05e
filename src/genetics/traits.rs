//! Heritable trait model: trait kinds, bounds, and the trait vector.

use crate::config::TraitBoundsConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The closed set of heritable traits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TraitKind {
    Speed,
    SenseRange,
    Size,
    Fertility,
    EnergyEfficiency,
    MaxAge,
    Aggression,
    Defense,
    Metabolism,
    HeatTolerance,
    ColdTolerance,
}

impl TraitKind {
    /// Number of heritable traits
    pub const COUNT: usize = 11;

    /// All traits in canonical order
    pub const ALL: [TraitKind; TraitKind::COUNT] = [
        TraitKind::Speed,
        TraitKind::SenseRange,
        TraitKind::Size,
        TraitKind::Fertility,
        TraitKind::EnergyEfficiency,
        TraitKind::MaxAge,
        TraitKind::Aggression,
        TraitKind::Defense,
        TraitKind::Metabolism,
        TraitKind::HeatTolerance,
        TraitKind::ColdTolerance,
    ];

    /// Position in the canonical order
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Speed => "speed",
            TraitKind::SenseRange => "sense_range",
            TraitKind::Size => "size",
            TraitKind::Fertility => "fertility",
            TraitKind::EnergyEfficiency => "energy_efficiency",
            TraitKind::MaxAge => "max_age",
            TraitKind::Aggression => "aggression",
            TraitKind::Defense => "defense",
            TraitKind::Metabolism => "metabolism",
            TraitKind::HeatTolerance => "heat_tolerance",
            TraitKind::ColdTolerance => "cold_tolerance",
        }
    }
}

/// Configured bounds and mutation step for a single trait
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitRange {
    pub min: f32,
    pub max: f32,
    /// Maximum absolute change per reproduction event
    pub mutation_range: f32,
}

impl TraitRange {
    pub fn new(min: f32, max: f32, mutation_range: f32) -> Self {
        Self {
            min,
            max,
            mutation_range,
        }
    }

    /// Lower/upper bounds with min≤max guaranteed (misconfigured ranges are
    /// swapped at the point of use rather than rejected)
    #[inline]
    pub fn ordered(&self) -> (f32, f32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }

    /// Clamp a value into the configured bounds
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let (lo, hi) = self.ordered();
        value.clamp(lo, hi)
    }

    /// Width of the range
    #[inline]
    pub fn width(&self) -> f32 {
        let (lo, hi) = self.ordered();
        hi - lo
    }

    /// Normalized position of a value within the range, in [0, 1].
    /// Zero-width ranges yield 0 rather than NaN.
    #[inline]
    pub fn normalized(&self, value: f32) -> f32 {
        let (lo, _) = self.ordered();
        let width = self.width();
        if width <= f32::EPSILON {
            0.0
        } else {
            ((value - lo) / width).clamp(0.0, 1.0)
        }
    }
}

/// An organism's heritable trait values, indexed by [`TraitKind`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitVector {
    values: [f32; TraitKind::COUNT],
}

impl TraitVector {
    pub fn from_values(values: [f32; TraitKind::COUNT]) -> Self {
        Self { values }
    }

    /// Sample a uniformly random vector within the configured bounds
    pub fn random(bounds: &TraitBoundsConfig, rng: &mut impl Rng) -> Self {
        let mut values = [0.0f32; TraitKind::COUNT];
        for kind in TraitKind::ALL {
            let (lo, hi) = bounds.range(kind).ordered();
            values[kind.index()] = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
        }
        Self { values }
    }

    #[inline]
    pub fn get(&self, kind: TraitKind) -> f32 {
        self.values[kind.index()]
    }

    #[inline]
    pub fn set(&mut self, kind: TraitKind, value: f32) {
        self.values[kind.index()] = value;
    }

    /// All values clamped into their configured bounds
    pub fn clamped(&self, bounds: &TraitBoundsConfig) -> TraitVector {
        let mut values = self.values;
        for kind in TraitKind::ALL {
            values[kind.index()] = bounds.range(kind).clamp(values[kind.index()]);
        }
        Self { values }
    }

    /// Inherit with each trait independently perturbed by a uniform mutation
    /// in ±mutation_range, then reclamped to its bounds
    pub fn mutated(&self, bounds: &TraitBoundsConfig, rng: &mut impl Rng) -> TraitVector {
        let mut values = self.values;
        for kind in TraitKind::ALL {
            let range = bounds.range(kind);
            let step = range.mutation_range.abs();
            let delta = if step > 0.0 {
                rng.gen_range(-step..=step)
            } else {
                0.0
            };
            values[kind.index()] = range.clamp(values[kind.index()] + delta);
        }
        Self { values }
    }

    /// Genetic distance to another vector: normalized Euclidean norm,
    /// `sqrt(mean((|Δt| / range_t)²))` across all traits. Bounded to [0, 1]
    /// for in-bounds values and monotonic in every per-trait deviation.
    /// Zero-width trait ranges contribute 0.
    pub fn genetic_distance(&self, other: &TraitVector, bounds: &TraitBoundsConfig) -> f32 {
        let mut sum = 0.0f32;
        for kind in TraitKind::ALL {
            let width = bounds.range(kind).width();
            if width <= f32::EPSILON {
                continue;
            }
            let delta = (self.get(kind) - other.get(kind)) / width;
            sum += delta * delta;
        }
        (sum / TraitKind::COUNT as f32).sqrt()
    }
}
