//! Daily food spawning with pattern-driven placement.
//!
//! Food is destroyed and recreated at every day boundary: the new day's
//! items come from the active spawn pattern plus the corpse positions of
//! organisms that died the prior day.

use crate::config::FoodConfig;
use crate::geometry::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier of a food item within the current day. Ids restart at 0 each
/// day and equal the item's index in the day's food list; per-day transient
/// targets are cleared before respawn, so stale ids never survive a day.
pub type FoodId = u32;

/// Margin kept between spawned food and the world edge
const EDGE_MARGIN: f32 = 10.0;

/// A food item for the current day
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub position: Vec2,
    pub claimed: bool,
}

/// Food placement patterns, rotated every few days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnPattern {
    Random,
    Clustered,
    Scattered,
    Ring,
}

impl SpawnPattern {
    pub const ALL: [SpawnPattern; 4] = [
        SpawnPattern::Random,
        SpawnPattern::Clustered,
        SpawnPattern::Scattered,
        SpawnPattern::Ring,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpawnPattern::Random => "random",
            SpawnPattern::Clustered => "clustered",
            SpawnPattern::Scattered => "scattered",
            SpawnPattern::Ring => "ring",
        }
    }

    pub fn next(&self) -> SpawnPattern {
        match self {
            SpawnPattern::Random => SpawnPattern::Clustered,
            SpawnPattern::Clustered => SpawnPattern::Scattered,
            SpawnPattern::Scattered => SpawnPattern::Ring,
            SpawnPattern::Ring => SpawnPattern::Random,
        }
    }
}

/// Generates each day's food set from the active pattern
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodSpawner {
    active_pattern: SpawnPattern,
}

impl FoodSpawner {
    pub fn new() -> Self {
        Self {
            active_pattern: SpawnPattern::Random,
        }
    }

    pub fn active_pattern(&self) -> SpawnPattern {
        self.active_pattern
    }

    /// Advance to the next pattern in the rotation
    pub fn rotate(&mut self) {
        self.active_pattern = self.active_pattern.next();
    }

    /// Spawn the day's food: pattern-driven items for the live population
    /// plus one item at every corpse position from the prior day.
    pub fn spawn_day(
        &self,
        alive_count: usize,
        corpses: &[Vec2],
        bounds: Vec2,
        config: &FoodConfig,
        rng: &mut impl Rng,
    ) -> Vec<Food> {
        let count = ((alive_count as f32 * config.per_organism).round() as usize)
            .max(config.min_count);

        let mut positions = Vec::with_capacity(count + corpses.len());
        match self.active_pattern {
            SpawnPattern::Random => self.spawn_random(count, bounds, &mut positions, rng),
            SpawnPattern::Clustered => {
                self.spawn_clustered(count, bounds, config, &mut positions, rng)
            }
            SpawnPattern::Scattered => self.spawn_scattered(count, bounds, &mut positions, rng),
            SpawnPattern::Ring => self.spawn_ring(count, bounds, config, &mut positions, rng),
        }
        positions.extend(corpses.iter().map(|&p| p.clamped(bounds)));

        positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Food {
                id: i as FoodId,
                position,
                claimed: false,
            })
            .collect()
    }

    fn spawn_random(
        &self,
        count: usize,
        bounds: Vec2,
        out: &mut Vec<Vec2>,
        rng: &mut impl Rng,
    ) {
        for _ in 0..count {
            out.push(Vec2::new(
                rng.gen_range(EDGE_MARGIN..bounds.x - EDGE_MARGIN),
                rng.gen_range(EDGE_MARGIN..bounds.y - EDGE_MARGIN),
            ));
        }
    }

    fn spawn_clustered(
        &self,
        count: usize,
        bounds: Vec2,
        config: &FoodConfig,
        out: &mut Vec<Vec2>,
        rng: &mut impl Rng,
    ) {
        let cluster_count = config.cluster_count.max(1);
        let centers: Vec<Vec2> = (0..cluster_count)
            .map(|_| {
                Vec2::new(
                    rng.gen_range(config.cluster_radius..(bounds.x - config.cluster_radius).max(config.cluster_radius + 1.0)),
                    rng.gen_range(config.cluster_radius..(bounds.y - config.cluster_radius).max(config.cluster_radius + 1.0)),
                )
            })
            .collect();

        for i in 0..count {
            let center = centers[i % cluster_count];
            // sqrt keeps the disc fill uniform
            let r = config.cluster_radius * rng.gen::<f32>().sqrt();
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let p = Vec2::new(center.x + r * theta.cos(), center.y + r * theta.sin());
            out.push(p.clamped(bounds));
        }
    }

    fn spawn_scattered(
        &self,
        count: usize,
        bounds: Vec2,
        out: &mut Vec<Vec2>,
        rng: &mut impl Rng,
    ) {
        // Even grid coverage with per-cell jitter
        let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
        let rows = count.div_ceil(cols);
        let cell_w = bounds.x / cols as f32;
        let cell_h = bounds.y / rows as f32;

        for i in 0..count {
            let col = i % cols;
            let row = i / cols;
            let p = Vec2::new(
                col as f32 * cell_w + rng.gen_range(0.0..cell_w),
                row as f32 * cell_h + rng.gen_range(0.0..cell_h),
            );
            out.push(p.clamped(bounds));
        }
    }

    fn spawn_ring(
        &self,
        count: usize,
        bounds: Vec2,
        config: &FoodConfig,
        out: &mut Vec<Vec2>,
        rng: &mut impl Rng,
    ) {
        let center = Vec2::new(bounds.x / 2.0, bounds.y / 2.0);
        let radius = bounds.x.min(bounds.y) * config.ring_radius_fraction;

        for i in 0..count {
            let theta = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
            let jitter = rng.gen_range(-radius * 0.1..=radius * 0.1);
            let r = radius + jitter;
            let p = Vec2::new(center.x + r * theta.cos(), center.y + r * theta.sin());
            out.push(p.clamped(bounds));
        }
    }
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self::new()
    }
}
