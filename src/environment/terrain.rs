//! Terrain patches with per-kind movement multipliers.

use crate::config::TerrainConfig;
use crate::geometry::{Rect, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Terrain varieties and their movement effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Sand,
    Marsh,
    Mud,
    Ice,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 5] = [
        TerrainKind::Grass,
        TerrainKind::Sand,
        TerrainKind::Marsh,
        TerrainKind::Mud,
        TerrainKind::Ice,
    ];

    /// Speed multiplier applied to organisms inside the patch
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            TerrainKind::Grass => 1.0,
            TerrainKind::Sand => 0.8,
            TerrainKind::Marsh => 0.6,
            TerrainKind::Mud => 0.5,
            TerrainKind::Ice => 1.15,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainKind::Grass => "grass",
            TerrainKind::Sand => "sand",
            TerrainKind::Marsh => "marsh",
            TerrainKind::Mud => "mud",
            TerrainKind::Ice => "ice",
        }
    }

    fn random(rng: &mut impl Rng) -> TerrainKind {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// A rectangular area of non-default terrain
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub area: Rect,
    pub kind: TerrainKind,
}

/// All terrain patches; ground outside any patch behaves like grass
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TerrainMap {
    pub patches: Vec<TerrainPatch>,
}

impl TerrainMap {
    /// Generate random patches per the configuration
    pub fn generate(config: &TerrainConfig, bounds: Vec2, rng: &mut impl Rng) -> Self {
        fn side(config: &TerrainConfig, rng: &mut impl Rng) -> f32 {
            if config.patch_size_max > config.patch_size_min {
                rng.gen_range(config.patch_size_min..=config.patch_size_max)
            } else {
                config.patch_size_min
            }
        }

        let patches = (0..config.patch_count)
            .map(|_| {
                let width = side(config, rng);
                let height = side(config, rng);
                let x = rng.gen_range(0.0..(bounds.x - width).max(1.0));
                let y = rng.gen_range(0.0..(bounds.y - height).max(1.0));
                TerrainPatch {
                    area: Rect::new(x, y, width, height),
                    kind: TerrainKind::random(rng),
                }
            })
            .collect();
        Self { patches }
    }

    /// Movement multiplier at a position; the first containing patch wins
    pub fn multiplier_at(&self, position: Vec2) -> f32 {
        self.patches
            .iter()
            .find(|p| p.area.contains(position))
            .map(|p| p.kind.speed_multiplier())
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_terrain_is_neutral() {
        let map = TerrainMap::default();
        assert_eq!(map.multiplier_at(Vec2::new(10.0, 10.0)), 1.0);
    }

    #[test]
    fn test_patch_multiplier() {
        let map = TerrainMap {
            patches: vec![TerrainPatch {
                area: Rect::new(0.0, 0.0, 100.0, 100.0),
                kind: TerrainKind::Mud,
            }],
        };
        assert_eq!(map.multiplier_at(Vec2::new(50.0, 50.0)), 0.5);
        assert_eq!(map.multiplier_at(Vec2::new(150.0, 50.0)), 1.0);
    }

    #[test]
    fn test_generation_within_bounds() {
        let config = TerrainConfig::default();
        let bounds = Vec2::new(800.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let map = TerrainMap::generate(&config, bounds, &mut rng);
        assert_eq!(map.patches.len(), config.patch_count);
        for patch in &map.patches {
            assert!(patch.area.x >= 0.0);
            assert!(patch.area.y >= 0.0);
            assert!(patch.area.width >= config.patch_size_min);
            assert!(patch.area.width <= config.patch_size_max);
        }
    }

    #[test]
    fn test_ice_speeds_up() {
        assert!(TerrainKind::Ice.speed_multiplier() > 1.0);
        assert!(TerrainKind::Mud.speed_multiplier() < 1.0);
    }
}
