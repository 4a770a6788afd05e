//! Ambient temperature model: base climate, seasonal drift, weather offset,
//! and localized temperature zones with linear falloff.

use crate::config::TemperatureConfig;
use crate::geometry::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A circular zone that shifts the local temperature
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TemperatureZone {
    pub center: Vec2,
    pub radius: f32,
    /// Temperature offset at the zone center (positive = hot, negative = cold)
    pub offset: f32,
    /// Scales the offset, 0..1
    pub intensity: f32,
}

impl TemperatureZone {
    /// Offset contributed at a point: full at the center, linearly decaying
    /// to zero at the edge, scaled by intensity.
    pub fn contribution(&self, position: Vec2) -> f32 {
        if self.radius <= f32::EPSILON {
            return 0.0;
        }
        let distance = self.center.distance(position);
        if distance >= self.radius {
            return 0.0;
        }
        self.offset * (1.0 - distance / self.radius) * self.intensity
    }
}

/// All temperature zones in the world
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemperatureField {
    pub zones: Vec<TemperatureZone>,
}

impl TemperatureField {
    /// Generate random zones per the configuration
    pub fn generate(config: &TemperatureConfig, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let zones = (0..config.zone_count)
            .map(|_| {
                let radius = if config.zone_radius_max > config.zone_radius_min {
                    rng.gen_range(config.zone_radius_min..=config.zone_radius_max)
                } else {
                    config.zone_radius_min
                };
                let magnitude = rng.gen_range(0.0..=config.zone_offset_max);
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                TemperatureZone {
                    center: Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y)),
                    radius,
                    offset: magnitude * sign,
                    intensity: rng.gen_range(0.5..=1.0),
                }
            })
            .collect();
        Self { zones }
    }

    /// Sum of all zone contributions at a point
    pub fn zone_offset(&self, position: Vec2) -> f32 {
        self.zones.iter().map(|z| z.contribution(position)).sum()
    }
}

/// Deviation from the comfort baseline after the organism's tolerance is
/// applied: heat tolerance absorbs warm deviation, cold tolerance absorbs
/// cold deviation. Zero when the tolerance covers the whole deviation.
pub fn effective_deviation(
    ambient: f32,
    comfort: f32,
    heat_tolerance: f32,
    cold_tolerance: f32,
) -> f32 {
    let deviation = ambient - comfort;
    if deviation >= 0.0 {
        (deviation - heat_tolerance).max(0.0)
    } else {
        (-deviation - cold_tolerance).max(0.0)
    }
}
