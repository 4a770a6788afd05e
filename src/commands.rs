//! External commands applied between simulation steps.

use crate::environment::{ObstacleId, ObstacleKind};
use crate::geometry::Shape;
use serde::{Deserialize, Serialize};

/// Time scale bounds accepted from the outside
pub const MIN_TIME_SCALE: f32 = 0.1;
pub const MAX_TIME_SCALE: f32 = 100.0;

/// Commands the embedding application can send to a running world.
/// They are queued and applied at the next step boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SimCommand {
    AddObstacle { shape: Shape, kind: ObstacleKind },
    RemoveObstacle(ObstacleId),
    ClearObstacles,
    SetTimeScale(f32),
}

/// Clamp a requested time scale into the accepted band
#[inline]
pub fn clamp_time_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
    } else {
        1.0
    }
}
