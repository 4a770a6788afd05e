//! Obstacle field: walls and rocks block movement, hazards kill on contact.
//!
//! Obstacles are long-lived and only change through external placement
//! commands applied between simulation steps.

use crate::geometry::{Shape, Vec2};
use serde::{Deserialize, Serialize};

/// Unique obstacle identifier
pub type ObstacleId = u64;

/// Obstacle behavior kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Rock,
    Hazard,
}

impl ObstacleKind {
    /// Walls and rocks block movement; hazards are passable but lethal
    #[inline]
    pub fn blocks_movement(&self) -> bool {
        matches!(self, ObstacleKind::Wall | ObstacleKind::Rock)
    }

    #[inline]
    pub fn is_lethal(&self) -> bool {
        matches!(self, ObstacleKind::Hazard)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Wall => "wall",
            ObstacleKind::Rock => "rock",
            ObstacleKind::Hazard => "hazard",
        }
    }
}

/// A placed obstacle
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub shape: Shape,
    pub kind: ObstacleKind,
}

/// All obstacles currently in the world
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: ObstacleId,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an obstacle and return its id
    pub fn add(&mut self, shape: Shape, kind: ObstacleKind) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle { id, shape, kind });
        id
    }

    /// Remove an obstacle; returns false if the id is unknown
    pub fn remove(&mut self, id: ObstacleId) -> bool {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.id != id);
        self.obstacles.len() != before
    }

    pub fn clear_all(&mut self) {
        self.obstacles.clear();
    }

    pub fn count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Kind of the obstacle a body at `position` with `radius` touches.
    /// Lethal hazards take priority over blockers when both overlap.
    pub fn collision(&self, position: Vec2, radius: f32) -> Option<ObstacleKind> {
        let mut blocked = None;
        for obstacle in &self.obstacles {
            if obstacle.shape.intersects_circle(position, radius) {
                if obstacle.kind.is_lethal() {
                    return Some(obstacle.kind);
                }
                blocked = Some(obstacle.kind);
            }
        }
        blocked
    }
}
