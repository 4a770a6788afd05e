//! 2D geometry primitives for the continuous world space.

use serde::{Deserialize, Serialize};

/// A 2D point or vector in world coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero if degenerate
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len > f32::EPSILON {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Clamp both components into `[0, bounds]`
    pub fn clamped(&self, bounds: Vec2) -> Vec2 {
        Vec2::new(self.x.clamp(0.0, bounds.x), self.y.clamp(0.0, bounds.y))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle (origin at top-left corner)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// True when a circle at `p` with `radius` overlaps this rectangle
    pub fn intersects_circle(&self, p: Vec2, radius: f32) -> bool {
        let nearest_x = p.x.clamp(self.x, self.x + self.width);
        let nearest_y = p.y.clamp(self.y, self.y + self.height);
        p.distance(Vec2::new(nearest_x, nearest_y)) <= radius
    }
}

/// Obstacle geometry variants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    /// True when a circle at `p` with `radius` overlaps this shape
    pub fn intersects_circle(&self, p: Vec2, radius: f32) -> bool {
        match self {
            Shape::Rect(rect) => rect.intersects_circle(p, radius),
            Shape::Circle { center, radius: r } => p.distance(*center) <= r + radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_degenerate() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_clamped() {
        let p = Vec2::new(-5.0, 700.0);
        let clamped = p.clamped(Vec2::new(800.0, 600.0));
        assert_eq!(clamped, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_rect_circle_intersection() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.intersects_circle(Vec2::new(5.0, 20.0), 6.0));
        assert!(!rect.intersects_circle(Vec2::new(5.0, 20.0), 4.0));
        assert!(rect.intersects_circle(Vec2::new(15.0, 15.0), 1.0)); // inside
    }

    #[test]
    fn test_shape_circle() {
        let shape = Shape::Circle {
            center: Vec2::new(50.0, 50.0),
            radius: 10.0,
        };
        assert!(shape.intersects_circle(Vec2::new(62.0, 50.0), 3.0));
        assert!(!shape.intersects_circle(Vec2::new(70.0, 50.0), 3.0));
    }
}
