//! Circle object.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle, positioned by its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ObjectId,
    /// Center position.
    pub position: Point,
    /// Radius before scaling.
    pub radius: f64,
    #[serde(default = "super::text::default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Circle {
    pub const DEFAULT_RADIUS: f64 = 50.0;

    /// Create a new circle. A negative radius clamps to zero.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: center,
            radius: radius.max(0.0),
            scale: Vec2::new(1.0, 1.0),
            rotation_degrees: 0.0,
            style: ObjectStyle::default(),
            flags: ObjectFlags::default(),
        }
    }

    pub fn with_defaults(center: Point) -> Self {
        Self::new(center, Self::DEFAULT_RADIUS)
    }

    /// Bounding box with (possibly non-uniform) scale applied.
    pub fn bounds(&self) -> Rect {
        let rx = self.radius * self.scale.x.abs();
        let ry = self.radius * self.scale.y.abs();
        Rect::new(
            self.position.x - rx,
            self.position.y - ry,
            self.position.x + rx,
            self.position.y + ry,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_radius_clamps() {
        let c = Circle::new(Point::ZERO, -10.0);
        assert!((c.radius - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_centered() {
        let c = Circle::new(Point::new(100.0, 100.0), 25.0);
        let bounds = c.bounds();
        assert!((bounds.x0 - 75.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 125.0).abs() < f64::EPSILON);
    }
}
