//! Rectangle object.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle, the workhorse of header bands and
/// placeholder cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ObjectId,
    /// Top-left corner position.
    pub position: Point,
    /// Width before scaling.
    pub width: f64,
    /// Height before scaling.
    pub height: f64,
    #[serde(default = "super::text::default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Rectangle {
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const DEFAULT_HEIGHT: f64 = 100.0;

    /// Create a new rectangle. Negative sizes clamp to zero — authoring
    /// input is forgiven, not rejected.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            scale: Vec2::new(1.0, 1.0),
            rotation_degrees: 0.0,
            style: ObjectStyle::default(),
            flags: ObjectFlags::default(),
        }
    }

    /// Create a rectangle with the default authoring size (200x100).
    pub fn with_defaults(position: Point) -> Self {
        Self::new(position, Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }

    /// Set the fill color, builder-style.
    pub fn with_fill(mut self, fill: super::SerializableColor) -> Self {
        self.style.fill = Some(fill);
        self
    }

    /// Bounding box with scale applied (flips do not change extent).
    pub fn bounds(&self) -> Rect {
        let w = self.width * self.scale.x.abs();
        let h = self.height * self.scale.y.abs();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + w,
            self.position.y + h,
        )
    }
}
