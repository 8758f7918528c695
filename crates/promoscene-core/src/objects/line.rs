//! Line object.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment. The anchor position is the start point; the
/// end point is stored in world coordinates and translates with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ObjectId,
    /// Start point (the anchor position).
    pub position: Point,
    /// End point.
    pub end: Point,
    #[serde(default = "super::text::default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: start,
            end,
            scale: Vec2::new(1.0, 1.0),
            rotation_degrees: 0.0,
            style: ObjectStyle::default(),
            flags: ObjectFlags::default(),
        }
    }

    /// A horizontal separator of the given width, as used between catalog
    /// rows.
    pub fn horizontal(start: Point, width: f64) -> Self {
        Self::new(start, Point::new(start.x + width, start.y))
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x.min(self.end.x),
            self.position.y.min(self.end.y),
            self.position.x.max(self.end.x),
            self.position.y.max(self.end.y),
        )
    }
}
