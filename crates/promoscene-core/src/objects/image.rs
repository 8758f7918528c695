//! Image object referencing an external source URL.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Load lifecycle of an image source. The fetch and decode run outside the
/// engine; the engine only records the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// An image object. Pixel data lives behind `source_url`; the engine treats
/// the URL as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ObjectId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width before scaling.
    pub width: f64,
    /// Display height before scaling.
    pub height: f64,
    /// Opaque source URL, resolved by the surrounding application.
    pub source_url: String,
    /// Intrinsic pixel size, known only after the load completes.
    #[serde(default)]
    pub natural_size: Option<(u32, u32)>,
    #[serde(default)]
    pub load_state: LoadState,
    #[serde(default = "super::text::default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Image {
    /// Create a new image with an explicit display size. Negative sizes
    /// clamp to zero.
    pub fn new(position: Point, source_url: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            source_url: source_url.into(),
            natural_size: None,
            load_state: LoadState::Pending,
            scale: Vec2::new(1.0, 1.0),
            rotation_degrees: 0.0,
            style: ObjectStyle::default(),
            flags: ObjectFlags::default(),
        }
    }

    /// Shrink the display size to fit within a box while preserving the
    /// aspect ratio implied by the current display size.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        if self.width <= 0.0 || self.height <= 0.0 {
            return self;
        }
        let aspect = self.width / self.height;
        if aspect > max_width / max_height {
            self.width = max_width;
            self.height = max_width / aspect;
        } else {
            self.height = max_height;
            self.width = max_height * aspect;
        }
        self
    }

    /// Record a completed load.
    pub fn mark_loaded(&mut self, natural_width: u32, natural_height: u32) {
        self.natural_size = Some((natural_width, natural_height));
        self.load_state = LoadState::Loaded;
    }

    /// Record a failed load.
    pub fn mark_failed(&mut self) {
        self.load_state = LoadState::Failed;
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_pending() {
        let img = Image::new(Point::ZERO, "products/a.png", 100.0, 100.0);
        assert_eq!(img.load_state, LoadState::Pending);
        assert!(img.natural_size.is_none());
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let img = Image::new(Point::ZERO, "a.png", 1000.0, 500.0).fit_within(400.0, 400.0);
        assert!((img.width - 400.0).abs() < 0.01);
        assert!((img.height - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_mark_loaded_sets_natural_size() {
        let mut img = Image::new(Point::ZERO, "a.png", 100.0, 100.0);
        img.mark_loaded(800, 600);
        assert_eq!(img.load_state, LoadState::Loaded);
        assert_eq!(img.natural_size, Some((800, 600)));
    }
}
