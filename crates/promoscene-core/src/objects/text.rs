//! Text object.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) fn default_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

/// Font family options. A closed set so documents stay portable across
/// installations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

impl FontFamily {
    /// Generic family name as used by the SVG renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Monospace => "monospace",
        }
    }
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn css_weight(&self) -> u32 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ObjectId,
    /// Top-left corner of the text block.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in points.
    pub font_size_pt: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Wrapping width. None = single line, no wrapping.
    #[serde(default)]
    pub bounding_width: Option<f64>,
    #[serde(default = "default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Text {
    pub const DEFAULT_FONT_SIZE_PT: f64 = 24.0;

    /// Average character width as a fraction of font size, for approximate
    /// bounds before any real text layout has run.
    const CHAR_WIDTH_FACTOR: f64 = 0.55;

    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_size_pt: Self::DEFAULT_FONT_SIZE_PT,
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
            bounding_width: None,
            scale: default_scale(),
            rotation_degrees: 0.0,
            style: ObjectStyle {
                fill: Some(super::SerializableColor::black()),
                ..ObjectStyle::default()
            },
            flags: ObjectFlags::default(),
        }
    }

    pub fn with_font_size(mut self, size_pt: f64) -> Self {
        self.font_size_pt = size_pt.max(0.0);
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_fill(mut self, fill: super::SerializableColor) -> Self {
        self.style.fill = Some(fill);
        self
    }

    pub fn with_bounding_width(mut self, width: f64) -> Self {
        self.bounding_width = Some(width.max(0.0));
        self
    }

    /// Approximate single-line width from character count; the widest line
    /// wins for multi-line content.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let natural = max_line_len as f64 * self.font_size_pt * Self::CHAR_WIDTH_FACTOR;
        match self.bounding_width {
            Some(w) => natural.min(w),
            None => natural,
        }
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        line_count as f64 * self.font_size_pt * 1.2
    }

    /// Approximate bounding box with scale applied.
    pub fn bounds(&self) -> Rect {
        let w = self.approximate_width().max(1.0) * self.scale.x.abs();
        let h = self.approximate_height() * self.scale.y.abs();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + w,
            self.position.y + h,
        )
    }
}
