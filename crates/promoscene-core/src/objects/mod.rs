//! Vector object definitions for the composition engine.

mod circle;
mod group;
mod image;
mod line;
mod rectangle;
mod text;

pub use circle::Circle;
pub use group::Group;
pub use image::{Image, LoadState};
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::{FontFamily, FontWeight, Text, TextAlign};

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for vector objects.
pub type ObjectId = Uuid;

/// Default offset applied when duplicating an object, so the copy is
/// visibly distinct from the original.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Neutral gray used for placeholder cells.
    pub fn placeholder_gray() -> Self {
        Self::new(224, 224, 224, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// CSS-style rgba() string for the SVG intermediate.
    pub fn to_rgba_string(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every object variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color.
    pub stroke: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: SerializableColor::black(),
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// Editing flags shared by every object variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    /// Locked objects ignore transform operations.
    #[serde(default)]
    pub locked: bool,
    /// Invisible objects are skipped when rendering.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Unselectable objects never enter the selection set.
    #[serde(default = "default_true")]
    pub selectable: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            locked: false,
            visible: true,
            selectable: true,
        }
    }
}

/// Enum wrapper for all object variants (closed set, serialized with a
/// `type` tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VectorObject {
    Text(Text),
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Image(Image),
    Group(Group),
}

impl VectorObject {
    pub fn id(&self) -> ObjectId {
        match self {
            VectorObject::Text(o) => o.id,
            VectorObject::Rectangle(o) => o.id,
            VectorObject::Circle(o) => o.id,
            VectorObject::Line(o) => o.id,
            VectorObject::Image(o) => o.id,
            VectorObject::Group(o) => o.id,
        }
    }

    /// Anchor position. For lines this is the start point, for circles the
    /// center, for everything else the top-left corner.
    pub fn position(&self) -> Point {
        match self {
            VectorObject::Text(o) => o.position,
            VectorObject::Rectangle(o) => o.position,
            VectorObject::Circle(o) => o.position,
            VectorObject::Line(o) => o.position,
            VectorObject::Image(o) => o.position,
            VectorObject::Group(o) => o.position,
        }
    }

    /// Move the anchor to an absolute position. Lines carry their end point
    /// along so the segment keeps its direction and length.
    pub fn set_position(&mut self, position: Point) {
        let delta = position - self.position();
        self.translate(delta);
    }

    /// Shift the object by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            VectorObject::Text(o) => o.position += delta,
            VectorObject::Rectangle(o) => o.position += delta,
            VectorObject::Circle(o) => o.position += delta,
            VectorObject::Line(o) => {
                o.position += delta;
                o.end += delta;
            }
            VectorObject::Image(o) => o.position += delta,
            VectorObject::Group(o) => o.position += delta,
        }
    }

    pub fn scale(&self) -> Vec2 {
        match self {
            VectorObject::Text(o) => o.scale,
            VectorObject::Rectangle(o) => o.scale,
            VectorObject::Circle(o) => o.scale,
            VectorObject::Line(o) => o.scale,
            VectorObject::Image(o) => o.scale,
            VectorObject::Group(o) => o.scale,
        }
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        match self {
            VectorObject::Text(o) => o.scale = scale,
            VectorObject::Rectangle(o) => o.scale = scale,
            VectorObject::Circle(o) => o.scale = scale,
            VectorObject::Line(o) => o.scale = scale,
            VectorObject::Image(o) => o.scale = scale,
            VectorObject::Group(o) => o.scale = scale,
        }
    }

    pub fn rotation_degrees(&self) -> f64 {
        match self {
            VectorObject::Text(o) => o.rotation_degrees,
            VectorObject::Rectangle(o) => o.rotation_degrees,
            VectorObject::Circle(o) => o.rotation_degrees,
            VectorObject::Line(o) => o.rotation_degrees,
            VectorObject::Image(o) => o.rotation_degrees,
            VectorObject::Group(o) => o.rotation_degrees,
        }
    }

    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        match self {
            VectorObject::Text(o) => o.rotation_degrees = degrees,
            VectorObject::Rectangle(o) => o.rotation_degrees = degrees,
            VectorObject::Circle(o) => o.rotation_degrees = degrees,
            VectorObject::Line(o) => o.rotation_degrees = degrees,
            VectorObject::Image(o) => o.rotation_degrees = degrees,
            VectorObject::Group(o) => o.rotation_degrees = degrees,
        }
    }

    pub fn style(&self) -> &ObjectStyle {
        match self {
            VectorObject::Text(o) => &o.style,
            VectorObject::Rectangle(o) => &o.style,
            VectorObject::Circle(o) => &o.style,
            VectorObject::Line(o) => &o.style,
            VectorObject::Image(o) => &o.style,
            VectorObject::Group(o) => &o.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ObjectStyle {
        match self {
            VectorObject::Text(o) => &mut o.style,
            VectorObject::Rectangle(o) => &mut o.style,
            VectorObject::Circle(o) => &mut o.style,
            VectorObject::Line(o) => &mut o.style,
            VectorObject::Image(o) => &mut o.style,
            VectorObject::Group(o) => &mut o.style,
        }
    }

    pub fn flags(&self) -> &ObjectFlags {
        match self {
            VectorObject::Text(o) => &o.flags,
            VectorObject::Rectangle(o) => &o.flags,
            VectorObject::Circle(o) => &o.flags,
            VectorObject::Line(o) => &o.flags,
            VectorObject::Image(o) => &o.flags,
            VectorObject::Group(o) => &o.flags,
        }
    }

    pub fn flags_mut(&mut self) -> &mut ObjectFlags {
        match self {
            VectorObject::Text(o) => &mut o.flags,
            VectorObject::Rectangle(o) => &mut o.flags,
            VectorObject::Circle(o) => &mut o.flags,
            VectorObject::Line(o) => &mut o.flags,
            VectorObject::Image(o) => &mut o.flags,
            VectorObject::Group(o) => &mut o.flags,
        }
    }

    /// Bounding box in world coordinates, with scale applied.
    /// Groups have no local extent of their own; their bounds are the union
    /// of their children, which only the owning scene can compute — so this
    /// returns `None` for groups.
    pub fn local_bounds(&self) -> Option<Rect> {
        match self {
            VectorObject::Text(o) => Some(o.bounds()),
            VectorObject::Rectangle(o) => Some(o.bounds()),
            VectorObject::Circle(o) => Some(o.bounds()),
            VectorObject::Line(o) => Some(o.bounds()),
            VectorObject::Image(o) => Some(o.bounds()),
            VectorObject::Group(_) => None,
        }
    }

    /// Regenerate the object's id. Used when duplicating or pasting so the
    /// copy never collides with the original.
    pub fn regenerate_id(&mut self) -> ObjectId {
        let new_id = Uuid::new_v4();
        match self {
            VectorObject::Text(o) => o.id = new_id,
            VectorObject::Rectangle(o) => o.id = new_id,
            VectorObject::Circle(o) => o.id = new_id,
            VectorObject::Line(o) => o.id = new_id,
            VectorObject::Image(o) => o.id = new_id,
            VectorObject::Group(o) => o.id = new_id,
        }
        new_id
    }

    pub fn is_group(&self) -> bool {
        matches!(self, VectorObject::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            VectorObject::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            VectorObject::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, VectorObject::Image(_))
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            VectorObject::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            VectorObject::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Variant name, used for log messages and document diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            VectorObject::Text(_) => "text",
            VectorObject::Rectangle(_) => "rectangle",
            VectorObject::Circle(_) => "circle",
            VectorObject::Line(_) => "line",
            VectorObject::Image(_) => "image",
            VectorObject::Group(_) => "group",
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident),+ $(,)?) => {
        $(impl From<$ty> for VectorObject {
            fn from(inner: $ty) -> Self {
                VectorObject::$ty(inner)
            }
        })+
    };
}

impl_from_variant!(Text, Rectangle, Circle, Line, Image, Group);
