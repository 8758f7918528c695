//! Group object: an ordered list of child ids.
//!
//! Children live in the scene's object arena, keyed by id — the group only
//! holds the ordering and owns the children's lifecycle (removing a group
//! cascades). Nested groups are allowed.

use super::{ObjectFlags, ObjectId, ObjectStyle};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group of objects manipulated as a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ObjectId,
    /// Nominal anchor position. Group extent comes from its children, so
    /// this only tracks accumulated translation.
    #[serde(default = "Point::default")]
    pub position: Point,
    /// Ordered child ids (back to front within the group).
    pub children: Vec<ObjectId>,
    #[serde(default = "super::text::default_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub rotation_degrees: f64,
    #[serde(default)]
    pub style: ObjectStyle,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl Group {
    pub fn new(children: Vec<ObjectId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            children,
            scale: Vec2::new(1.0, 1.0),
            rotation_degrees: 0.0,
            style: ObjectStyle::default(),
            flags: ObjectFlags::default(),
        }
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn contains_child(&self, id: ObjectId) -> bool {
        self.children.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_holds_child_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let group = Group::new(vec![a, b]);
        assert_eq!(group.children(), &[a, b]);
        assert!(group.contains_child(a));
        assert!(!group.contains_child(Uuid::new_v4()));
    }
}
