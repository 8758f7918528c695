//! Scene: the object arena plus canvas-level properties and z-order.

use crate::objects::{ObjectId, SerializableColor, VectorObject};
use kurbo::{Rect, Size, Vec2};
use std::collections::HashMap;

/// The full set of drawable objects plus canvas-level properties.
///
/// Objects live in an arena keyed by id. `z_order` lists the top-level
/// objects back to front; group children are in the arena but not in the
/// top-level z-order — the group is the z-order participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Canvas size in logical pixels.
    pub canvas_size: Size,
    /// Canvas background color.
    pub background: SerializableColor,
    /// All objects, keyed by id.
    objects: HashMap<ObjectId, VectorObject>,
    /// Top-level z-order (back to front).
    z_order: Vec<ObjectId>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new(canvas_size: Size, background: SerializableColor) -> Self {
        Self {
            canvas_size,
            background,
            objects: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Add a top-level object at the top of the stack. Returns its id.
    pub fn add_object(&mut self, object: VectorObject) -> ObjectId {
        let id = object.id();
        self.objects.insert(id, object);
        self.z_order.push(id);
        id
    }

    /// Insert an object into the arena without touching the z-order, for
    /// group children and document restoration.
    pub(crate) fn insert_child(&mut self, object: VectorObject) -> ObjectId {
        let id = object.id();
        self.objects.insert(id, object);
        id
    }

    pub(crate) fn push_z_order(&mut self, id: ObjectId) {
        self.z_order.push(id);
    }

    /// Replace the top-level order wholesale, for grouping edits. Callers
    /// are responsible for keeping the ids consistent with the arena.
    pub(crate) fn set_z_order(&mut self, order: Vec<ObjectId>) {
        self.z_order = order;
    }

    /// Remove a single object from the arena and z-order WITHOUT cascading
    /// into group children, for dissolving a group shell.
    pub(crate) fn detach_object(&mut self, id: ObjectId) -> Option<VectorObject> {
        self.z_order.retain(|zid| *zid != id);
        self.objects.remove(&id)
    }

    /// Remove an object by id. Removing a group cascades to its children.
    /// Returns the removed object, or `None` if the id is unknown.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<VectorObject> {
        if !self.objects.contains_key(&id) {
            return None;
        }
        // Collect the whole subtree before mutating.
        let doomed = self.collect_subtree(id);
        self.z_order.retain(|zid| !doomed.contains(zid));
        // Detach from a parent group, if any.
        for object in self.objects.values_mut() {
            if let Some(group) = object.as_group_mut() {
                group.children.retain(|cid| *cid != id);
            }
        }
        let removed = self.objects.remove(&id);
        for child in doomed {
            if child != id {
                self.objects.remove(&child);
            }
        }
        removed
    }

    /// Ids of an object plus, for groups, every descendant.
    fn collect_subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut ids = vec![id];
        if let Some(group) = self.objects.get(&id).and_then(VectorObject::as_group) {
            for &child in group.children() {
                ids.extend(self.collect_subtree(child));
            }
        }
        ids
    }

    pub fn get(&self, id: ObjectId) -> Option<&VectorObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut VectorObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Top-level objects in z-order (back to front).
    pub fn objects_ordered(&self) -> impl Iterator<Item = &VectorObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// The top-level z-order ids (back to front).
    pub fn z_order(&self) -> &[ObjectId] {
        &self.z_order
    }

    /// Total number of objects in the arena, group children included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of top-level objects.
    pub fn top_level_count(&self) -> usize {
        self.z_order.len()
    }

    /// Bounding box of an object; a group's box is the union of its
    /// children's boxes.
    pub fn object_bounds(&self, id: ObjectId) -> Option<Rect> {
        let object = self.objects.get(&id)?;
        match object.local_bounds() {
            Some(bounds) => Some(bounds),
            None => {
                let group = object.as_group()?;
                let mut result: Option<Rect> = None;
                for &child in group.children() {
                    if let Some(bounds) = self.object_bounds(child) {
                        result = Some(match result {
                            Some(r) => r.union(bounds),
                            None => bounds,
                        });
                    }
                }
                result
            }
        }
    }

    /// Translate an object; groups carry their children along.
    pub fn translate_object(&mut self, id: ObjectId, delta: Vec2) {
        let children: Option<Vec<ObjectId>> = self
            .objects
            .get(&id)
            .and_then(VectorObject::as_group)
            .map(|g| g.children().to_vec());
        if let Some(object) = self.objects.get_mut(&id) {
            object.translate(delta);
        }
        if let Some(children) = children {
            for child in children {
                self.translate_object(child, delta);
            }
        }
    }

    /// Bounding box of all top-level objects.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for &id in &self.z_order {
            if let Some(bounds) = self.object_bounds(id) {
                result = Some(match result {
                    Some(r) => r.union(bounds),
                    None => bounds,
                });
            }
        }
        result
    }

    /// Bring an object to the front (topmost). No-op for unknown ids.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&zid| zid == id) {
            if pos < self.z_order.len() - 1 {
                self.z_order.remove(pos);
                self.z_order.push(id);
                return true;
            }
        }
        false
    }

    /// Send an object to the back (bottommost).
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&zid| zid == id) {
            if pos > 0 {
                self.z_order.remove(pos);
                self.z_order.insert(0, id);
                return true;
            }
        }
        false
    }

    /// Move an object one position toward the front. Returns false when it
    /// is already frontmost.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&zid| zid == id) {
            if pos < self.z_order.len() - 1 {
                self.z_order.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an object one position toward the back. Returns false when it
    /// is already backmost.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&zid| zid == id) {
            if pos > 0 {
                self.z_order.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Deep-copy an object (groups recursively, with fresh ids throughout),
    /// shift the copy by `offset`, and place it at the top of the stack.
    pub fn duplicate_object(&mut self, id: ObjectId, offset: Vec2) -> Option<ObjectId> {
        let copy_id = self.deep_copy(id)?;
        self.translate_object(copy_id, offset);
        self.z_order.push(copy_id);
        Some(copy_id)
    }

    /// Clone a subtree into the arena with fresh ids; the copy is not yet in
    /// the z-order.
    fn deep_copy(&mut self, id: ObjectId) -> Option<ObjectId> {
        let mut copy = self.objects.get(&id)?.clone();
        if let Some(group) = copy.as_group_mut() {
            let originals = std::mem::take(&mut group.children);
            let mut fresh = Vec::with_capacity(originals.len());
            for child in originals {
                if let Some(child_copy) = self.deep_copy(child) {
                    fresh.push(child_copy);
                }
            }
            // Borrow again after the recursive copies.
            if let Some(group) = copy.as_group_mut() {
                group.children = fresh;
            }
        }
        copy.regenerate_id();
        Some(self.insert_child(copy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Group, Rectangle, VectorObject};
    use kurbo::Point;

    fn rect_at(x: f64, y: f64) -> VectorObject {
        VectorObject::Rectangle(Rectangle::new(Point::new(x, y), 100.0, 100.0))
    }

    fn scene() -> Scene {
        Scene::new(Size::new(800.0, 600.0), SerializableColor::white())
    }

    #[test]
    fn test_add_and_remove() {
        let mut s = scene();
        let id = s.add_object(rect_at(0.0, 0.0));
        assert_eq!(s.len(), 1);
        assert!(s.remove_object(id).is_some());
        assert!(s.is_empty());
        assert!(s.remove_object(id).is_none());
    }

    #[test]
    fn test_z_order_reorder() {
        let mut s = scene();
        let a = s.add_object(rect_at(0.0, 0.0));
        let b = s.add_object(rect_at(50.0, 50.0));
        let c = s.add_object(rect_at(100.0, 100.0));
        assert_eq!(s.z_order(), &[a, b, c]);

        s.bring_to_front(a);
        assert_eq!(s.z_order(), &[b, c, a]);

        s.send_to_back(a);
        assert_eq!(s.z_order(), &[a, b, c]);

        assert!(s.bring_forward(b));
        assert_eq!(s.z_order(), &[a, c, b]);

        assert!(s.send_backward(c));
        assert_eq!(s.z_order(), &[c, a, b]);

        // Extremes are no-ops.
        assert!(!s.bring_forward(b));
        assert!(!s.send_backward(c));
    }

    #[test]
    fn test_cascading_group_removal() {
        let mut s = scene();
        let a = s.insert_child(rect_at(0.0, 0.0));
        let b = s.insert_child(rect_at(50.0, 50.0));
        let group_id = s.add_object(VectorObject::Group(Group::new(vec![a, b])));
        assert_eq!(s.len(), 3);

        s.remove_object(group_id);
        assert!(s.is_empty());
        assert!(s.get(a).is_none());
        assert!(s.get(b).is_none());
    }

    #[test]
    fn test_group_bounds_union_of_children() {
        let mut s = scene();
        let a = s.insert_child(rect_at(0.0, 0.0));
        let b = s.insert_child(rect_at(200.0, 200.0));
        let group_id = s.add_object(VectorObject::Group(Group::new(vec![a, b])));

        let bounds = s.object_bounds(group_id).unwrap();
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 300.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_translate_group_moves_children() {
        let mut s = scene();
        let a = s.insert_child(rect_at(0.0, 0.0));
        let group_id = s.add_object(VectorObject::Group(Group::new(vec![a])));

        s.translate_object(group_id, Vec2::new(10.0, 20.0));
        assert_eq!(s.get(a).unwrap().position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_duplicate_group_regenerates_child_ids() {
        let mut s = scene();
        let a = s.insert_child(rect_at(0.0, 0.0));
        let group_id = s.add_object(VectorObject::Group(Group::new(vec![a])));

        let copy_id = s.duplicate_object(group_id, Vec2::new(20.0, 20.0)).unwrap();
        assert_ne!(copy_id, group_id);
        assert_eq!(s.len(), 4);

        let copy_children = s.get(copy_id).unwrap().as_group().unwrap().children().to_vec();
        assert_eq!(copy_children.len(), 1);
        assert_ne!(copy_children[0], a);
        // The copy sits on top.
        assert_eq!(*s.z_order().last().unwrap(), copy_id);
        // And is offset.
        assert_eq!(
            s.get(copy_children[0]).unwrap().position(),
            Point::new(20.0, 20.0)
        );
    }
}
