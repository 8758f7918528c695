//! Interactive editing surface: selection, transforms, and history wiring.
//!
//! Every mutating operation records exactly one snapshot after it applies.
//! Batch operations (align, flips across a selection) update every object
//! first and record once. Selection changes never record.

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::history::History;
use crate::objects::{DUPLICATE_OFFSET, Group, ObjectId, SerializableColor, VectorObject};
use crate::ports::{EventCategory, EventSink};
use crate::scene::Scene;
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// Edge used by align operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignEdge {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Z-order move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Front,
    Back,
    Forward,
    Backward,
}

/// Partial geometric update for a single object. Unset fields are left
/// unchanged; flips toggle the sign of the scale component.
#[derive(Debug, Clone, Default)]
pub struct TransformPatch {
    pub position: Option<Point>,
    pub scale: Option<Vec2>,
    pub rotation_degrees: Option<f64>,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

/// Partial style update. Font fields only apply to text variants; shape
/// variants silently ignore them (variant-conditional, not an error).
#[derive(Debug, Clone, Default)]
pub struct StylePatch {
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub font_size_pt: Option<f64>,
    pub font_family: Option<crate::objects::FontFamily>,
    pub font_weight: Option<crate::objects::FontWeight>,
    pub text_align: Option<crate::objects::TextAlign>,
}

/// The editing session: live scene, selection set, and undo history.
pub struct SceneEditor {
    scene: Scene,
    history: History,
    selection: Vec<ObjectId>,
    events: Arc<dyn EventSink>,
}

impl SceneEditor {
    /// Start an editing session. The initial scene becomes the history's
    /// first snapshot.
    pub fn new(scene: Scene, events: Arc<dyn EventSink>) -> Self {
        let history = History::new(scene.clone());
        Self {
            scene,
            history,
            selection: Vec::new(),
            events,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    fn commit(&mut self) {
        self.history.record(&self.scene);
    }

    /// Add an object at the top of the stack.
    pub fn add_object(&mut self, object: VectorObject) -> ObjectId {
        let id = self.scene.add_object(object);
        self.commit();
        id
    }

    /// Remove an object (cascading for groups). Unknown ids are a
    /// not-found signal: nothing changes and nothing is recorded.
    pub fn remove_object(&mut self, id: ObjectId) -> CoreResult<()> {
        if self.scene.remove_object(id).is_none() {
            return Err(CoreError::NotFound(id));
        }
        self.selection.retain(|sid| self.scene.contains(*sid));
        self.commit();
        Ok(())
    }

    /// Replace the selection set. Unknown and unselectable ids are dropped.
    /// Selection is not scene content, so this never records history.
    pub fn set_selection(&mut self, ids: &[ObjectId]) {
        self.selection = ids
            .iter()
            .copied()
            .filter(|id| {
                self.scene
                    .get(*id)
                    .is_some_and(|o| o.flags().selectable)
            })
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Apply a committed transform to one object. One history record per
    /// call — drag previews must not route through here.
    pub fn transform(&mut self, id: ObjectId, patch: &TransformPatch) -> CoreResult<()> {
        let object = self.scene.get(id).ok_or(CoreError::NotFound(id))?;
        if object.flags().locked {
            log::debug!("transform ignored for locked object {id}");
            return Ok(());
        }
        let current = object.position();

        if let Some(position) = patch.position {
            // Route through translate so group children follow.
            self.scene.translate_object(id, position - current);
        }
        if let Some(object) = self.scene.get_mut(id) {
            if let Some(scale) = patch.scale {
                object.set_scale(scale);
            }
            if let Some(degrees) = patch.rotation_degrees {
                object.set_rotation_degrees(degrees);
            }
            if patch.flip_horizontal {
                let s = object.scale();
                object.set_scale(Vec2::new(-s.x, s.y));
            }
            if patch.flip_vertical {
                let s = object.scale();
                object.set_scale(Vec2::new(s.x, -s.y));
            }
        }
        self.commit();
        Ok(())
    }

    /// Align every object in `ids` so the given edge (or center line)
    /// coincides with the first object's bounding box. A single-element
    /// call is valid and leaves the object in place.
    pub fn align(&mut self, ids: &[ObjectId], edge: AlignEdge) -> CoreResult<()> {
        let Some(&first) = ids.first() else {
            return Ok(());
        };
        let target = self
            .scene
            .object_bounds(first)
            .ok_or(CoreError::NotFound(first))?;

        for &id in ids {
            let Some(bounds) = self.scene.object_bounds(id) else {
                continue;
            };
            let delta = match edge {
                AlignEdge::Left => Vec2::new(target.x0 - bounds.x0, 0.0),
                AlignEdge::Center => {
                    Vec2::new(target.center().x - bounds.center().x, 0.0)
                }
                AlignEdge::Right => Vec2::new(target.x1 - bounds.x1, 0.0),
                AlignEdge::Top => Vec2::new(0.0, target.y0 - bounds.y0),
                AlignEdge::Middle => {
                    Vec2::new(0.0, target.center().y - bounds.center().y)
                }
                AlignEdge::Bottom => Vec2::new(0.0, target.y1 - bounds.y1),
            };
            self.scene.translate_object(id, delta);
        }
        // One record for the whole batch, after all objects moved.
        self.commit();
        Ok(())
    }

    /// Move an object within the z-order. Already-at-the-extreme calls are
    /// no-ops and record nothing.
    pub fn reorder(&mut self, id: ObjectId, direction: ReorderDirection) -> CoreResult<()> {
        if !self.scene.contains(id) {
            return Err(CoreError::NotFound(id));
        }
        let moved = match direction {
            ReorderDirection::Front => self.scene.bring_to_front(id),
            ReorderDirection::Back => self.scene.send_to_back(id),
            ReorderDirection::Forward => self.scene.bring_forward(id),
            ReorderDirection::Backward => self.scene.send_backward(id),
        };
        if moved {
            self.commit();
        }
        Ok(())
    }

    /// Merge style fields into one object. Font fields are applied only to
    /// text variants.
    pub fn apply_style(&mut self, id: ObjectId, patch: &StylePatch) -> CoreResult<()> {
        let object = self.scene.get_mut(id).ok_or(CoreError::NotFound(id))?;

        let style = object.style_mut();
        if let Some(fill) = patch.fill {
            style.fill = Some(fill);
        }
        if let Some(stroke) = patch.stroke {
            style.stroke = stroke;
        }
        if let Some(width) = patch.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(opacity) = patch.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }

        if let VectorObject::Text(text) = object {
            if let Some(size) = patch.font_size_pt {
                text.font_size_pt = size.max(0.0);
            }
            if let Some(family) = patch.font_family {
                text.font_family = family;
            }
            if let Some(weight) = patch.font_weight {
                text.font_weight = weight;
            }
            if let Some(align) = patch.text_align {
                text.text_align = align;
            }
        }

        self.commit();
        Ok(())
    }

    /// Deep-copy an object to the top of the stack, shifted by `offset`
    /// (default +20,+20 so the copy is visibly distinct).
    pub fn duplicate(&mut self, id: ObjectId, offset: Option<Vec2>) -> CoreResult<ObjectId> {
        let copy_id = self
            .scene
            .duplicate_object(id, offset.unwrap_or(DUPLICATE_OFFSET))
            .ok_or(CoreError::NotFound(id))?;
        self.commit();
        Ok(copy_id)
    }

    /// Group the current selection. Returns the new group id, or `None`
    /// when fewer than two objects are selected.
    pub fn group_selected(&mut self) -> Option<ObjectId> {
        if self.selection.len() < 2 {
            return None;
        }
        // Children keep their relative z-order inside the group.
        let members: Vec<ObjectId> = self
            .scene
            .z_order()
            .iter()
            .copied()
            .filter(|id| self.selection.contains(id))
            .collect();
        if members.len() < 2 {
            return None;
        }

        let Some(&topmost) = members.last() else {
            return None;
        };
        let group = Group::new(members.clone());
        let group_id = group.id;

        // Members leave the top-level z-order but stay in the arena; the
        // group takes the topmost member's slot.
        let mut order = Vec::with_capacity(self.scene.z_order().len());
        for id in self.scene.z_order().iter().copied() {
            if id == topmost {
                order.push(group_id);
            } else if !members.contains(&id) {
                order.push(id);
            }
        }
        self.scene.insert_child(VectorObject::Group(group));
        self.scene.set_z_order(order);

        self.selection = vec![group_id];
        self.commit();
        Some(group_id)
    }

    /// Dissolve a group, returning its children to the top level at the
    /// group's z-position.
    pub fn ungroup(&mut self, id: ObjectId) -> CoreResult<Vec<ObjectId>> {
        let children = self
            .scene
            .get(id)
            .and_then(VectorObject::as_group)
            .map(|g| g.children().to_vec())
            .ok_or(CoreError::NotFound(id))?;

        let pos = self
            .scene
            .z_order()
            .iter()
            .position(|zid| *zid == id)
            .unwrap_or(self.scene.z_order().len());

        let mut order: Vec<ObjectId> = self
            .scene
            .z_order()
            .iter()
            .copied()
            .filter(|zid| *zid != id)
            .collect();
        for (i, child) in children.iter().enumerate() {
            order.insert((pos + i).min(order.len()), *child);
        }
        self.scene.set_z_order(order);

        // Drop the group shell without cascading into the children.
        self.scene.detach_object(id);

        self.selection = children.clone();
        self.commit();
        Ok(children)
    }

    /// Mirror the selection horizontally around its combined center.
    pub fn flip_selected_horizontal(&mut self) {
        self.flip_selected(true);
    }

    /// Mirror the selection vertically around its combined center.
    pub fn flip_selected_vertical(&mut self) {
        self.flip_selected(false);
    }

    fn flip_selected(&mut self, horizontal: bool) {
        if self.selection.is_empty() {
            return;
        }
        let mut combined: Option<kurbo::Rect> = None;
        for &id in &self.selection {
            if let Some(bounds) = self.scene.object_bounds(id) {
                combined = Some(match combined {
                    Some(r) => r.union(bounds),
                    None => bounds,
                });
            }
        }
        let Some(combined) = combined else { return };
        let center = combined.center();

        let ids = self.selection.clone();
        for id in ids {
            let Some(bounds) = self.scene.object_bounds(id) else {
                continue;
            };
            let delta = if horizontal {
                Vec2::new(2.0 * center.x - bounds.x1 - bounds.x0, 0.0)
            } else {
                Vec2::new(0.0, 2.0 * center.y - bounds.y1 - bounds.y0)
            };
            self.scene.translate_object(id, delta);
            if let Some(object) = self.scene.get_mut(id) {
                let s = object.scale();
                if horizontal {
                    object.set_scale(Vec2::new(-s.x, s.y));
                } else {
                    object.set_scale(Vec2::new(s.x, -s.y));
                }
            }
        }
        self.commit();
    }

    /// Step the scene back one snapshot. Safe to call unconditionally.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.history.undo() {
            self.scene = snapshot.clone();
            self.selection.retain(|id| self.scene.contains(*id));
            true
        } else {
            false
        }
    }

    /// Step the scene forward one snapshot. Safe to call unconditionally.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.history.redo() {
            self.scene = snapshot.clone();
            self.selection.retain(|id| self.scene.contains(*id));
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the live scene with a document's contents and record a
    /// snapshot. A rejected document is reported through the sink and
    /// leaves the session exactly as it was.
    pub fn load_document(&mut self, doc: &Document) -> CoreResult<()> {
        match Scene::from_document(doc) {
            Ok(scene) => {
                self.scene = scene;
                self.selection.clear();
                self.commit();
                Ok(())
            }
            Err(err) => {
                self.events
                    .notify(EventCategory::MalformedDocument, &err.to_string());
                Err(err)
            }
        }
    }

    /// Snapshot the live scene into its persisted shape.
    pub fn to_document(&self) -> Document {
        self.scene.to_document()
    }

    /// Apply a late image-load completion. The load runs outside the engine
    /// and may finish after the object (or the whole scene state) is gone;
    /// a stale completion is a no-op — it must never resurrect a removed
    /// object. Not a user action, so it does not record history.
    pub fn complete_image_load(
        &mut self,
        id: ObjectId,
        result: Result<(u32, u32), String>,
    ) {
        let Some(image) = self.scene.get_mut(id).and_then(VectorObject::as_image_mut)
        else {
            log::debug!("stale image load completion for {id}, ignoring");
            return;
        };
        match result {
            Ok((w, h)) => image.mark_loaded(w, h),
            Err(reason) => {
                image.mark_failed();
                self.events.notify(
                    EventCategory::LoadFailure,
                    &format!("image load failed for {id}: {reason}"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Rectangle, Text};
    use crate::ports::NullSink;
    use kurbo::Size;

    fn editor() -> SceneEditor {
        let scene = Scene::new(Size::new(800.0, 600.0), SerializableColor::white());
        SceneEditor::new(scene, Arc::new(NullSink))
    }

    #[derive(Default)]
    struct RecordingSink(std::sync::Mutex<Vec<(EventCategory, String)>>);

    impl EventSink for RecordingSink {
        fn notify(&self, category: EventCategory, message: &str) {
            self.0.lock().unwrap().push((category, message.to_string()));
        }
    }

    fn rect_at(x: f64, y: f64) -> VectorObject {
        VectorObject::Rectangle(Rectangle::new(Point::new(x, y), 100.0, 100.0))
    }

    #[test]
    fn test_add_then_undo_redo() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(0.0, 0.0));
        assert!(ed.scene().contains(id));

        assert!(ed.undo());
        assert!(ed.scene().is_empty());

        assert!(ed.redo());
        assert!(ed.scene().contains(id));
    }

    #[test]
    fn test_remove_unknown_is_not_found_and_records_nothing() {
        let mut ed = editor();
        let missing = uuid::Uuid::new_v4();
        assert!(matches!(
            ed.remove_object(missing),
            Err(CoreError::NotFound(_))
        ));
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_selection_does_not_record() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(0.0, 0.0));
        let before = ed.can_redo();
        ed.set_selection(&[id]);
        assert_eq!(ed.selection(), &[id]);
        assert_eq!(ed.can_redo(), before);
    }

    #[test]
    fn test_selection_drops_unselectable() {
        let mut ed = editor();
        let mut rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        rect.flags.selectable = false;
        let id = ed.add_object(VectorObject::Rectangle(rect));
        ed.set_selection(&[id]);
        assert!(ed.selection().is_empty());
    }

    #[test]
    fn test_transform_moves_and_records_once() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(0.0, 0.0));
        ed.transform(
            id,
            &TransformPatch {
                position: Some(Point::new(40.0, 50.0)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ed.scene().get(id).unwrap().position(), Point::new(40.0, 50.0));

        // Undo the transform, then the add.
        assert!(ed.undo());
        assert_eq!(ed.scene().get(id).unwrap().position(), Point::ZERO);
        assert!(ed.undo());
        assert!(ed.scene().is_empty());
    }

    #[test]
    fn test_transform_locked_is_ignored() {
        let mut ed = editor();
        let mut rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        rect.flags.locked = true;
        let id = ed.add_object(VectorObject::Rectangle(rect));
        ed.transform(
            id,
            &TransformPatch {
                position: Some(Point::new(99.0, 99.0)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ed.scene().get(id).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_align_left_scenario() {
        // Rectangles at (0,0) and (50,50), align left: both end up at
        // x = 0 with y untouched.
        let mut ed = editor();
        let a = ed.add_object(rect_at(0.0, 0.0));
        let b = ed.add_object(rect_at(50.0, 50.0));

        ed.align(&[a, b], AlignEdge::Left).unwrap();
        assert_eq!(ed.scene().get(a).unwrap().position(), Point::new(0.0, 0.0));
        assert_eq!(ed.scene().get(b).unwrap().position(), Point::new(0.0, 50.0));
    }

    #[test]
    fn test_align_records_one_snapshot_for_batch() {
        let mut ed = editor();
        let a = ed.add_object(rect_at(0.0, 0.0));
        let b = ed.add_object(rect_at(50.0, 50.0));
        let c = ed.add_object(rect_at(90.0, 120.0));

        ed.align(&[a, b, c], AlignEdge::Top).unwrap();
        // One undo reverts the whole batch.
        assert!(ed.undo());
        assert_eq!(ed.scene().get(b).unwrap().position(), Point::new(50.0, 50.0));
        assert_eq!(ed.scene().get(c).unwrap().position(), Point::new(90.0, 120.0));
    }

    #[test]
    fn test_align_single_element_is_valid() {
        let mut ed = editor();
        let a = ed.add_object(rect_at(10.0, 10.0));
        ed.align(&[a], AlignEdge::Center).unwrap();
        assert_eq!(ed.scene().get(a).unwrap().position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_reorder_noop_at_extreme_records_nothing() {
        let mut ed = editor();
        let a = ed.add_object(rect_at(0.0, 0.0));
        let _b = ed.add_object(rect_at(10.0, 10.0));

        // `a` is already at the back.
        ed.reorder(a, ReorderDirection::Back).unwrap();
        // Two undos (the adds) and we're back at empty: the reorder did not
        // add a third record.
        assert!(ed.undo());
        assert!(ed.undo());
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_apply_style_ignores_font_fields_on_shapes() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(0.0, 0.0));
        ed.apply_style(
            id,
            &StylePatch {
                opacity: Some(0.5),
                font_size_pt: Some(99.0),
                ..Default::default()
            },
        )
        .unwrap();
        let style = ed.scene().get(id).unwrap().style();
        assert!((style.opacity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_style_sets_fill_and_stroke() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(0.0, 0.0));
        ed.apply_style(
            id,
            &StylePatch {
                fill: Some(SerializableColor::black()),
                stroke: Some(SerializableColor::white()),
                ..Default::default()
            },
        )
        .unwrap();
        let style = ed.scene().get(id).unwrap().style();
        assert_eq!(style.fill, Some(SerializableColor::black()));
        assert_eq!(style.stroke, SerializableColor::white());
    }

    #[test]
    fn test_apply_style_sets_font_on_text() {
        let mut ed = editor();
        let id = ed.add_object(VectorObject::Text(Text::new(Point::ZERO, "hi")));
        ed.apply_style(
            id,
            &StylePatch {
                font_size_pt: Some(36.0),
                ..Default::default()
            },
        )
        .unwrap();
        match ed.scene().get(id).unwrap() {
            VectorObject::Text(t) => assert!((t.font_size_pt - 36.0).abs() < f64::EPSILON),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_duplicate_default_offset() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(5.0, 5.0));
        let copy = ed.duplicate(id, None).unwrap();
        assert_ne!(copy, id);
        assert_eq!(ed.scene().get(copy).unwrap().position(), Point::new(25.0, 25.0));
        assert_eq!(*ed.scene().z_order().last().unwrap(), copy);
    }

    #[test]
    fn test_group_and_ungroup_round_trip() {
        let mut ed = editor();
        let a = ed.add_object(rect_at(0.0, 0.0));
        let b = ed.add_object(rect_at(50.0, 50.0));
        ed.set_selection(&[a, b]);

        let group_id = ed.group_selected().unwrap();
        assert_eq!(ed.scene().top_level_count(), 1);
        assert_eq!(ed.selection(), &[group_id]);

        let children = ed.ungroup(group_id).unwrap();
        assert_eq!(children, vec![a, b]);
        assert_eq!(ed.scene().top_level_count(), 2);
        assert!(!ed.scene().contains(group_id));
    }

    #[test]
    fn test_stale_image_completion_is_noop() {
        let mut ed = editor();
        let img = crate::objects::Image::new(Point::ZERO, "a.png", 100.0, 100.0);
        let id = ed.add_object(VectorObject::Image(img));
        ed.remove_object(id).unwrap();

        // Late completion against the removed object: nothing resurrects.
        ed.complete_image_load(id, Ok((640, 480)));
        assert!(ed.scene().is_empty());
    }

    #[test]
    fn test_image_completion_failure_marks_failed() {
        let mut ed = editor();
        let img = crate::objects::Image::new(Point::ZERO, "a.png", 100.0, 100.0);
        let id = ed.add_object(VectorObject::Image(img));
        ed.complete_image_load(id, Err("404".to_string()));

        let image = ed.scene().get(id).unwrap().as_image().unwrap();
        assert_eq!(image.load_state, crate::objects::LoadState::Failed);
    }

    #[test]
    fn test_load_document_replaces_scene_and_records() {
        let mut ed = editor();
        let id = ed.add_object(rect_at(10.0, 10.0));
        let doc = ed.to_document();

        ed.remove_object(id).unwrap();
        ed.load_document(&doc).unwrap();
        assert!(ed.scene().contains(id));
        // The load itself is undoable.
        assert!(ed.undo());
        assert!(ed.scene().is_empty());
    }

    #[test]
    fn test_load_rejected_document_reports_and_leaves_scene() {
        let sink = Arc::new(RecordingSink::default());
        let scene = Scene::new(Size::new(800.0, 600.0), SerializableColor::white());
        let mut ed = SceneEditor::new(scene, sink.clone());
        let id = ed.add_object(rect_at(0.0, 0.0));

        // z-order referencing an object the document does not carry.
        let mut doc = ed.to_document();
        doc.objects.clear();

        assert!(matches!(
            ed.load_document(&doc),
            Err(CoreError::MalformedDocument(_))
        ));
        assert!(ed.scene().contains(id));

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, EventCategory::MalformedDocument);
    }

    #[test]
    fn test_flip_horizontal_mirrors_positions() {
        let mut ed = editor();
        let a = ed.add_object(rect_at(0.0, 0.0));
        let b = ed.add_object(rect_at(200.0, 0.0));
        ed.set_selection(&[a, b]);

        ed.flip_selected_horizontal();
        // Combined bounds were [0, 300]; the two rects swap sides.
        assert_eq!(ed.scene().get(a).unwrap().position().x, 200.0);
        assert_eq!(ed.scene().get(b).unwrap().position().x, 0.0);
    }
}
