//! Snapshot history with a movable cursor.
//!
//! Every mutating operation records a full-scene snapshot after it applies;
//! `snapshots[cursor]` is always the currently displayed state. Recording
//! while behind the head discards the redo branch — the history is a linear
//! stack, not a tree.

use crate::scene::Scene;

/// Maximum number of snapshots to keep. Each snapshot is a full scene copy,
/// so long sessions need a cap; evicting the oldest entry never changes
/// which snapshot the cursor names.
pub const MAX_SNAPSHOTS: usize = 50;

/// Linear undo history over full-scene snapshots.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Scene>,
    cursor: usize,
    max_snapshots: usize,
}

impl History {
    /// Create a history seeded with the session's initial scene.
    pub fn new(initial: Scene) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_snapshots: MAX_SNAPSHOTS,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_capacity(initial: Scene, max_snapshots: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_snapshots: max_snapshots.max(1),
        }
    }

    /// Record the state after a mutation. Truncates any redo branch first.
    pub fn record(&mut self, scene: &Scene) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(scene.clone());
        self.cursor = self.snapshots.len() - 1;

        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot. Safe no-op at the initial snapshot.
    pub fn undo(&mut self) -> Option<&Scene> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Safe no-op at the latest snapshot.
    pub fn redo(&mut self) -> Option<&Scene> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The currently displayed snapshot.
    pub fn current(&self) -> &Scene {
        &self.snapshots[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Rectangle, SerializableColor, VectorObject};
    use kurbo::{Point, Size};

    fn empty_scene() -> Scene {
        Scene::new(Size::new(100.0, 100.0), SerializableColor::white())
    }

    fn scene_with_rects(n: usize) -> Scene {
        let mut scene = empty_scene();
        for i in 0..n {
            scene.add_object(VectorObject::Rectangle(Rectangle::new(
                Point::new(i as f64, 0.0),
                10.0,
                10.0,
            )));
        }
        scene
    }

    #[test]
    fn test_initial_state_has_no_undo() {
        let mut history = History::new(empty_scene());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(scene_with_rects(0));
        history.record(&scene_with_rects(1));
        history.record(&scene_with_rects(2));

        assert_eq!(history.undo().unwrap().len(), 1);
        assert_eq!(history.undo().unwrap().len(), 0);
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().len(), 1);
        assert_eq!(history.redo().unwrap().len(), 2);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_truncates_redo_branch() {
        let mut history = History::new(scene_with_rects(0));
        history.record(&scene_with_rects(1));
        history.record(&scene_with_rects(2));

        history.undo();
        assert!(history.can_redo());

        history.record(&scene_with_rects(3));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current().len(), 3);
        // The discarded future is unreachable: 0, 1, 3 remain.
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_eviction_keeps_cursor_meaning() {
        let mut history = History::with_capacity(scene_with_rects(0), 3);
        history.record(&scene_with_rects(1));
        history.record(&scene_with_rects(2));
        history.record(&scene_with_rects(3)); // evicts the initial snapshot

        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
        // Undo still walks the surviving states in order.
        assert_eq!(history.undo().unwrap().len(), 2);
        assert_eq!(history.undo().unwrap().len(), 1);
        assert!(history.undo().is_none());
    }
}
