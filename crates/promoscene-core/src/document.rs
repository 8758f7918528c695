//! Persisted document shape and the scene round-trip.
//!
//! `Document` is the only externally visible serialized form. Field names
//! are stable across save/load cycles; loading validates structure up
//! front and never constructs a partial scene.

use crate::error::{CoreError, CoreResult};
use crate::objects::{ObjectId, SerializableColor, VectorObject};
use crate::scene::Scene;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Current document schema version, bumped on breaking field changes.
pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    pub canvas_size: Size,
    pub background: SerializableColor,
    /// Every object in the scene, top-level and group children alike, in
    /// depth-first z-order.
    pub objects: Vec<VectorObject>,
    /// Top-level draw order, back to front. Group children are reached
    /// through their group, never listed here.
    pub z_order: Vec<ObjectId>,
}

impl Document {
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::MalformedDocument(e.to_string()))
    }

    /// Parse a document. A structurally invalid payload (wrong shape,
    /// unknown variant tag) fails here rather than at scene construction.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::MalformedDocument(e.to_string()))
    }
}

impl Scene {
    /// Snapshot the scene into its persisted shape. Objects are emitted in
    /// depth-first z-order so output is stable for a given scene.
    pub fn to_document(&self) -> Document {
        let mut objects = Vec::with_capacity(self.len());
        for &id in self.z_order() {
            self.collect_depth_first(id, &mut objects);
        }
        Document {
            version: DOCUMENT_VERSION,
            canvas_size: self.canvas_size,
            background: self.background,
            objects,
            z_order: self.z_order().to_vec(),
        }
    }

    fn collect_depth_first(&self, id: ObjectId, out: &mut Vec<VectorObject>) {
        let Some(object) = self.get(id) else { return };
        out.push(object.clone());
        if let Some(group) = object.as_group() {
            for &child in group.children() {
                self.collect_depth_first(child, out);
            }
        }
    }

    /// Rebuild a scene from a document. Validation is all-or-nothing: any
    /// structural defect aborts with `MalformedDocument` and no scene.
    pub fn from_document(doc: &Document) -> CoreResult<Scene> {
        validate(doc)?;

        let mut scene = Scene::new(doc.canvas_size, doc.background);
        for object in &doc.objects {
            scene.insert_child(object.clone());
        }
        scene.set_z_order(doc.z_order.clone());
        Ok(scene)
    }
}

/// Structural validation: unique ids, a known target for every reference,
/// and every object reachable exactly once (either top-level or through
/// exactly one group).
fn validate(doc: &Document) -> CoreResult<()> {
    let mut arena: HashMap<ObjectId, &VectorObject> = HashMap::with_capacity(doc.objects.len());
    for object in &doc.objects {
        if arena.insert(object.id(), object).is_some() {
            return Err(CoreError::MalformedDocument(format!(
                "duplicate object id {}",
                object.id()
            )));
        }
    }

    let mut seen: HashSet<ObjectId> = HashSet::with_capacity(doc.objects.len());
    for &id in &doc.z_order {
        if !arena.contains_key(&id) {
            return Err(CoreError::MalformedDocument(format!(
                "z-order references unknown object {id}"
            )));
        }
        visit(id, &arena, &mut seen)?;
    }

    if seen.len() != doc.objects.len() {
        return Err(CoreError::MalformedDocument(format!(
            "{} object(s) unreachable from the z-order",
            doc.objects.len() - seen.len()
        )));
    }
    Ok(())
}

fn visit(
    id: ObjectId,
    arena: &HashMap<ObjectId, &VectorObject>,
    seen: &mut HashSet<ObjectId>,
) -> CoreResult<()> {
    if !seen.insert(id) {
        // Reached twice: listed in z-order twice, shared between groups,
        // or part of a group cycle.
        return Err(CoreError::MalformedDocument(format!(
            "object {id} referenced more than once"
        )));
    }
    if let Some(group) = arena.get(&id).and_then(|o| o.as_group()) {
        for &child in group.children() {
            if !arena.contains_key(&child) {
                return Err(CoreError::MalformedDocument(format!(
                    "group {id} references unknown child {child}"
                )));
            }
            visit(child, arena, seen)?;
        }
    }
    Ok(())
}
