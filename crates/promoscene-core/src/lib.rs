//! PromoScene Core Library
//!
//! Platform-agnostic composition engine for product promo collages:
//! vector object model, scene with undo history, interactive editing
//! surface, layout composer, and document serialization.

pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod layout;
pub mod objects;
pub mod ports;
pub mod scene;
pub mod store;

pub use document::{DOCUMENT_VERSION, Document};
pub use editor::{AlignEdge, ReorderDirection, SceneEditor, StylePatch, TransformPatch};
pub use error::{CoreError, CoreResult};
pub use history::{History, MAX_SNAPSHOTS};
pub use layout::{HEADER_HEIGHT, LayoutConfig, LayoutKind, ProductRef, compose};
pub use objects::{ObjectId, SerializableColor, VectorObject};
pub use ports::{
    EventCategory, EventSink, ImageResolver, LogSink, NullSink, PassthroughResolver,
    ResolvedImage,
};
pub use scene::Scene;
pub use store::{StoreError, StoreResult, TemplateStore, save_template};
