//! Boundary contracts: the engine's view of the surrounding application.
//!
//! These are injected dependencies, never ambient singletons, so the engine
//! stays testable without an application shell.

use crate::error::{CoreError, CoreResult};

/// Category of a notification emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// An image source failed to resolve or load (non-fatal).
    LoadFailure,
    /// A document failed structural validation on load.
    MalformedDocument,
    /// A raster export completed.
    ExportComplete,
    /// A template save completed.
    SaveComplete,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::LoadFailure => "load-failure",
            EventCategory::MalformedDocument => "malformed-document",
            EventCategory::ExportComplete => "export-complete",
            EventCategory::SaveComplete => "save-complete",
        }
    }
}

/// Notification sink. Delivery (toast, log file, metrics pipe) is the
/// implementation's concern.
pub trait EventSink: Send + Sync {
    fn notify(&self, category: EventCategory, message: &str);
}

/// Sink that forwards notifications to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&self, category: EventCategory, message: &str) {
        match category {
            EventCategory::LoadFailure | EventCategory::MalformedDocument => {
                log::warn!("[{}] {}", category.as_str(), message);
            }
            EventCategory::ExportComplete | EventCategory::SaveComplete => {
                log::info!("[{}] {}", category.as_str(), message);
            }
        }
    }
}

/// Sink that discards everything. Useful in tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _category: EventCategory, _message: &str) {}
}

/// A resolved product image: the fetchable URL plus the intrinsic pixel
/// size when the resolver happens to know it (used by the masonry layout
/// to derive deterministic item heights).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub natural_size: Option<(u32, u32)>,
}

/// Resolves a product's (possibly relative) image reference into an
/// absolute, fetchable URL. The engine treats the result as opaque.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, image_url: &str) -> CoreResult<ResolvedImage>;
}

/// Resolver that passes URLs through unchanged, with no size knowledge.
#[derive(Debug, Default)]
pub struct PassthroughResolver;

impl ImageResolver for PassthroughResolver {
    fn resolve(&self, image_url: &str) -> CoreResult<ResolvedImage> {
        if image_url.is_empty() {
            return Err(CoreError::ResourceLoad("empty image url".to_string()));
        }
        Ok(ResolvedImage {
            url: image_url.to_string(),
            natural_size: None,
        })
    }
}
