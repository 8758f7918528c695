//! Template persistence boundary.
//!
//! A template is a `Document` filed under a caller-chosen string id. The
//! engine only needs save/load/delete/list against that contract; where
//! the bytes live (process memory, a directory of JSON files, a remote
//! API) is the backend's business.

mod file;
mod memory;

pub use file::FileTemplateStore;
pub use memory::MemoryTemplateStore;

use crate::document::Document;
use crate::ports::{EventCategory, EventSink};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("template serialization failed: {0}")]
    Serialization(String),
    #[error("template io failed: {0}")]
    Io(String),
    #[error("template store failure: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future so backends stay object-safe without pulling an async
/// runtime into the engine.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A backend that persists templates by id.
pub trait TemplateStore: Send + Sync {
    /// Save under `id`, replacing whatever was there.
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StoreResult<()>>;

    /// Load the template, `NotFound` for an unknown id.
    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<Document>>;

    /// Delete the template. An unknown id deletes nothing and is Ok.
    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// Ids of every stored template, in no particular order.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

/// Save a template and report the completed save through the sink. A
/// failed save surfaces only through the returned error.
pub async fn save_template(
    store: &dyn TemplateStore,
    events: &dyn EventSink,
    id: &str,
    document: &Document,
) -> StoreResult<()> {
    store.save(id, document).await?;
    events.notify(EventCategory::SaveComplete, &format!("template '{id}' saved"));
    Ok(())
}

// The built-in backends never suspend, so polling with a noop waker is
// enough to run their futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut future = std::pin::pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
