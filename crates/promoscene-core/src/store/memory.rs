//! Map-backed template store, for tests and throwaway sessions.

use super::{BoxFuture, StoreError, StoreResult, TemplateStore};
use crate::document::Document;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct MemoryTemplateStore {
    inner: RwLock<HashMap<String, Document>>,
}

// A poisoned map means a writer panicked mid-insert; surface it rather
// than handing out possibly half-written documents.
fn poisoned<G>(_: PoisonError<G>) -> StoreError {
    StoreError::Other("template map lock poisoned".to_string())
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StoreResult<()>> {
        let (id, document) = (id.to_string(), document.clone());
        Box::pin(async move {
            self.inner.write().map_err(poisoned)?.insert(id, document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<Document>> {
        let id = id.to_string();
        Box::pin(async move {
            let inner = self.inner.read().map_err(poisoned)?;
            inner.get(&id).cloned().ok_or(StoreError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.inner.write().map_err(poisoned)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(poisoned)?;
            Ok(inner.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            Ok(self.inner.read().map_err(poisoned)?.contains_key(&id))
        })
    }
}
