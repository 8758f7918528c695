//! Template store backed by a directory of JSON files, one per template.

use super::{BoxFuture, StoreError, StoreResult, TemplateStore};
use crate::document::Document;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileTemplateStore {
    root: PathBuf,
}

impl FileTemplateStore {
    /// Open a store rooted at `root`, creating the directory on first use.
    pub fn new(root: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&root)
            .map_err(|e| StoreError::Io(format!("cannot create {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    /// Open the per-user store, e.g. `~/.local/share/promoscene/templates`.
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("no user data directory".to_string()))?;
        Self::new(base.join("promoscene").join("templates"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Ids come from user input; anything that could escape the root or
    // upset a filesystem collapses to '_'.
    fn path_for(&self, id: &str) -> PathBuf {
        let stem: String = id
            .chars()
            .map(|c| match c {
                c if c.is_alphanumeric() => c,
                '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.root.join(stem).with_extension("json")
    }
}

impl TemplateStore for FileTemplateStore {
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.path_for(id);
        let document = document.clone();
        Box::pin(async move {
            let json = document
                .to_json()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| StoreError::Io(format!("cannot write {}: {e}", path.display())))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StoreResult<Document>> {
        let path = self.path_for(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StoreError::NotFound(id));
                }
                Err(e) => {
                    return Err(StoreError::Io(format!(
                        "cannot read {}: {e}",
                        path.display()
                    )));
                }
            };
            Document::from_json(&json)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.path_for(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::Io(format!(
                    "cannot delete {}: {e}",
                    path.display()
                ))),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        let root = self.root.clone();
        Box::pin(async move {
            let entries = fs::read_dir(&root)
                .map_err(|e| StoreError::Io(format!("cannot list {}: {e}", root.display())))?;
            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| Some(path.file_stem()?.to_str()?.to_string()))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.path_for(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}
