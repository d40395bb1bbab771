//! Rendered-model cache keyed by workbook path and modification time

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::Renderer;
use crate::error::{Error, Result};
use crate::model::DocumentModel;

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    model: Arc<DocumentModel>,
}

/// Renders workbooks on demand and reuses the result until the file changes.
///
/// Safe to share between threads; a model is rebuilt whenever the file's
/// modification time differs from the one it was rendered from.
#[derive(Debug)]
pub struct ModelCache {
    renderer: Renderer,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl ModelCache {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Model for the workbook at `path`, rendering it if missing or stale
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Result<Arc<DocumentModel>> {
        let path = path.as_ref();
        let modified = modification_time(path)?;

        if let Some(entry) = self.read_entries().get(path)
            && entry.modified == modified
        {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(&entry.model));
        }

        log::debug!("Rendering {} into cache", path.display());
        let model = Arc::new(self.renderer.render_file(path)?);
        self.write_entries().insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                model: Arc::clone(&model),
            },
        );
        Ok(model)
    }

    /// Drop the cached model for one path
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) -> bool {
        self.write_entries().remove(path.as_ref()).is_some()
    }

    pub fn clear(&self) {
        self.write_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written entry behind,
    // so a poisoned map is still usable.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new(Renderer::default())
    }
}

fn modification_time(path: &Path) -> Result<SystemTime> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.modified()?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(path.to_path_buf())),
        Err(e) => Err(Error::Io(e)),
    }
}
