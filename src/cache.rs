use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::document::EntityDocument;

/// Process-wide memoization of parsed documents, keyed by the resolved
/// request path.
///
/// Entries are never invalidated or re-read: the backing files are assumed
/// immutable for the process lifetime, and the map only grows. Two requests
/// racing to populate the same key may both read the file and both insert;
/// the parsed values are equivalent, so last write wins and no
/// insert-if-absent guarantee is made.
#[derive(Default, Clone)]
pub struct DocumentCache {
    inner: Arc<RwLock<HashMap<PathBuf, Arc<EntityDocument>>>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Arc<EntityDocument>> {
        self.inner.read().get(path).cloned()
    }

    pub fn insert(&self, path: PathBuf, document: EntityDocument) -> Arc<EntityDocument> {
        let document = Arc::new(document);
        self.inner.write().insert(path, Arc::clone(&document));
        document
    }
}
