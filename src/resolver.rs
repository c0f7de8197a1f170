use std::io;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tokio::fs;
use tracing::debug;

use crate::cache::DocumentCache;
use crate::document::EntityDocument;
use crate::error::{Result, TimelineError};
use crate::filter;
use crate::query::TimelineQuery;

/// Conventional document served when a request path names a directory.
const INDEX_FILE: &str = "index.json";

/// Resolves a request path and query to a JSON payload.
///
/// The loop implements the path-climbing fallback: when the path names
/// nothing on disk and `from_id` is unset, the final path segment is
/// reinterpreted as an entity identifier inside the parent collection and
/// resolution restarts one level up. Setting `from_id` makes the fallback
/// one-shot, so the loop runs at most twice.
pub async fn resolve(
    cache: &DocumentCache,
    request_path: PathBuf,
    query: TimelineQuery,
) -> Result<Value> {
    let mut path = request_path;
    let mut query = query;

    loop {
        if let Some(document) = cache.get(&path) {
            return resolve_document(&document, &query, &path);
        }

        match load_document(&path).await {
            Ok(document) => {
                let document = cache.insert(path.clone(), document);
                return resolve_document(&document, &query, &path);
            }
            Err(TimelineError::FileNotFound(missing)) if query.from_id.is_none() => {
                let parent = path.parent().map(Path::to_path_buf);
                let segment = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(String::from);

                match (parent, segment) {
                    (Some(parent), Some(segment)) => {
                        debug!(
                            path = %missing.display(),
                            entity = %segment,
                            "climbing to parent collection"
                        );
                        query.from_id = Some(segment);
                        path = parent;
                    }
                    _ => return Err(TimelineError::FileNotFound(missing)),
                }
            }
            Err(err) => return Err(err),
        }
    }
}

/// Reads and parses the document at `path`. A directory is served through
/// its conventional index document; a missing `index.json` inside an
/// existing directory is an I/O error rather than `FileNotFound`, so it
/// never triggers the fallback.
async fn load_document(path: &Path) -> Result<EntityDocument> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(TimelineError::FileNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let file_path = if metadata.is_dir() {
        path.join(INDEX_FILE)
    } else {
        path.to_path_buf()
    };

    let bytes = fs::read(&file_path).await?;
    EntityDocument::parse(path, &bytes)
}

fn resolve_document(
    document: &EntityDocument,
    query: &TimelineQuery,
    path: &Path,
) -> Result<Value> {
    if query.limit == 0 {
        return match &query.from_id {
            Some(id) => document
                .entity(id)
                .cloned()
                .ok_or_else(|| TimelineError::EntityNotFound(id.clone())),
            None => Ok(document.raw().clone()),
        };
    }

    let entities = document
        .entities()
        .ok_or_else(|| TimelineError::NotCached(path.to_path_buf()))?;

    let start = match &query.from_id {
        Some(id) => document
            .position(id)
            .ok_or_else(|| TimelineError::EntityNotFound(id.clone()))?,
        None => 0,
    };

    let page: Vec<Value> = match &query.filters {
        Some(filters) => entities[start..]
            .iter()
            .filter(|entity| filter::matches(entity, filters))
            .take(query.limit)
            .cloned()
            .collect(),
        None => {
            let end = (start + query.limit).min(entities.len());
            entities[start..end].to_vec()
        }
    };

    Ok(json!({ "entities": page }))
}
