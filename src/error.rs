use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors produced while resolving a timeline query.
///
/// Every variant surfaces to the client as the same fixed 404 payload; the
/// distinction only matters for the server-side logs and for the resolver,
/// which treats `FileNotFound` as the sole trigger for the parent-path
/// fallback.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Nothing exists on disk at the resolved path.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file exists but its content is not valid JSON.
    #[error("malformed document {path}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `fromId` named an entity the resolved document does not contain.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The document is valid but lacks the shape the query requires, such
    /// as a paginated request against a document without an `entities`
    /// array.
    #[error("data not cached for {0}")]
    NotCached(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
