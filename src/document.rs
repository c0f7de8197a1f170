use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TimelineError};

/// A parsed on-disk document together with its derived entity index.
///
/// When the document carries an `entities` array, the index maps each
/// entity's `entity` identifier to its position in that array. The index
/// lives alongside the document rather than being merged into its
/// namespace, so an identifier that happens to collide with a document
/// field name stays unambiguous.
#[derive(Debug)]
pub struct EntityDocument {
    raw: Value,
    index: HashMap<String, usize>,
}

impl EntityDocument {
    /// Parses raw bytes as JSON and builds the identifier index.
    ///
    /// `path` only labels the error on parse failure; nothing is read from
    /// disk here.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self> {
        let raw: Value =
            serde_json::from_slice(bytes).map_err(|source| TimelineError::MalformedDocument {
                path: path.to_path_buf(),
                source,
            })?;

        let mut index = HashMap::new();
        if let Some(entities) = raw.get("entities").and_then(Value::as_array) {
            for (position, entity) in entities.iter().enumerate() {
                if let Some(id) = entity.get("entity").and_then(Value::as_str) {
                    index.insert(id.to_string(), position);
                }
            }
        }

        Ok(Self { raw, index })
    }

    /// The document exactly as it appeared on disk.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The ordered `entities` array, when the document has one.
    pub fn entities(&self) -> Option<&[Value]> {
        self.raw
            .get("entities")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Position of the identified entity within `entities`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The identified entity itself.
    pub fn entity(&self, id: &str) -> Option<&Value> {
        self.entities()?.get(self.position(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> EntityDocument {
        EntityDocument::parse(Path::new("test.json"), value.to_string().as_bytes())
            .expect("document should parse")
    }

    #[test]
    fn indexes_entities_by_identifier() {
        let document = parse(json!({
            "entities": [
                {"entity": "d1", "entitytype": "DAG"},
                {"entity": "d2", "entitytype": "DAG"},
            ]
        }));

        assert_eq!(document.position("d1"), Some(0));
        assert_eq!(document.position("d2"), Some(1));
        assert_eq!(
            document.entity("d2").and_then(|e| e.get("entity")),
            Some(&json!("d2"))
        );
    }

    #[test]
    fn document_without_entities_has_empty_index() {
        let document = parse(json!({"otherinfo": {"status": "RUNNING"}}));

        assert!(document.entities().is_none());
        assert_eq!(document.position("anything"), None);
        assert_eq!(document.raw(), &json!({"otherinfo": {"status": "RUNNING"}}));
    }

    #[test]
    fn identifier_colliding_with_document_field_stays_resolvable() {
        let document = parse(json!({
            "entities": [{"entity": "entities", "entitytype": "DAG"}]
        }));

        assert_eq!(document.position("entities"), Some(0));
        assert_eq!(
            document.entity("entities").and_then(|e| e.get("entitytype")),
            Some(&json!("DAG"))
        );
    }

    #[test]
    fn entries_without_identifier_are_skipped() {
        let document = parse(json!({
            "entities": [{"entitytype": "DAG"}, {"entity": "d1"}]
        }));

        assert_eq!(document.position("d1"), Some(1));
        assert_eq!(document.entities().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = EntityDocument::parse(Path::new("bad.json"), b"{not json").unwrap_err();
        assert!(matches!(err, TimelineError::MalformedDocument { .. }));
    }
}
