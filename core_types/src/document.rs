//! Document record borrowed from the persistence layer

use crate::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user-authored rich-text document
///
/// `content` is optional because persisted records written by older clients
/// may omit it. Every other field lands in `metadata` and is written back
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier
    pub id: DocumentId,
    /// HTML body, `None` when the stored record has no content field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Opaque pass-through fields (title, owner, timestamps, ...)
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Document {
    /// Creates a document with the given content and no metadata
    pub fn new(id: DocumentId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: Some(content.into()),
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a document whose content field is absent
    pub fn without_content(id: DocumentId) -> Self {
        Self {
            id,
            content: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Adds an opaque metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the content, substituting the empty string when absent
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Returns true if the document has no content (absent or empty)
    pub fn is_empty(&self) -> bool {
        self.content_or_empty().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_or_empty() {
        let id = DocumentId::new();
        assert_eq!(Document::new(id, "<p>x</p>").content_or_empty(), "<p>x</p>");
        assert_eq!(Document::without_content(id).content_or_empty(), "");
        assert!(Document::without_content(id).is_empty());
        assert!(Document::new(id, "").is_empty());
    }

    #[test]
    fn test_missing_content_deserializes_to_none() {
        let id = DocumentId::new();
        let raw = json!({ "id": id, "title": "Notes" });

        let doc: Document = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.id, id);
        assert!(doc.content.is_none());
        assert_eq!(doc.metadata.get("title"), Some(&json!("Notes")));
    }

    #[test]
    fn test_metadata_passes_through_unchanged() {
        let id = DocumentId::new();
        let raw = json!({
            "id": id,
            "content": "<p>Hello</p>",
            "title": "Journal",
            "tags": ["a", "b"],
            "updatedAt": 1700000000
        });

        let doc: Document = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.metadata.len(), 3);

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_with_metadata() {
        let doc = Document::new(DocumentId::new(), "").with_metadata("xp", json!(12));
        assert_eq!(doc.metadata.get("xp"), Some(&json!(12)));
    }
}
