//! Stored document contract
//!
//! The persistence layer owns this shape; the boundary must read it and
//! write it back without loss.

#[cfg(test)]
mod tests {
    use core_types::{Document, DocumentId};
    use serde_json::json;

    const ID: &str = "6f1c2b7e-1d2a-4c1e-9a57-0b3c4d5e6f70";

    #[test]
    fn test_document_fields() {
        let doc: Document = serde_json::from_value(json!({
            "id": ID,
            "content": "<p>x</p>",
        }))
        .unwrap();

        assert_eq!(doc.id.as_uuid().to_string(), ID);
        assert_eq!(doc.content.as_deref(), Some("<p>x</p>"));
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let stored = json!({
            "id": ID,
            "content": "<p>x</p>",
            "title": "Release notes",
            "owner": {"name": "ops", "roles": ["admin"]},
            "updated_at": 1700000000,
        });

        let doc: Document = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(doc.metadata.len(), 3);
        assert_eq!(serde_json::to_value(&doc).unwrap(), stored);
    }

    #[test]
    fn test_missing_content_stays_missing() {
        let stored = json!({"id": ID, "title": "Empty"});

        let doc: Document = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(doc.content, None);
        assert_eq!(doc.content_or_empty(), "");
        assert_eq!(serde_json::to_value(&doc).unwrap(), stored);
    }

    #[test]
    fn test_null_content_is_missing() {
        let doc: Document = serde_json::from_value(json!({"id": ID, "content": null})).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_non_string_content_rejected() {
        let result = serde_json::from_value::<Document>(json!({"id": ID, "content": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_id_serializes_as_bare_uuid() {
        let id = DocumentId::new();
        let value = serde_json::to_value(Document::new(id, "")).unwrap();
        assert_eq!(value["id"], json!(id.as_uuid().to_string()));
    }
}
