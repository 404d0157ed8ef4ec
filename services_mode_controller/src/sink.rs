//! Persistence collaborator

use core_types::DocumentId;

/// Receives every accepted edit
///
/// Called synchronously with the editor's raw output. Implementations own
/// retries and failure reporting; the controller does not wait on them.
pub trait PersistenceSink {
    fn persist(&mut self, document_id: DocumentId, content: &str);
}

impl<F> PersistenceSink for F
where
    F: FnMut(DocumentId, &str),
{
    fn persist(&mut self, document_id: DocumentId, content: &str) {
        self(document_id, content)
    }
}
