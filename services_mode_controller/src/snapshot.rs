//! Controller state snapshot

use core_types::DocumentId;
use serde::{Deserialize, Serialize};
use view_types::RenderMode;

/// Observable controller state
///
/// Two controllers fed the same events produce equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub document_id: DocumentId,
    pub mode: RenderMode,
    pub content: String,
    /// Number of accepted changes
    pub change_count: u64,
}
