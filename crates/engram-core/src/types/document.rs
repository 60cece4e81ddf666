use serde::{Deserialize, Serialize};

/// One indexed document: caller-assigned id, raw content, opaque metadata,
/// and the monotonically assigned internal id that links it to its ANN node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub content: String,
    /// Opaque caller metadata, stored and returned verbatim.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Never reused; soft deletion leaves the ANN node tombstoned.
    pub internal_id: u64,
}
