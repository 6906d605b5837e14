use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered rider: the authoritative record a sealed PDF is checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub id: i64,
    /// Digest printed into the sealed document, stored as registered.
    pub seal_hash: String,
    pub label: Option<String>,
    pub registered_at: NaiveDateTime,
}
