use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ReasonCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealAuditEntry {
    pub id: i64,
    pub checked_at: NaiveDateTime,
    pub document_path: String,
    pub reason: ReasonCode,
    pub valid: bool,
    pub rider_id: Option<i64>,
    pub seal_hash: Option<String>,
}
