use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::ReasonCode;

/// Longest diagnostic snippet kept from the extracted text, in characters.
pub const FOUND_TEXT_MAX_CHARS: usize = 400;

/// Structured fields parsed out of a sealed document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealFields {
    pub rider_id: i64,
    /// Lowercase hex.
    pub hash: String,
}

/// Which field the parser could not find. Identifier comes first: when it
/// is missing the digest is never looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParseFailure {
    MissingId,
    MissingHash { rider_id: i64 },
}

impl FieldParseFailure {
    pub fn reason(&self) -> ReasonCode {
        match self {
            Self::MissingId => ReasonCode::NoId,
            Self::MissingHash { .. } => ReasonCode::NoHash,
        }
    }

    pub fn rider_id(&self) -> Option<i64> {
        match self {
            Self::MissingId => None,
            Self::MissingHash { rider_id } => Some(*rider_id),
        }
    }
}

/// Outcome of one seal verification.
///
/// `valid` is true exactly when `reason` is `ok`, in which case both
/// `rider_id` and `hash` are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub rider_id: Option<i64>,
    pub hash: Option<String>,
    /// Trimmed head of the raw extracted text, at most 400 characters.
    pub found_text: String,
    pub reason: ReasonCode,
}

impl VerificationResult {
    /// Result for a call that never got past its first stage.
    pub fn not_found() -> Self {
        ResultAssembler::new().finish(ReasonCode::NotFound)
    }

    /// Emit the outcome at a level matching its severity. System faults are
    /// errors so they reach operator alerting; document failures are info.
    pub fn log_outcome(&self, document: &Path) {
        let path = document.display();
        if self.reason.is_system_fault() {
            tracing::error!(
                path = %path,
                reason = %self.reason,
                rider_id = ?self.rider_id,
                "Seal verification could not complete"
            );
        } else if self.valid {
            tracing::info!(
                path = %path,
                rider_id = ?self.rider_id,
                "Seal verified"
            );
        } else {
            tracing::info!(
                path = %path,
                reason = %self.reason,
                rider_id = ?self.rider_id,
                "Seal rejected"
            );
        }
        tracing::debug!(path = %path, found_text = %self.found_text, "Seal snippet");
    }
}

/// Collects what each pipeline stage learned and produces the single
/// `VerificationResult`. `finish` consumes the assembler, so a reason is
/// assigned exactly once per call.
#[derive(Debug, Default)]
pub struct ResultAssembler {
    rider_id: Option<i64>,
    hash: Option<String>,
    found_text: String,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, raw: &str) -> Self {
        self.found_text = found_text(raw);
        self
    }

    pub fn partial(mut self, failure: &FieldParseFailure) -> Self {
        self.rider_id = failure.rider_id();
        self
    }

    pub fn fields(mut self, fields: &SealFields) -> Self {
        self.rider_id = Some(fields.rider_id);
        self.hash = Some(fields.hash.clone());
        self
    }

    pub fn finish(self, reason: ReasonCode) -> VerificationResult {
        VerificationResult {
            valid: reason.is_valid(),
            rider_id: self.rider_id,
            hash: self.hash,
            found_text: self.found_text,
            reason,
        }
    }
}

/// Diagnostic snippet: the trimmed text cut to 400 characters. Always a
/// prefix of `raw.trim()`.
pub fn found_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(FOUND_TEXT_MAX_CHARS) {
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}
