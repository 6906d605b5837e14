use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::marker::contains_marker;
use super::parser::parse_fields;
use super::types::{ResultAssembler, VerificationResult};
use super::verifier::{check_seal, RiderSealStore, SqliteRiderStore};
use crate::config::SealConfig;
use crate::models::ReasonCode;
use crate::pipeline::extraction::{FirstPageExtractor, PdfToTextExtractor};

/// Verifier wired to `pdftotext` and a SQLite riders database.
pub type SqliteSealVerifier = SealVerifier<PdfToTextExtractor, SqliteRiderStore>;

/// Seal verification pipeline:
/// file check → extract → marker → fields → authoritative lookup.
///
/// Each stage either advances or ends the call with its reason code. No
/// stage runs after a failure, and `verify` itself never fails: every
/// problem with the document or the store is reported through the result.
pub struct SealVerifier<E, S> {
    extractor: E,
    store: S,
}

impl SqliteSealVerifier {
    pub fn from_config(config: &SealConfig) -> Self {
        Self::new(
            PdfToTextExtractor::from_config(config),
            SqliteRiderStore::new(&config.database_path),
        )
    }
}

impl<E, S> SealVerifier<E, S>
where
    E: FirstPageExtractor,
    S: RiderSealStore,
{
    pub fn new(extractor: E, store: S) -> Self {
        Self { extractor, store }
    }

    pub fn verify(&self, document: &Path) -> VerificationResult {
        let started = Instant::now();
        let result = self.run_stages(document);
        tracing::debug!(
            path = %document.display(),
            reason = %result.reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Seal verification finished"
        );
        result
    }

    fn run_stages(&self, document: &Path) -> VerificationResult {
        let assembler = ResultAssembler::new();

        if !is_nonempty_file(document) {
            return assembler.finish(ReasonCode::NoFile);
        }

        let text = self.extract_or_empty(document);
        let assembler = assembler.text(&text);

        if !contains_marker(&text) {
            return assembler.finish(ReasonCode::NoMarker);
        }

        let fields = match parse_fields(&text) {
            Ok(fields) => fields,
            Err(failure) => return assembler.partial(&failure).finish(failure.reason()),
        };

        let reason = check_seal(&self.store, &fields);
        assembler.fields(&fields).finish(reason)
    }

    /// Extraction problems are not the caller's problem: an unreadable or
    /// hostile PDF simply has no text, and so no marker.
    fn extract_or_empty(&self, document: &Path) -> String {
        match self.extractor.extract_first_page(document) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    path = %document.display(),
                    error = %e,
                    "Text extraction failed, treating document as blank"
                );
                String::new()
            }
        }
    }
}

impl<E, S> SealVerifier<E, S>
where
    E: FirstPageExtractor + Send + Sync + 'static,
    S: RiderSealStore + Send + Sync + 'static,
{
    /// Run `verify` on the blocking pool. A worker that dies without a
    /// result yields `not_found`, which callers treat as a system fault.
    pub async fn verify_async(self: Arc<Self>, document: PathBuf) -> VerificationResult {
        let path_for_log = document.clone();
        match tokio::task::spawn_blocking(move || self.verify(&document)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    path = %path_for_log.display(),
                    error = %e,
                    "Seal verification worker did not complete"
                );
                VerificationResult::not_found()
            }
        }
    }
}

/// Seal documents must exist, be regular files, and hold at least one byte.
fn is_nonempty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
