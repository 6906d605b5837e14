pub mod types;
pub mod pdftotext;

pub use types::*;
pub use pdftotext::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} timed out after {elapsed_ms}ms")]
    TimedOut { program: String, elapsed_ms: u128 },

    #[error("{program} failed: {status}")]
    ToolFailed { program: String, status: String },
}
