use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "rider-seal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default wall-clock budget for one `pdftotext` run.
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(15);

/// Page-one text beyond this size is never read back from the extractor.
pub const DEFAULT_MAX_TEXT_BYTES: u64 = 1024 * 1024;

pub const ENV_PDFTOTEXT: &str = "RIDER_SEAL_PDFTOTEXT";
pub const ENV_TIMEOUT_MS: &str = "RIDER_SEAL_TIMEOUT_MS";
pub const ENV_MAX_TEXT_BYTES: &str = "RIDER_SEAL_MAX_TEXT_BYTES";
pub const ENV_SCRATCH_DIR: &str = "RIDER_SEAL_SCRATCH_DIR";
pub const ENV_DATABASE: &str = "RIDER_SEAL_DB";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotAPositiveInteger { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Get the application data directory.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kinosonik")
}

/// Default location of the riders database
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("riders.sqlite3")
}

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "rider_seal=info,warn"
}

/// Runtime settings for the seal verifier and its extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SealConfig {
    /// Program invoked for first-page extraction. Resolved through `PATH`
    /// unless absolute.
    pub pdftotext_program: PathBuf,
    pub extract_timeout: Duration,
    pub max_text_bytes: u64,
    /// Where extractor output files are created. System temp dir if unset.
    pub scratch_dir: Option<PathBuf>,
    pub database_path: PathBuf,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            pdftotext_program: PathBuf::from("pdftotext"),
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
            scratch_dir: None,
            database_path: default_database_path(),
        }
    }
}

impl SealConfig {
    /// Build a config from `RIDER_SEAL_*` environment variables.
    /// Unset variables keep their defaults; malformed ones are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(program) = lookup(ENV_PDFTOTEXT) {
            config.pdftotext_program = non_empty_path(ENV_PDFTOTEXT, program)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.extract_timeout = Duration::from_millis(positive_u64(ENV_TIMEOUT_MS, raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_TEXT_BYTES) {
            config.max_text_bytes = positive_u64(ENV_MAX_TEXT_BYTES, raw)?;
        }
        if let Some(dir) = lookup(ENV_SCRATCH_DIR) {
            config.scratch_dir = Some(non_empty_path(ENV_SCRATCH_DIR, dir)?);
        }
        if let Some(db) = lookup(ENV_DATABASE) {
            config.database_path = non_empty_path(ENV_DATABASE, db)?;
        }

        Ok(config)
    }
}

fn positive_u64(var: &'static str, raw: String) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::NotAPositiveInteger { var, value: raw }),
    }
}

fn non_empty_path(var: &'static str, raw: String) -> Result<PathBuf, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(PathBuf::from(raw))
}
