//! `rider-seal` command line.
//!
//! `verify` prints one JSON line per document and folds the outcomes into
//! the process exit code. `register` provisions an authoritative record.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{self, SealConfig};
use crate::db;
use crate::models::Rider;
use crate::pipeline::seal::{SqliteSealVerifier, VerificationResult};

/// Every document carries a valid seal.
pub const EXIT_ALL_VALID: u8 = 0;
/// At least one document is unsealed or carries a seal nobody registered.
pub const EXIT_INVALID: u8 = 1;
/// At least one verification hit a store or worker fault.
pub const EXIT_SYSTEM_FAULT: u8 = 2;
/// Bad arguments, bad environment, or an unusable database.
pub const EXIT_STARTUP: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "rider-seal", version)]
#[command(about = "Verify Kinosonik rider seals on PDF documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the seal on one or more PDF documents
    Verify(VerifyArgs),

    /// Register an authoritative rider record
    Register(RegisterArgs),
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// PDF documents to verify
    #[arg(required = true, num_args = 1..)]
    pub documents: Vec<PathBuf>,

    /// Riders database (defaults to RIDER_SEAL_DB, then the data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Extraction time limit per document, in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Record every outcome in the seal audit table
    #[arg(long)]
    pub audit: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Rider identifier
    #[arg(value_parser = clap::value_parser!(i64).range(1..))]
    pub id: i64,

    /// Seal digest, at least 16 hex characters
    #[arg(value_parser = parse_digest)]
    pub hash: String,

    /// Free-form label for operators
    #[arg(long)]
    pub label: Option<String>,

    /// Riders database (defaults to RIDER_SEAL_DB, then the data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

/// One line of `verify` output.
#[derive(Serialize, Debug)]
struct Report<'a> {
    document: &'a Path,
    #[serde(flatten)]
    result: &'a VerificationResult,
}

fn parse_digest(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.len() < 16 {
        return Err(format!("digest must be at least 16 hex characters, got {}", raw.len()));
    }
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("digest must contain hex characters only".into());
    }
    Ok(raw.to_ascii_lowercase())
}

/// Exit status for a batch: faults outrank invalid seals.
pub fn exit_code_for(results: &[VerificationResult]) -> u8 {
    if results.iter().any(|r| r.reason.is_system_fault()) {
        EXIT_SYSTEM_FAULT
    } else if results.iter().any(|r| !r.valid) {
        EXIT_INVALID
    } else {
        EXIT_ALL_VALID
    }
}

/// Parse arguments, load configuration and dispatch. Returns the exit code.
pub fn run() -> u8 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_STARTUP } else { EXIT_ALL_VALID };
        }
    };

    let config = match SealConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("rider-seal: {e}");
            return EXIT_STARTUP;
        }
    };

    match cli.command {
        Commands::Verify(args) => {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to start async runtime");
                    return EXIT_STARTUP;
                }
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            runtime.block_on(verify(args, config, &mut out))
        }
        Commands::Register(args) => register(args, &config),
    }
}

/// Run `verify`. Documents are checked concurrently; output keeps argument order.
pub async fn verify<W: Write>(args: VerifyArgs, mut config: SealConfig, out: &mut W) -> u8 {
    if let Some(db) = args.db {
        config.database_path = db;
    }
    if let Some(ms) = args.timeout_ms {
        config.extract_timeout = Duration::from_millis(ms);
    }

    let audit_conn = if args.audit {
        match db::open_database(&config.database_path) {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::error!(
                    path = %config.database_path.display(),
                    error = %e,
                    "Cannot open database for auditing"
                );
                eprintln!("rider-seal: {e}");
                return EXIT_STARTUP;
            }
        }
    } else {
        None
    };

    tracing::info!(
        documents = args.documents.len(),
        db = %config.database_path.display(),
        timeout_ms = config.extract_timeout.as_millis() as u64,
        "Verifying rider seals"
    );

    let verifier = Arc::new(SqliteSealVerifier::from_config(&config));
    let handles: Vec<_> = args
        .documents
        .iter()
        .map(|doc| tokio::spawn(Arc::clone(&verifier).verify_async(doc.clone())))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Verification task failed");
            VerificationResult::not_found()
        }));
    }

    for (document, result) in args.documents.iter().zip(&results) {
        result.log_outcome(document);
        if let Some(conn) = &audit_conn {
            if let Err(e) = db::insert_seal_audit(conn, document, result) {
                tracing::warn!(path = %document.display(), error = %e, "Audit write failed");
            }
        }
        let report = Report { document, result };
        let written = serde_json::to_writer(&mut *out, &report)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to write report");
            return EXIT_SYSTEM_FAULT;
        }
    }

    exit_code_for(&results)
}

/// Run `register`.
pub fn register(args: RegisterArgs, config: &SealConfig) -> u8 {
    let db_path = args.db.unwrap_or_else(|| config.database_path.clone());
    let rider = Rider {
        id: args.id,
        seal_hash: args.hash,
        label: args.label,
        registered_at: Utc::now().naive_utc(),
    };

    let outcome = db::open_database(&db_path).and_then(|conn| db::insert_rider(&conn, &rider));
    match outcome {
        Ok(()) => {
            tracing::info!(
                rider_id = rider.id,
                db = %db_path.display(),
                "Rider registered"
            );
            EXIT_ALL_VALID
        }
        Err(e) => {
            tracing::error!(rider_id = rider.id, error = %e, "Rider registration failed");
            eprintln!("{}: {e}", config::APP_NAME);
            EXIT_SYSTEM_FAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReasonCode;

    fn result(reason: ReasonCode) -> VerificationResult {
        VerificationResult {
            valid: reason.is_valid(),
            rider_id: None,
            hash: None,
            found_text: String::new(),
            reason,
        }
    }

    fn test_config(dir: &Path) -> SealConfig {
        SealConfig {
            database_path: dir.join("riders.sqlite3"),
            ..SealConfig::default()
        }
    }

    #[test]
    fn parses_verify_command() {
        let cli = Cli::try_parse_from([
            "rider-seal",
            "verify",
            "a.pdf",
            "b.pdf",
            "--db",
            "/tmp/r.sqlite3",
            "--timeout-ms",
            "2500",
            "--audit",
        ])
        .unwrap();
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.documents, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert_eq!(args.db, Some(PathBuf::from("/tmp/r.sqlite3")));
        assert_eq!(args.timeout_ms, Some(2500));
        assert!(args.audit);
    }

    #[test]
    fn verify_requires_a_document() {
        assert!(Cli::try_parse_from(["rider-seal", "verify"]).is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["rider-seal", "verify", "a.pdf", "--timeout-ms", "0"]).is_err());
    }

    #[test]
    fn register_validates_arguments() {
        let cli = Cli::try_parse_from([
            "rider-seal",
            "register",
            "104",
            "AABBCCDDEEFF0011",
            "--label",
            "Summer tour",
        ])
        .unwrap();
        let Commands::Register(args) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.id, 104);
        assert_eq!(args.hash, "aabbccddeeff0011");
        assert_eq!(args.label.as_deref(), Some("Summer tour"));

        assert!(Cli::try_parse_from(["rider-seal", "register", "0", "aabbccddeeff0011"]).is_err());
        assert!(Cli::try_parse_from(["rider-seal", "register", "104", "aabb"]).is_err());
        assert!(
            Cli::try_parse_from(["rider-seal", "register", "104", "zzbbccddeeff0011"]).is_err()
        );
    }

    #[test]
    fn exit_code_ranks_faults_over_invalid() {
        assert_eq!(exit_code_for(&[result(ReasonCode::Ok)]), EXIT_ALL_VALID);
        assert_eq!(
            exit_code_for(&[result(ReasonCode::Ok), result(ReasonCode::NoMarker)]),
            EXIT_INVALID
        );
        assert_eq!(
            exit_code_for(&[result(ReasonCode::NoMatch), result(ReasonCode::DbError)]),
            EXIT_SYSTEM_FAULT
        );
        assert_eq!(exit_code_for(&[result(ReasonCode::NotFound)]), EXIT_SYSTEM_FAULT);
    }

    #[test]
    fn register_writes_rider() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let args = RegisterArgs {
            id: 104,
            hash: "aabbccddeeff0011".into(),
            label: Some("tour".into()),
            db: None,
        };
        assert_eq!(register(args, &config), EXIT_ALL_VALID);

        let conn = db::open_database(&config.database_path).unwrap();
        let rider = db::get_rider(&conn, 104).unwrap().unwrap();
        assert_eq!(rider.seal_hash, "aabbccddeeff0011");
        assert_eq!(rider.label.as_deref(), Some("tour"));
    }

    #[test]
    fn duplicate_registration_is_a_fault() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let args = || RegisterArgs {
            id: 104,
            hash: "aabbccddeeff0011".into(),
            label: None,
            db: None,
        };
        assert_eq!(register(args(), &config), EXIT_ALL_VALID);
        assert_eq!(register(args(), &config), EXIT_SYSTEM_FAULT);
    }

    #[tokio::test]
    async fn verify_reports_missing_file_and_audits() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let missing = dir.path().join("absent.pdf");
        let args = VerifyArgs {
            documents: vec![missing.clone()],
            db: None,
            timeout_ms: Some(1000),
            audit: true,
        };

        let mut out = Vec::new();
        let code = verify(args, config.clone(), &mut out).await;
        assert_eq!(code, EXIT_INVALID);

        let line = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(json["reason"], "no_file");
        assert_eq!(json["valid"], false);
        assert_eq!(json["document"], missing.to_string_lossy().as_ref());

        let conn = db::open_database(&config.database_path).unwrap();
        let audits = db::recent_seal_audits(&conn, 10).unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].reason, ReasonCode::NoFile);
    }

    #[tokio::test]
    async fn verify_without_audit_creates_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let args = VerifyArgs {
            documents: vec![dir.path().join("a.pdf"), dir.path().join("b.pdf")],
            db: None,
            timeout_ms: None,
            audit: false,
        };

        let mut out = Vec::new();
        assert_eq!(verify(args, config.clone(), &mut out).await, EXIT_INVALID);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
        assert!(!config.database_path.exists());
    }
}
