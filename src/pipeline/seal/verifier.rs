use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use super::types::SealFields;
use crate::db::{self, DatabaseError};
use crate::models::ReasonCode;

/// Read-only capability over the authoritative rider records.
///
/// Exactly one exact-match lookup per verification: no wildcards, no
/// prefix matching, digest compared without regard to case.
pub trait RiderSealStore {
    fn seal_registered(&self, rider_id: i64, digest: &str) -> Result<bool, DatabaseError>;
}

/// A connection owned by the host application.
impl RiderSealStore for Connection {
    fn seal_registered(&self, rider_id: i64, digest: &str) -> Result<bool, DatabaseError> {
        db::seal_registered(self, rider_id, digest)
    }
}

impl<T: RiderSealStore + ?Sized> RiderSealStore for &T {
    fn seal_registered(&self, rider_id: i64, digest: &str) -> Result<bool, DatabaseError> {
        (**self).seal_registered(rider_id, digest)
    }
}

impl<T: RiderSealStore + ?Sized> RiderSealStore for Arc<T> {
    fn seal_registered(&self, rider_id: i64, digest: &str) -> Result<bool, DatabaseError> {
        (**self).seal_registered(rider_id, digest)
    }
}

/// Store backed by a SQLite file. Every lookup opens its own read-only
/// connection, so concurrent verifications share no handle.
#[derive(Debug, Clone)]
pub struct SqliteRiderStore {
    db_path: PathBuf,
}

impl SqliteRiderStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl RiderSealStore for SqliteRiderStore {
    fn seal_registered(&self, rider_id: i64, digest: &str) -> Result<bool, DatabaseError> {
        let conn = db::open_readonly_database(&self.db_path)?;
        db::seal_registered(&conn, rider_id, digest)
    }
}

/// Check parsed fields against the store. Store failures are logged here
/// and come back as `DbError`; they never propagate.
pub fn check_seal<S: RiderSealStore + ?Sized>(store: &S, fields: &SealFields) -> ReasonCode {
    match store.seal_registered(fields.rider_id, &fields.hash) {
        Ok(true) => ReasonCode::Ok,
        Ok(false) => ReasonCode::NoMatch,
        Err(e) => {
            tracing::error!(
                rider_id = fields.rider_id,
                error = %e,
                "Rider record lookup failed"
            );
            ReasonCode::DbError
        }
    }
}
