use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{ReasonCode, SealAuditEntry};
use crate::pipeline::seal::VerificationResult;

/// Persist one verification outcome, stamped now (UTC).
pub fn insert_seal_audit(
    conn: &Connection,
    document: &Path,
    result: &VerificationResult,
) -> Result<i64, DatabaseError> {
    insert_seal_audit_at(conn, document, result, &Utc::now().naive_utc())
}

pub fn insert_seal_audit_at(
    conn: &Connection,
    document: &Path,
    result: &VerificationResult,
    checked_at: &NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO seal_audit (checked_at, document_path, reason, valid, rider_id, seal_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            format_timestamp(checked_at),
            document.to_string_lossy(),
            result.reason.as_str(),
            result.valid as i32,
            result.rider_id,
            result.hash,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent entries first.
pub fn recent_seal_audits(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<SealAuditEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, checked_at, document_path, reason, valid, rider_id, seal_hash
         FROM seal_audit ORDER BY checked_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i32>(4)?,
                row.get::<_, Option<i64>>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, checked_at, document_path, reason, valid, rider_id, seal_hash)| {
            Ok(SealAuditEntry {
                id,
                checked_at: parse_timestamp(&checked_at),
                document_path,
                reason: ReasonCode::from_str(&reason)?,
                valid: valid != 0,
                rider_id,
                seal_hash,
            })
        })
        .collect()
}

/// Prune audit entries older than the given number of days.
pub fn prune_seal_audit(conn: &Connection, retention_days: i64) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM seal_audit WHERE checked_at < datetime('now', ?1)",
        params![format!("-{retention_days} days")],
    )?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::db::open_memory_database;
    use crate::pipeline::seal::{ResultAssembler, SealFields};

    fn ok_result() -> VerificationResult {
        ResultAssembler::new()
            .text("Kinosonik Riders RID:104 SHA256:aabbccddeeff0011")
            .fields(&SealFields {
                rider_id: 104,
                hash: "aabbccddeeff0011".into(),
            })
            .finish(ReasonCode::Ok)
    }

    #[test]
    fn insert_and_read_back() {
        let conn = open_memory_database().unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let id = insert_seal_audit_at(&conn, Path::new("/uploads/rider.pdf"), &ok_result(), &at)
            .unwrap();

        let entries = recent_seal_audits(&conn, 10).unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, id);
        assert_eq!(entry.checked_at, at);
        assert_eq!(entry.document_path, "/uploads/rider.pdf");
        assert_eq!(entry.reason, ReasonCode::Ok);
        assert!(entry.valid);
        assert_eq!(entry.rider_id, Some(104));
        assert_eq!(entry.seal_hash.as_deref(), Some("aabbccddeeff0011"));
    }

    #[test]
    fn absent_fields_stored_as_null() {
        let conn = open_memory_database().unwrap();
        let result = ResultAssembler::new().finish(ReasonCode::NoFile);
        insert_seal_audit(&conn, Path::new("missing.pdf"), &result).unwrap();

        let entry = recent_seal_audits(&conn, 1).unwrap().remove(0);
        assert_eq!(entry.reason, ReasonCode::NoFile);
        assert!(!entry.valid);
        assert!(entry.rider_id.is_none());
        assert!(entry.seal_hash.is_none());
    }

    #[test]
    fn newest_first_and_limited() {
        let conn = open_memory_database().unwrap();
        let base = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        for hour in 0..5 {
            insert_seal_audit_at(
                &conn,
                Path::new(&format!("doc{hour}.pdf")),
                &ok_result(),
                &(base + Duration::hours(hour)),
            )
            .unwrap();
        }

        let entries = recent_seal_audits(&conn, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].document_path, "doc4.pdf");
        assert_eq!(entries[1].document_path, "doc3.pdf");
    }

    #[test]
    fn prune_removes_only_old_entries() {
        let conn = open_memory_database().unwrap();
        let now = Utc::now().naive_utc();
        insert_seal_audit_at(&conn, Path::new("old.pdf"), &ok_result(), &(now - Duration::days(120)))
            .unwrap();
        insert_seal_audit_at(&conn, Path::new("new.pdf"), &ok_result(), &now).unwrap();

        let deleted = prune_seal_audit(&conn, 90).unwrap();
        assert_eq!(deleted, 1);
        let remaining = recent_seal_audits(&conn, 10).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].document_path, "new.pdf");
    }

    #[test]
    fn unknown_reason_in_table_is_invalid_enum() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO seal_audit (checked_at, document_path, reason, valid)
             VALUES ('2026-06-01 00:00:00', 'x.pdf', 'bogus', 0)",
            [],
        )
        .unwrap();
        let err = recent_seal_audits(&conn, 1).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
