use rusqlite::{params, Connection};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::Rider;

/// Register a rider record. Provisioning only; verification never writes.
pub fn insert_rider(conn: &Connection, rider: &Rider) -> Result<(), DatabaseError> {
    if rider.id <= 0 {
        return Err(DatabaseError::ConstraintViolation(format!(
            "rider id must be positive, got {}",
            rider.id
        )));
    }
    conn.execute(
        "INSERT INTO riders (id_rider, seal_hash, label, registered_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            rider.id,
            rider.seal_hash,
            rider.label,
            format_timestamp(&rider.registered_at),
        ],
    )?;
    Ok(())
}

pub fn get_rider(conn: &Connection, id: i64) -> Result<Option<Rider>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id_rider, seal_hash, label, registered_at FROM riders WHERE id_rider = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| {
        Ok(Rider {
            id: row.get(0)?,
            seal_hash: row.get(1)?,
            label: row.get(2)?,
            registered_at: parse_timestamp(&row.get::<_, String>(3)?),
        })
    });

    match result {
        Ok(rider) => Ok(Some(rider)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The authoritative seal lookup: does rider `id` have `digest` registered?
/// Single exact-match query; the digest comparison ignores case on both sides.
pub fn seal_registered(conn: &Connection, id: i64, digest: &str) -> Result<bool, DatabaseError> {
    let found = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM riders WHERE id_rider = ?1 AND LOWER(seal_hash) = LOWER(?2)
         )",
        params![id, digest],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(found)
}
