//! Repository layer: entity-scoped statements for the embedded SQLite store.
//!
//! Free functions over a borrowed `Connection`; `SqliteStore` holds the
//! connection and delegates here.

mod appointment;
mod doctor;
mod prescription;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

pub use appointment::*;
pub use doctor::*;
pub use prescription::*;

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_timestamp_column(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => timestamp_column(row, idx).map(Some),
        None => Ok(None),
    }
}
