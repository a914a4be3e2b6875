pub mod mapper;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DatabaseTarget;
use crate::models::{
    Appointment, AppointmentFilter, AppointmentView, Doctor, DoctorFilter, Prescription,
};
use crate::schedule::TimeRange;

pub use postgres::PgStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Storage operations behind every endpoint.
///
/// Each call is one auto-committed statement; nothing here spans a
/// transaction. Lookups return `Ok(None)` for a missing row so callers
/// decide how absence is reported.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Round-trip check used at startup.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Ordered by rating descending, then name ascending.
    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, DatabaseError>;

    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, DatabaseError>;

    /// Persist and return the stored row.
    async fn insert_appointment(&self, appointment: &Appointment)
        -> Result<Appointment, DatabaseError>;

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, DatabaseError>;

    /// Ordered by date-time ascending.
    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, DatabaseError>;

    /// A doctor's appointments within `range`, each joined with its
    /// prescription if one exists. Ordered by date-time descending.
    async fn list_doctor_appointments(
        &self,
        doctor_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<AppointmentView>, DatabaseError>;

    async fn insert_prescription(
        &self,
        prescription: &Prescription,
    ) -> Result<Prescription, DatabaseError>;
}

/// Open the configured store and verify it answers.
pub async fn connect(target: &DatabaseTarget) -> Result<Arc<dyn BookingStore>, DatabaseError> {
    let store: Arc<dyn BookingStore> = match target {
        DatabaseTarget::Postgres(options) => {
            tracing::info!(
                host = options.get_host(),
                port = options.get_port(),
                database = options.get_database().unwrap_or_default(),
                user = options.get_username(),
                "Connecting to PostgreSQL"
            );
            Arc::new(PgStore::connect(options.clone()).await?)
        }
        DatabaseTarget::SqliteFile(path) => {
            tracing::info!(path = %path.display(), "Opening SQLite database");
            Arc::new(SqliteStore::open(path)?)
        }
        DatabaseTarget::SqliteMemory => {
            tracing::info!("Opening in-memory SQLite database");
            Arc::new(SqliteStore::open_in_memory()?)
        }
    };

    store.ping().await?;
    tracing::info!("Successfully connected to database");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_opens_memory_store() {
        let store = connect(&DatabaseTarget::SqliteMemory).await.unwrap();
        let doctors = store.list_doctors(&DoctorFilter::default()).await.unwrap();
        assert!(doctors.is_empty());
    }

    #[tokio::test]
    async fn connect_opens_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let target = DatabaseTarget::SqliteFile(dir.path().join("doktolib.db"));
        let store = connect(&target).await.unwrap();
        assert!(store.get_appointment("missing").await.unwrap().is_none());
    }
}
