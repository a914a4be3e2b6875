use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use super::{repository, BookingStore, DatabaseError};
use crate::models::{
    Appointment, AppointmentFilter, AppointmentView, Doctor, DoctorFilter, Prescription,
};
use crate::schedule::TimeRange;

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;

    // Built-in LOWER() folds ASCII only; "Gynécologue" must match "GYNÉCOLOGUE".
    conn.create_scalar_function(
        "lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| match ctx.get::<Option<String>>(0)? {
            Some(text) => Ok(Some(text.to_lowercase())),
            None => Ok(None),
        },
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}


/// Embedded store for local development and tests.
///
/// One connection behind a mutex; statements run synchronously while the
/// lock is held.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(open_memory_database()?))
    }

    /// Doctors are never written through the API; this seeds them.
    pub fn insert_doctor(&self, doctor: &Doctor) -> Result<(), DatabaseError> {
        repository::insert_doctor(&*self.lock()?, doctor)
    }

    pub fn count_prescriptions(&self) -> Result<i64, DatabaseError> {
        repository::count_prescriptions(&*self.lock()?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.lock()?.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, DatabaseError> {
        repository::list_doctors(&*self.lock()?, filter)
    }

    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, DatabaseError> {
        repository::get_doctor(&*self.lock()?, id)
    }

    async fn insert_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, DatabaseError> {
        repository::insert_appointment(&*self.lock()?, appointment)
    }

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, DatabaseError> {
        repository::get_appointment(&*self.lock()?, id)
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        repository::list_appointments(&*self.lock()?, filter)
    }

    async fn list_doctor_appointments(
        &self,
        doctor_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<AppointmentView>, DatabaseError> {
        repository::list_doctor_appointments(&*self.lock()?, doctor_id, range)
    }

    async fn insert_prescription(
        &self,
        prescription: &Prescription,
    ) -> Result<Prescription, DatabaseError> {
        repository::insert_prescription(&*self.lock()?, prescription)
    }
}
