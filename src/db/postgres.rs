//! PostgreSQL store, the production backend.
//!
//! The schema is provisioned outside this service. Identifier columns are
//! read through `::text` and `rating` through `::float8`, so UUID or
//! NUMERIC column types map onto the string and `f64` fields unchanged.
//! Identifiers are written through [`IdParam`] for the same reason.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::mapper::AppointmentPrescriptionRow;
use super::query::{contains_pattern, Placeholder, QueryBuilder, SqlValue};
use super::{BookingStore, DatabaseError};
use crate::models::{
    Appointment, AppointmentFilter, AppointmentView, Doctor, DoctorFilter, Prescription,
};
use crate::schedule::TimeRange;

const DOCTOR_SELECT: &str = "SELECT id::text AS id, name, specialty, location,
        rating::float8 AS rating, price_per_hour, avatar, experience_years, languages
     FROM doctors";

const APPOINTMENT_SELECT: &str = "SELECT a.id::text AS id, a.doctor_id::text AS doctor_id,
        a.patient_name, a.patient_email, a.date_time, a.duration_minutes, a.status, a.created_at
     FROM appointments a";

const APPOINTMENT_VIEW_SELECT: &str = "SELECT a.id::text AS id, a.doctor_id::text AS doctor_id,
        a.patient_name, a.patient_email, a.date_time, a.duration_minutes, a.status, a.created_at,
        p.id::text AS prescription_id, p.medications, p.dosage, p.instructions,
        p.created_at AS prescription_created_at
     FROM appointments a
     LEFT JOIN prescriptions p ON a.id = p.appointment_id";

const APPOINTMENT_RETURNING: &str = "id::text AS id, doctor_id::text AS doctor_id,
        patient_name, patient_email, date_time, duration_minutes, status, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the shared pool. Pool sizing and saturation behavior are the
    /// sqlx defaults.
    pub async fn connect(options: PgConnectOptions) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }
}

fn bind_all<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    values.into_iter().fold(query, |query, value| match value {
        SqlValue::Text(text) => query.bind(text),
        SqlValue::Timestamp(at) => query.bind(at),
    })
}

/// An identifier bound with the type its text spells.
///
/// sqlx types every parameter, and Postgres will not assign a `text`
/// parameter to a `uuid` or integer column. A `uuid` or `int8` parameter
/// still assigns to a text column, so binding the narrowest type fits
/// whichever column type the schema uses.
#[derive(Debug, PartialEq)]
enum IdParam {
    Uuid(Uuid),
    Int(i64),
    Text(String),
}

impl IdParam {
    fn new(id: &str) -> Self {
        if let Ok(uuid) = Uuid::parse_str(id) {
            IdParam::Uuid(uuid)
        } else if let Ok(n) = id.parse::<i64>() {
            IdParam::Int(n)
        } else {
            IdParam::Text(id.to_string())
        }
    }
}

fn bind_id<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    id: &str,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match IdParam::new(id) {
        IdParam::Uuid(uuid) => query.bind(uuid),
        IdParam::Int(n) => query.bind(n),
        IdParam::Text(text) => query.bind(text),
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, DatabaseError> {
        let (sql, values) = QueryBuilder::new(DOCTOR_SELECT, Placeholder::Dollar)
            .filter_opt(
                "LOWER(specialty) LIKE LOWER({})",
                filter.specialty.as_deref().map(contains_pattern),
            )
            .filter_opt(
                "LOWER(location) LIKE LOWER({})",
                filter.location.as_deref().map(contains_pattern),
            )
            .order_by("rating DESC, name ASC")
            .build();

        let doctors = bind_all(sqlx::query_as::<_, Doctor>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        Ok(doctors)
    }

    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, DatabaseError> {
        let doctor = sqlx::query_as::<_, Doctor>(&format!("{DOCTOR_SELECT} WHERE id::text = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn insert_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, DatabaseError> {
        let sql = format!(
            "INSERT INTO appointments
                (id, doctor_id, patient_name, patient_email, date_time, duration_minutes, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {APPOINTMENT_RETURNING}"
        );
        let query = bind_id(sqlx::query_as::<_, Appointment>(&sql), &appointment.id);
        let stored = bind_id(query, &appointment.doctor_id)
            .bind(&appointment.patient_name)
            .bind(&appointment.patient_email)
            .bind(appointment.date_time)
            .bind(appointment.duration_minutes)
            .bind(&appointment.status)
            .bind(appointment.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, DatabaseError> {
        let appointment =
            sqlx::query_as::<_, Appointment>(&format!("{APPOINTMENT_SELECT} WHERE a.id::text = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let (sql, values) = QueryBuilder::new(APPOINTMENT_SELECT, Placeholder::Dollar)
            .filter_opt(
                "a.doctor_id::text = {}",
                filter.doctor_id.clone().map(SqlValue::Text),
            )
            .order_by("a.date_time ASC")
            .build();

        let appointments = bind_all(sqlx::query_as::<_, Appointment>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        Ok(appointments)
    }

    async fn list_doctor_appointments(
        &self,
        doctor_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<AppointmentView>, DatabaseError> {
        let (sql, values) = QueryBuilder::new(APPOINTMENT_VIEW_SELECT, Placeholder::Dollar)
            .filter("a.doctor_id::text = {}", SqlValue::Text(doctor_id.to_string()))
            .within(range, "a.date_time >= {}", "a.date_time < {}")
            .order_by("a.date_time DESC")
            .build();

        let rows = bind_all(sqlx::query_as::<_, AppointmentPrescriptionRow>(&sql), values)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AppointmentPrescriptionRow::into_view).collect())
    }

    async fn insert_prescription(
        &self,
        prescription: &Prescription,
    ) -> Result<Prescription, DatabaseError> {
        let query = sqlx::query_as::<_, Prescription>(
            "INSERT INTO prescriptions
                (id, appointment_id, doctor_id, patient_name, medications, dosage, instructions, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id::text AS id, appointment_id::text AS appointment_id,
                doctor_id::text AS doctor_id, patient_name, medications, dosage,
                COALESCE(instructions, '') AS instructions, created_at",
        );
        let query = bind_id(query, &prescription.id);
        let query = bind_id(query, &prescription.appointment_id);
        let stored = bind_id(query, &prescription.doctor_id)
            .bind(&prescription.patient_name)
            .bind(&prescription.medications)
            .bind(&prescription.dosage)
            .bind(&prescription.instructions)
            .bind(prescription.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::STATUS_CONFIRMED;

    #[test]
    fn id_param_picks_the_narrowest_type() {
        let uuid = "7d0b4a4e-2f7e-4c47-9f1a-0c6f2b1e8d35";
        assert_eq!(IdParam::new(uuid), IdParam::Uuid(Uuid::parse_str(uuid).unwrap()));
        assert_eq!(IdParam::new("42"), IdParam::Int(42));
        assert_eq!(IdParam::new("doc-1"), IdParam::Text("doc-1".into()));
        assert_eq!(IdParam::new(""), IdParam::Text(String::new()));
    }

    // Live tests: `DATABASE_URL=postgres://... cargo test -- --ignored`.
    // Tables are TEMPORARY on a single-connection pool, so they shadow any
    // real schema and vanish with the session.

    async fn pool_with_schema(id_type: &str) -> Option<PgStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();

        let default_id = if id_type == "UUID" {
            "DEFAULT gen_random_uuid()"
        } else {
            ""
        };
        let statements = [
            format!(
                "CREATE TEMPORARY TABLE doctors (
                    id {id_type} PRIMARY KEY {default_id},
                    name TEXT NOT NULL, specialty TEXT NOT NULL, location TEXT NOT NULL,
                    rating NUMERIC(2,1) NOT NULL, price_per_hour INTEGER NOT NULL,
                    avatar TEXT NOT NULL, experience_years INTEGER NOT NULL,
                    languages TEXT NOT NULL)"
            ),
            format!(
                "CREATE TEMPORARY TABLE appointments (
                    id {id_type} PRIMARY KEY,
                    doctor_id {id_type} NOT NULL REFERENCES doctors(id),
                    patient_name TEXT NOT NULL, patient_email TEXT NOT NULL,
                    date_time TIMESTAMPTZ NOT NULL, duration_minutes INTEGER NOT NULL,
                    status TEXT NOT NULL, created_at TIMESTAMPTZ NOT NULL)"
            ),
            format!(
                "CREATE TEMPORARY TABLE prescriptions (
                    id {id_type} PRIMARY KEY,
                    appointment_id {id_type} NOT NULL REFERENCES appointments(id),
                    doctor_id {id_type} NOT NULL REFERENCES doctors(id),
                    patient_name TEXT NOT NULL, medications TEXT NOT NULL,
                    dosage TEXT NOT NULL, instructions TEXT,
                    created_at TIMESTAMPTZ NOT NULL)"
            ),
        ];
        for sql in &statements {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        Some(PgStore { pool })
    }

    /// Insert through a literal id so the column type decides the cast.
    async fn insert_doctor(store: &PgStore, id: Option<&str>) -> String {
        let (columns, values) = match id {
            Some(id) => ("id, ".to_string(), format!("'{id}', ")),
            None => (String::new(), String::new()),
        };
        let sql = format!(
            "INSERT INTO doctors ({columns}name, specialty, location, rating,
                price_per_hour, avatar, experience_years, languages)
             VALUES ({values}'Dr. Élise Lefèvre', 'Gynécologue', 'Créteil', 4.6,
                90, 'https://example.com/a.jpg', 12, 'French')
             RETURNING id::text"
        );
        sqlx::query_scalar::<_, String>(&sql)
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2099, 3, 14, hour, 0, 0).unwrap()
    }

    fn appointment(id: String, doctor_id: &str) -> Appointment {
        Appointment {
            id,
            doctor_id: doctor_id.to_string(),
            patient_name: "Jeanne Moreau".into(),
            patient_email: "jeanne@example.com".into(),
            date_time: at(10),
            duration_minutes: 30,
            status: STATUS_CONFIRMED.into(),
            created_at: at(8),
        }
    }

    fn prescription(id: String, appointment: &Appointment) -> Prescription {
        Prescription {
            id,
            appointment_id: appointment.id.clone(),
            doctor_id: appointment.doctor_id.clone(),
            patient_name: appointment.patient_name.clone(),
            medications: "Amoxicillin".into(),
            dosage: "500mg twice daily".into(),
            instructions: String::new(),
            created_at: at(11),
        }
    }

    async fn booking_round_trip(
        store: &PgStore,
        doctor_id: &str,
        appointment_id: String,
        prescription_id: String,
    ) {
        let filter = DoctorFilter::new(Some("gynéco".into()), Some("créteil".into()));
        let found = store.list_doctors(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, doctor_id);
        assert_eq!(found[0].rating, 4.6);

        let booked = appointment(appointment_id, doctor_id);
        let stored = store.insert_appointment(&booked).await.unwrap();
        assert_eq!(stored, booked);
        assert_eq!(store.get_appointment(&booked.id).await.unwrap(), Some(booked.clone()));

        let issued = prescription(prescription_id, &booked);
        assert_eq!(store.insert_prescription(&issued).await.unwrap(), issued);

        let views = store
            .list_doctor_appointments(doctor_id, &TimeRange::unbounded())
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].appointment, booked);
        assert_eq!(views[0].prescription.as_ref(), Some(&issued));
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
    async fn uuid_columns_accept_writes_and_reads() {
        let Some(store) = pool_with_schema("UUID").await else {
            return;
        };
        let doctor_id = insert_doctor(&store, None).await;
        booking_round_trip(
            &store,
            &doctor_id,
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
        )
        .await;
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
    async fn text_columns_accept_any_id_shape() {
        let Some(store) = pool_with_schema("TEXT").await else {
            return;
        };
        let doctor_id = insert_doctor(&store, Some("doc-1")).await;
        // A UUID-shaped and an integer-shaped id still land in text columns.
        booking_round_trip(&store, &doctor_id, Uuid::new_v4().to_string(), "42".into()).await;
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
    async fn bigint_columns_accept_numeric_ids() {
        let Some(store) = pool_with_schema("BIGINT").await else {
            return;
        };
        let doctor_id = insert_doctor(&store, Some("7")).await;
        booking_round_trip(&store, &doctor_id, "1001".into(), "2001".into()).await;
    }
}
