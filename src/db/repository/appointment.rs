use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{optional_timestamp_column, timestamp_column};
use crate::db::mapper::AppointmentPrescriptionRow;
use crate::db::query::{sqlite_timestamp, Placeholder, QueryBuilder, SqlValue};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentFilter, AppointmentView};
use crate::schedule::TimeRange;

const APPOINTMENT_RETURNING: &str = "id, doctor_id, patient_name, patient_email,
        date_time, duration_minutes, status, created_at";

const APPOINTMENT_SELECT: &str = "SELECT a.id, a.doctor_id, a.patient_name, a.patient_email,
        a.date_time, a.duration_minutes, a.status, a.created_at
     FROM appointments a";

const APPOINTMENT_VIEW_SELECT: &str = "SELECT a.id, a.doctor_id, a.patient_name, a.patient_email,
        a.date_time, a.duration_minutes, a.status, a.created_at,
        p.id, p.medications, p.dosage, p.instructions, p.created_at
     FROM appointments a
     LEFT JOIN prescriptions p ON a.id = p.appointment_id";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_name: row.get(2)?,
        patient_email: row.get(3)?,
        date_time: timestamp_column(row, 4)?,
        duration_minutes: row.get(5)?,
        status: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

fn view_row_from_row(row: &Row<'_>) -> rusqlite::Result<AppointmentPrescriptionRow> {
    Ok(AppointmentPrescriptionRow {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_name: row.get(2)?,
        patient_email: row.get(3)?,
        date_time: timestamp_column(row, 4)?,
        duration_minutes: row.get(5)?,
        status: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
        prescription_id: row.get(8)?,
        medications: row.get(9)?,
        dosage: row.get(10)?,
        instructions: row.get(11)?,
        prescription_created_at: optional_timestamp_column(row, 12)?,
    })
}

pub fn insert_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> Result<Appointment, DatabaseError> {
    let stored = conn.query_row(
        &format!(
            "INSERT INTO appointments
                (id, doctor_id, patient_name, patient_email, date_time, duration_minutes, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {APPOINTMENT_RETURNING}"
        ),
        params![
            appointment.id,
            appointment.doctor_id,
            appointment.patient_name,
            appointment.patient_email,
            sqlite_timestamp(&appointment.date_time),
            appointment.duration_minutes,
            appointment.status,
            sqlite_timestamp(&appointment.created_at),
        ],
        appointment_from_row,
    )?;
    Ok(stored)
}

pub fn get_appointment(conn: &Connection, id: &str) -> Result<Option<Appointment>, DatabaseError> {
    let appointment = conn
        .query_row(
            &format!("{APPOINTMENT_SELECT} WHERE a.id = ?1"),
            params![id],
            appointment_from_row,
        )
        .optional()?;
    Ok(appointment)
}

pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, DatabaseError> {
    let (sql, values) = QueryBuilder::new(APPOINTMENT_SELECT, Placeholder::Question)
        .filter_opt("a.doctor_id = {}", filter.doctor_id.clone().map(SqlValue::Text))
        .order_by("a.date_time ASC")
        .build();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), appointment_from_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn list_doctor_appointments(
    conn: &Connection,
    doctor_id: &str,
    range: &TimeRange,
) -> Result<Vec<AppointmentView>, DatabaseError> {
    let (sql, values) = QueryBuilder::new(APPOINTMENT_VIEW_SELECT, Placeholder::Question)
        .filter("a.doctor_id = {}", SqlValue::Text(doctor_id.to_string()))
        .within(range, "a.date_time >= {}", "a.date_time < {}")
        .order_by("a.date_time DESC")
        .build();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), view_row_from_row)?;

    let mut views = Vec::new();
    for row in rows {
        views.push(row?.into_view());
    }
    Ok(views)
}
