use rusqlite::{params, Connection, Row};

use super::timestamp_column;
use crate::db::query::sqlite_timestamp;
use crate::db::DatabaseError;
use crate::models::Prescription;

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        doctor_id: row.get(2)?,
        patient_name: row.get(3)?,
        medications: row.get(4)?,
        dosage: row.get(5)?,
        instructions: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: timestamp_column(row, 7)?,
    })
}

pub fn insert_prescription(
    conn: &Connection,
    prescription: &Prescription,
) -> Result<Prescription, DatabaseError> {
    let stored = conn.query_row(
        "INSERT INTO prescriptions
            (id, appointment_id, doctor_id, patient_name, medications, dosage, instructions, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         RETURNING id, appointment_id, doctor_id, patient_name, medications, dosage,
                   instructions, created_at",
        params![
            prescription.id,
            prescription.appointment_id,
            prescription.doctor_id,
            prescription.patient_name,
            prescription.medications,
            prescription.dosage,
            prescription.instructions,
            sqlite_timestamp(&prescription.created_at),
        ],
        prescription_from_row,
    )?;
    Ok(stored)
}

pub fn count_prescriptions(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))?;
    Ok(count)
}
