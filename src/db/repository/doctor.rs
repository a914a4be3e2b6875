use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::db::query::{contains_pattern, Placeholder, QueryBuilder};
use crate::db::DatabaseError;
use crate::models::{Doctor, DoctorFilter};

const DOCTOR_SELECT: &str = "SELECT id, name, specialty, location, rating, price_per_hour,
        avatar, experience_years, languages
     FROM doctors";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        location: row.get(3)?,
        rating: row.get(4)?,
        price_per_hour: row.get(5)?,
        avatar: row.get(6)?,
        experience_years: row.get(7)?,
        languages: row.get(8)?,
    })
}

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, specialty, location, rating, price_per_hour, avatar,
                              experience_years, languages)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doctor.id,
            doctor.name,
            doctor.specialty,
            doctor.location,
            doctor.rating,
            doctor.price_per_hour,
            doctor.avatar,
            doctor.experience_years,
            doctor.languages,
        ],
    )?;
    Ok(())
}

pub fn list_doctors(conn: &Connection, filter: &DoctorFilter) -> Result<Vec<Doctor>, DatabaseError> {
    let (sql, values) = QueryBuilder::new(DOCTOR_SELECT, Placeholder::Question)
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

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), doctor_from_row)?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(row?);
    }
    Ok(doctors)
}

pub fn get_doctor(conn: &Connection, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("{DOCTOR_SELECT} WHERE id = ?1"),
            params![id],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}
