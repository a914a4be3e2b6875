//! Booking rules: turn validated requests into records ready to persist.
//!
//! Appointments: every field present, `date_time` in the exact
//! `YYYY-MM-DDTHH:MM:SSZ` shape, and not before the current instant.
//! No availability or doctor-existence check is made here.
//!
//! Prescriptions: copy `doctor_id` and `patient_name` from the looked-up
//! appointment; the caller never supplies them.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Appointment, CreateAppointmentRequest, CreatePrescriptionRequest, Prescription,
    STATUS_CONFIRMED,
};

// ─── Types ────────────────────────────────────────────────────────────────────

/// Accepted booking timestamp layout (UTC, second precision).
pub const BOOKING_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One `0` per digit; every other byte must match literally.
const BOOKING_DATE_SHAPE: &[u8] = b"0000-00-00T00:00:00Z";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid date format")]
    InvalidDateFormat,
    #[error("Cannot book appointments in the past")]
    InThePast,
}

// ─── Appointments ─────────────────────────────────────────────────────────────

/// Parse a booking timestamp. Chrono alone accepts single-digit fields and
/// five-digit years, so the byte shape is checked first.
pub fn parse_booking_time(raw: &str) -> Result<DateTime<Utc>, BookingError> {
    let shaped = raw.len() == BOOKING_DATE_SHAPE.len()
        && raw
            .bytes()
            .zip(BOOKING_DATE_SHAPE)
            .all(|(c, &s)| if s == b'0' { c.is_ascii_digit() } else { c == s });

    if !shaped {
        return Err(BookingError::InvalidDateFormat);
    }

    NaiveDateTime::parse_from_str(raw, BOOKING_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| BookingError::InvalidDateFormat)
}

/// Build the appointment row for a booking request made at `now`.
pub fn prepare_appointment(
    request: CreateAppointmentRequest,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    if let Some(field) = request.first_missing_field() {
        return Err(BookingError::MissingField(field));
    }

    let date_time = parse_booking_time(&request.date_time)?;
    if date_time < now {
        return Err(BookingError::InThePast);
    }

    Ok(Appointment {
        id: Uuid::new_v4().to_string(),
        doctor_id: request.doctor_id,
        patient_name: request.patient_name,
        patient_email: request.patient_email,
        date_time,
        duration_minutes: request.duration_minutes,
        status: STATUS_CONFIRMED.to_string(),
        created_at: now,
    })
}

// ─── Prescriptions ────────────────────────────────────────────────────────────

pub fn check_prescription_request(request: &CreatePrescriptionRequest) -> Result<(), BookingError> {
    match request.first_missing_field() {
        Some(field) => Err(BookingError::MissingField(field)),
        None => Ok(()),
    }
}

/// Build the prescription row for `appointment`. Doctor and patient come
/// from the appointment, not from the request.
pub fn prepare_prescription(
    request: CreatePrescriptionRequest,
    appointment: &Appointment,
    now: DateTime<Utc>,
) -> Prescription {
    Prescription {
        id: Uuid::new_v4().to_string(),
        appointment_id: appointment.id.clone(),
        doctor_id: appointment.doctor_id.clone(),
        patient_name: appointment.patient_name.clone(),
        medications: request.medications,
        dosage: request.dosage,
        instructions: request.instructions.unwrap_or_default(),
        created_at: now,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
