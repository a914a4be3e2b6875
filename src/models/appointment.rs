use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Prescription;

/// Status every booking is persisted with.
pub const STATUS_CONFIRMED: &str = "confirmed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An appointment with the prescription issued for it, if any.
/// Only the doctor-facing listing returns this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Prescription>,
}

/// Body of `POST /appointments`.
///
/// Fields default to their zero value so that a missing key and an
/// empty one are reported the same way by [`Self::first_missing_field`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAppointmentRequest {
    pub doctor_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub date_time: String,
    pub duration_minutes: i32,
}

impl CreateAppointmentRequest {
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.doctor_id.is_empty() {
            Some("doctor_id")
        } else if self.patient_name.is_empty() {
            Some("patient_name")
        } else if self.patient_email.is_empty() {
            Some("patient_email")
        } else if self.date_time.is_empty() {
            Some("date_time")
        } else if self.duration_minutes == 0 {
            Some("duration_minutes")
        } else {
            None
        }
    }
}
