//! Row shape of the appointment ⟕ prescription join.
//!
//! The prescription side of a `LEFT JOIN` is all-NULL when no prescription
//! references the appointment. The view carries `Some(prescription)` only
//! when the joined id column is non-null.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::{Appointment, AppointmentView, Prescription};

#[derive(Debug, Clone, FromRow)]
pub struct AppointmentPrescriptionRow {
    pub id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub prescription_id: Option<String>,
    pub medications: Option<String>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    pub prescription_created_at: Option<DateTime<Utc>>,
}

impl AppointmentPrescriptionRow {
    pub fn into_view(self) -> AppointmentView {
        let appointment = Appointment {
            id: self.id,
            doctor_id: self.doctor_id,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            date_time: self.date_time,
            duration_minutes: self.duration_minutes,
            status: self.status,
            created_at: self.created_at,
        };

        let prescription = self.prescription_id.map(|prescription_id| Prescription {
            id: prescription_id,
            appointment_id: appointment.id.clone(),
            doctor_id: appointment.doctor_id.clone(),
            patient_name: appointment.patient_name.clone(),
            medications: self.medications.unwrap_or_default(),
            dosage: self.dosage.unwrap_or_default(),
            instructions: self.instructions.unwrap_or_default(),
            created_at: self.prescription_created_at.unwrap_or_default(),
        });

        AppointmentView {
            appointment,
            prescription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> AppointmentPrescriptionRow {
        AppointmentPrescriptionRow {
            id: "a-1".into(),
            doctor_id: "d-1".into(),
            patient_name: "Jeanne Martin".into(),
            patient_email: "jeanne@example.com".into(),
            date_time: Utc.with_ymd_and_hms(2030, 3, 1, 9, 0, 0).unwrap(),
            duration_minutes: 45,
            status: "confirmed".into(),
            created_at: Utc.with_ymd_and_hms(2030, 2, 1, 9, 0, 0).unwrap(),
            prescription_id: None,
            medications: None,
            dosage: None,
            instructions: None,
            prescription_created_at: None,
        }
    }

    #[test]
    fn null_join_columns_yield_no_prescription() {
        let view = row().into_view();
        assert!(view.prescription.is_none());
        assert_eq!(view.appointment.duration_minutes, 45);
    }

    #[test]
    fn joined_prescription_takes_appointment_identity() {
        let mut row = row();
        row.prescription_id = Some("p-1".into());
        row.medications = Some("Paracetamol".into());
        row.dosage = Some("1g".into());
        row.prescription_created_at = Some(Utc.with_ymd_and_hms(2030, 3, 1, 10, 0, 0).unwrap());

        let prescription = row.into_view().prescription.unwrap();
        assert_eq!(prescription.id, "p-1");
        assert_eq!(prescription.appointment_id, "a-1");
        assert_eq!(prescription.doctor_id, "d-1");
        assert_eq!(prescription.patient_name, "Jeanne Martin");
        assert_eq!(prescription.instructions, "");
    }
}
