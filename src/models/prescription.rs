use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A prescription issued against an appointment. `doctor_id` and
/// `patient_name` are copies taken from that appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    pub id: String,
    pub appointment_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub medications: String,
    pub dosage: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /prescriptions`. Unknown keys (a `doctor_id` sent by the
/// caller, for instance) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePrescriptionRequest {
    pub appointment_id: String,
    pub medications: String,
    pub dosage: String,
    pub instructions: Option<String>,
}

impl CreatePrescriptionRequest {
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.appointment_id.is_empty() {
            Some("appointment_id")
        } else if self.medications.is_empty() {
            Some("medications")
        } else if self.dosage.is_empty() {
            Some("dosage")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_are_optional() {
        let request: CreatePrescriptionRequest = serde_json::from_str(
            r#"{"appointment_id":"a-1","medications":"Amoxicillin","dosage":"500mg","doctor_id":"spoofed"}"#,
        )
        .unwrap();
        assert_eq!(request.first_missing_field(), None);
        assert!(request.instructions.is_none());
    }

    #[test]
    fn dosage_is_required() {
        let request: CreatePrescriptionRequest =
            serde_json::from_str(r#"{"appointment_id":"a-1","medications":"Amoxicillin"}"#).unwrap();
        assert_eq!(request.first_missing_field(), Some("dosage"));
    }
}
