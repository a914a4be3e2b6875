//! `POST /api/v1/prescriptions`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson};
use crate::booking;
use crate::models::{CreatePrescriptionRequest, Prescription};

/// Issue a prescription for an existing appointment.
///
/// The lookup and the insert are separate statements.
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(request): ApiJson<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    booking::check_prescription_request(&request)?;

    let appointment = ctx
        .store
        .get_appointment(&request.appointment_id)
        .await
        .map_err(ApiError::internal("Failed to fetch appointment"))?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))?;

    let prescription = booking::prepare_prescription(request, &appointment, Utc::now());

    let stored = ctx
        .store
        .insert_prescription(&prescription)
        .await
        .map_err(ApiError::internal("Failed to create prescription"))?;

    tracing::info!(
        prescription_id = %stored.id,
        appointment_id = %stored.appointment_id,
        "Prescription created"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}
