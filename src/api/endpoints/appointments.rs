//! Appointment endpoints.
//!
//! - `POST /api/v1/appointments`: book
//! - `GET /api/v1/appointments`: list, optionally for one doctor

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson, ApiQuery};
use crate::booking;
use crate::models::{Appointment, AppointmentFilter, CreateAppointmentRequest};

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<String>,
}

/// `POST /api/v1/appointments`. No availability or doctor check is made.
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(request): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = booking::prepare_appointment(request, Utc::now())?;

    let stored = ctx
        .store
        .insert_appointment(&appointment)
        .await
        .map_err(ApiError::internal("Failed to create appointment"))?;

    tracing::info!(
        appointment_id = %stored.id,
        doctor_id = %stored.doctor_id,
        date_time = %stored.date_time,
        "Appointment booked"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /api/v1/appointments?doctor_id=`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let filter = AppointmentFilter::for_doctor(query.doctor_id);
    let appointments = ctx
        .store
        .list_appointments(&filter)
        .await
        .map_err(ApiError::internal("Failed to fetch appointments"))?;

    Ok(Json(appointments))
}
