//! Doctor endpoints.
//!
//! - `GET /api/v1/doctors`: list, optionally filtered by specialty/location
//! - `GET /api/v1/doctors/:id`: single doctor
//! - `GET /api/v1/doctors/:id/appointments`: the doctor's schedule with prescriptions

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiQuery};
use crate::models::{AppointmentView, Doctor, DoctorFilter};
use crate::schedule::{DayBounds, TimeRange};

#[derive(Debug, Default, Deserialize)]
pub struct DoctorQuery {
    pub specialty: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    /// `past`, `today` or `future`; anything else lists everything.
    pub filter: Option<String>,
}

/// `GET /api/v1/doctors`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<DoctorQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let filter = DoctorFilter::new(query.specialty, query.location);
    let doctors = ctx
        .store
        .list_doctors(&filter)
        .await
        .map_err(ApiError::internal("Failed to fetch doctors"))?;

    Ok(Json(doctors))
}

/// `GET /api/v1/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    ctx.store
        .get_doctor(&doctor_id)
        .await
        .map_err(ApiError::internal("Failed to fetch doctor"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))
}

/// `GET /api/v1/doctors/:id/appointments?filter=`
///
/// Day windows follow the server's local calendar day. The doctor id is
/// not checked; an unknown doctor simply has no appointments.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
    ApiQuery(query): ApiQuery<ScheduleQuery>,
) -> Result<Json<Vec<AppointmentView>>, ApiError> {
    let range = TimeRange::for_filter(query.filter.as_deref(), &DayBounds::local_now());
    let views = ctx
        .store
        .list_doctor_appointments(&doctor_id, &range)
        .await
        .map_err(ApiError::internal("Failed to fetch appointments"))?;

    Ok(Json(views))
}
