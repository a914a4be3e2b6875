//! Liveness endpoint. Does not touch the database.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SERVICE_NAME;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

/// `GET /api/v1/health`
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
    })
}
