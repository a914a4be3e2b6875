//! Booking API router.
//!
//! Returns a composable `Router` with every endpoint nested under
//! `/api/v1`. Layers (outermost → innermost): CORS → request log → handler.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::API_PREFIX;
use crate::db::BookingStore;

/// Build the booking API router over `store`.
pub fn api_router(store: Arc<dyn BookingStore>) -> Router {
    build_router(ApiContext::new(store))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7), and
    // sibling routes must share the param name.
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route(
            "/doctors/:id/appointments",
            get(endpoints::doctors::appointments),
        )
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route("/prescriptions", post(endpoints::prescriptions::create))
        .with_state(ctx);

    Router::new()
        .nest(API_PREFIX, routes)
        .layer(axum::middleware::from_fn(middleware::audit::log_request))
        .layer(cors_layer())
}

/// Any origin; the header set the web frontend sends.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
}
