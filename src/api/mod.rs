//! HTTP API for the booking backend.
//!
//! Routes are nested under `/api/v1`. `api_router()` returns a `Router`
//! that can be mounted on any axum server; `server` owns the listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve, start_api_server_on, ApiServer};
pub use types::ApiContext;
