//! Booking domain records.
//!
//! Rows are read from and written to the store as-is; the API layer
//! serializes them directly, so field names double as JSON keys.

mod appointment;
mod doctor;
mod filters;
mod prescription;

pub use appointment::*;
pub use doctor::*;
pub use filters::*;
pub use prescription::*;
