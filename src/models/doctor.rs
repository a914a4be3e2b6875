use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A doctor listed in the marketplace. Seeded outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub rating: f64,
    pub price_per_hour: i32,
    pub avatar: String,
    pub experience_years: i32,
    pub languages: String,
}
