//! Database models for dish types.

use crate::types::DishTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database request for creating a new dish type
#[derive(Debug, Clone)]
pub struct DishTypeCreateDBRequest {
    pub name: String,
}

/// Database request for updating a dish type
#[derive(Debug, Clone, Default)]
pub struct DishTypeUpdateDBRequest {
    pub name: Option<String>,
}

/// Database response for a dish type
#[derive(Debug, Clone, PartialEq)]
pub struct DishTypeDBResponse {
    pub id: DishTypeId,
    pub name: String,
    /// Number of dishes currently referencing this type
    pub dish_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What happens to a dish type's dishes when the dish type is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse to delete a dish type that still has dishes
    #[default]
    Restrict,
    /// Delete the dish type's dishes (and their cook associations) along with it
    Cascade,
}
