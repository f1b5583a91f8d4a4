//! Database models for dishes.

use crate::types::{CookId, DishId, DishTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Database request for creating a new dish
#[derive(Debug, Clone)]
pub struct DishCreateDBRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    pub cook_ids: Vec<CookId>,
}

/// Database request for updating a dish
#[derive(Debug, Clone, Default)]
pub struct DishUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub dish_type_id: Option<DishTypeId>,
    /// When present, replaces the whole set of cooks
    pub cook_ids: Option<Vec<CookId>>,
}

/// Database response for a dish
#[derive(Debug, Clone, PartialEq)]
pub struct DishDBResponse {
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    /// Sorted ascending
    pub cook_ids: Vec<CookId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
