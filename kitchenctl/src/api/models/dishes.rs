//! API request/response models for dishes.

use crate::api::models::{cooks::CookResponse, dish_types::DishTypeResponse};
use crate::db::models::dishes::DishDBResponse;
use crate::types::{CookId, DishId, DishTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing dishes
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListDishesQuery {
    /// Case-insensitive substring filter on the dish name
    pub search: Option<String>,
    /// Only dishes of this type
    pub dish_type_id: Option<DishTypeId>,
    /// Only dishes this cook prepares
    pub cook_id: Option<CookId>,
}

/// Request body for creating a dish.
///
/// `price` and `dish_type_id` are required; they are optional here so that leaving them out
/// is reported against the field rather than as an unreadable body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DishCreate {
    #[serde(default)]
    #[schema(example = "Tiramisu")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "7.50")]
    pub price: Option<Decimal>,
    pub dish_type_id: Option<DishTypeId>,
    #[serde(default)]
    pub cook_ids: Vec<CookId>,
}

/// Request body for updating a dish. Absent fields are left unchanged; a supplied
/// `cook_ids` replaces the whole set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub dish_type_id: Option<DishTypeId>,
    pub cook_ids: Option<Vec<CookId>>,
}

/// A dish as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DishResponse {
    pub id: DishId,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "7.50")]
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    /// Ascending
    pub cook_ids: Vec<CookId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The dish type (detail view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub dish_type: Option<DishTypeResponse>,
    /// The cooks preparing this dish (detail view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub cooks: Option<Vec<CookResponse>>,
}

impl From<DishDBResponse> for DishResponse {
    fn from(db: DishDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            price: db.price,
            dish_type_id: db.dish_type_id,
            cook_ids: db.cook_ids,
            created_at: db.created_at,
            updated_at: db.updated_at,
            dish_type: None,
            cooks: None,
        }
    }
}

impl DishResponse {
    pub fn with_dish_type(mut self, dish_type: DishTypeResponse) -> Self {
        self.dish_type = Some(dish_type);
        self
    }

    pub fn with_cooks(mut self, cooks: Vec<CookResponse>) -> Self {
        self.cooks = Some(cooks);
        self
    }
}
