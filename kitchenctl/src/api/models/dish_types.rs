//! API request/response models for dish types.

use crate::api::models::dishes::DishResponse;
use crate::db::models::dish_types::DishTypeDBResponse;
use crate::types::DishTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing dish types
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListDishTypesQuery {
    /// Case-insensitive substring filter on the name; empty matches everything
    pub search: Option<String>,
}

/// Request body for creating a dish type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DishTypeCreate {
    /// Unique name, e.g. "Dessert"
    #[serde(default)]
    #[schema(example = "Dessert")]
    pub name: String,
}

/// Request body for updating a dish type. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DishTypeUpdate {
    #[schema(example = "Soup")]
    pub name: Option<String>,
}

/// A dish type as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DishTypeResponse {
    pub id: DishTypeId,
    pub name: String,
    /// Number of dishes of this type
    pub dish_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Dishes of this type (detail view only)
    /// Note: no_recursion is important! utoipa will overflow the stack following the
    /// dish -> dish type -> dish relationship otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub dishes: Option<Vec<DishResponse>>,
}

impl From<DishTypeDBResponse> for DishTypeResponse {
    fn from(db: DishTypeDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            dish_count: db.dish_count,
            created_at: db.created_at,
            updated_at: db.updated_at,
            dishes: None,
        }
    }
}

impl DishTypeResponse {
    pub fn with_dishes(mut self, dishes: Vec<DishResponse>) -> Self {
        self.dishes = Some(dishes);
        self
    }
}
