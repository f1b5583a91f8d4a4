//! API request/response models for cooks.

use crate::api::models::dishes::DishResponse;
use crate::db::models::cooks::CookDBResponse;
use crate::types::CookId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing cooks
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListCooksQuery {
    /// Matches first name, last name or username, case-insensitively. Not trimmed.
    pub q: Option<String>,
}

/// Request body for creating a cook.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CookCreate {
    /// Unique login name: letters, digits and @/./+/-/_ only
    #[serde(default)]
    #[schema(example = "ben.ford")]
    pub username: String,
    #[schema(example = "Ben")]
    pub first_name: Option<String>,
    #[schema(example = "Ford")]
    pub last_name: Option<String>,
    /// Defaults to 0
    #[schema(example = 4)]
    pub years_of_experience: Option<i32>,
    /// Login password; a cook without one cannot log in
    #[schema(write_only)]
    pub password: Option<String>,
}

/// Request body for updating a cook. Absent fields are left unchanged; in particular an
/// update without `password` keeps the current credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CookUpdate {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub years_of_experience: Option<i32>,
    #[schema(write_only)]
    pub password: Option<String>,
}

/// A cook as returned by the API. The password hash is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CookResponse {
    pub id: CookId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Dishes this cook prepares (detail view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub dishes: Option<Vec<DishResponse>>,
}

impl From<CookDBResponse> for CookResponse {
    fn from(db: CookDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username,
            first_name: db.first_name,
            last_name: db.last_name,
            years_of_experience: db.years_of_experience,
            created_at: db.created_at,
            updated_at: db.updated_at,
            dishes: None,
        }
    }
}

impl CookResponse {
    pub fn with_dishes(mut self, dishes: Vec<DishResponse>) -> Self {
        self.dishes = Some(dishes);
        self
    }
}
