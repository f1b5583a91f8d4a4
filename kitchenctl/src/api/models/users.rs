//! The identity attached to an authenticated request.

use crate::db::models::cooks::CookDBResponse;
use crate::types::CookId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The cook a request is authenticated as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub id: CookId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<CookDBResponse> for CurrentUser {
    fn from(db: CookDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username,
            first_name: db.first_name,
            last_name: db.last_name,
        }
    }
}
