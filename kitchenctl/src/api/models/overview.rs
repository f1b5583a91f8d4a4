use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Record counts shown on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverviewResponse {
    pub dish_types_count: i64,
    pub cooks_count: i64,
    pub dishes_count: i64,
}
