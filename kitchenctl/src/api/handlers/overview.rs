use axum::{Json, extract::State};

use crate::{AppState, api::models::overview::OverviewResponse, errors::Result};

/// Record counts for the landing page
#[utoipa::path(
    get,
    path = "/admin/api/v1/overview",
    tag = "overview",
    summary = "Catalog counts",
    responses(
        (status = 200, description = "Number of dish types, cooks and dishes", body = OverviewResponse),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>> {
    Ok(Json(state.query.overview().await?))
}
