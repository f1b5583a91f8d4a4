use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        extract::{JsonBody, PathParam, QueryParams},
        models::{
            cooks::{CookCreate, CookResponse, CookUpdate, ListCooksQuery},
            dishes::DishResponse,
        },
    },
    db::handlers::DishFilter,
    errors::Result,
    types::CookId,
};

/// Search cooks by first name, last name or username
#[utoipa::path(
    get,
    path = "/admin/api/v1/cooks",
    tag = "cooks",
    summary = "List cooks",
    params(ListCooksQuery),
    responses(
        (status = 200, description = "Matching cooks ordered by ID; all cooks when `q` is absent or empty", body = Vec<CookResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_cooks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListCooksQuery>,
) -> Result<Json<Vec<CookResponse>>> {
    let cooks = state.query.search_cooks(query.q.as_deref()).await?;
    Ok(Json(cooks.into_iter().map(CookResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/cooks",
    tag = "cooks",
    summary = "Create cook",
    request_body = CookCreate,
    responses(
        (status = 201, description = "Cook created", body = CookResponse),
        (status = 400, description = "Invalid field or duplicate username"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_cook(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CookCreate>,
) -> Result<(StatusCode, Json<CookResponse>)> {
    let created = state.mutation.create_cook(request).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a cook together with the dishes they prepare
#[utoipa::path(
    get,
    path = "/admin/api/v1/cooks/{id}",
    tag = "cooks",
    summary = "Get cook",
    params(("id" = i64, Path, description = "Cook ID")),
    responses(
        (status = 200, description = "Cook with `dishes` expanded", body = CookResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cook not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(cook_id = id))]
pub async fn get_cook(State(state): State<AppState>, PathParam(id): PathParam<CookId>) -> Result<Json<CookResponse>> {
    let cook = state.query.get_cook(id).await?;
    let dishes = state.query.list_dishes(DishFilter::default().with_cook(id)).await?;

    Ok(Json(
        CookResponse::from(cook).with_dishes(dishes.into_iter().map(DishResponse::from).collect()),
    ))
}

#[utoipa::path(
    patch,
    path = "/admin/api/v1/cooks/{id}",
    tag = "cooks",
    summary = "Update cook",
    request_body = CookUpdate,
    params(("id" = i64, Path, description = "Cook ID")),
    responses(
        (status = 200, description = "Cook updated", body = CookResponse),
        (status = 400, description = "Invalid field or duplicate username"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cook not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(cook_id = id))]
pub async fn update_cook(
    State(state): State<AppState>,
    PathParam(id): PathParam<CookId>,
    JsonBody(request): JsonBody<CookUpdate>,
) -> Result<Json<CookResponse>> {
    let updated = state.mutation.update_cook(id, request).await?;
    Ok(Json(updated.into()))
}

/// Delete a cook. Dishes they prepared are kept; only the association is removed.
#[utoipa::path(
    delete,
    path = "/admin/api/v1/cooks/{id}",
    tag = "cooks",
    summary = "Delete cook",
    params(("id" = i64, Path, description = "Cook ID")),
    responses(
        (status = 204, description = "Cook deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cook not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(cook_id = id))]
pub async fn delete_cook(State(state): State<AppState>, PathParam(id): PathParam<CookId>) -> Result<StatusCode> {
    state.mutation.delete_cook(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
