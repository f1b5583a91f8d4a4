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
            dish_types::{DishTypeCreate, DishTypeResponse, DishTypeUpdate, ListDishTypesQuery},
            dishes::DishResponse,
        },
    },
    db::handlers::DishFilter,
    errors::Result,
    types::DishTypeId,
};

/// List dish types with their dish counts
#[utoipa::path(
    get,
    path = "/admin/api/v1/dish-types",
    tag = "dish-types",
    summary = "List dish types",
    params(ListDishTypesQuery),
    responses(
        (status = 200, description = "Every matching dish type, ordered by ID", body = Vec<DishTypeResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_dish_types(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListDishTypesQuery>,
) -> Result<Json<Vec<DishTypeResponse>>> {
    let dish_types = state.query.list_dish_types(query.search.as_deref()).await?;
    Ok(Json(dish_types.into_iter().map(DishTypeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/dish-types",
    tag = "dish-types",
    summary = "Create dish type",
    request_body = DishTypeCreate,
    responses(
        (status = 201, description = "Dish type created", body = DishTypeResponse),
        (status = 400, description = "Name missing, too long or already taken"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_dish_type(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DishTypeCreate>,
) -> Result<(StatusCode, Json<DishTypeResponse>)> {
    let created = state.mutation.create_dish_type(request).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a dish type together with its dishes
#[utoipa::path(
    get,
    path = "/admin/api/v1/dish-types/{id}",
    tag = "dish-types",
    summary = "Get dish type",
    params(("id" = i64, Path, description = "Dish type ID")),
    responses(
        (status = 200, description = "Dish type with `dishes` expanded", body = DishTypeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish type not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_type_id = id))]
pub async fn get_dish_type(State(state): State<AppState>, PathParam(id): PathParam<DishTypeId>) -> Result<Json<DishTypeResponse>> {
    let dish_type = state.query.get_dish_type(id).await?;
    let dishes = state.query.list_dishes(DishFilter::default().with_dish_type(id)).await?;

    let response = DishTypeResponse::from(dish_type).with_dishes(dishes.into_iter().map(DishResponse::from).collect());
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/admin/api/v1/dish-types/{id}",
    tag = "dish-types",
    summary = "Update dish type",
    request_body = DishTypeUpdate,
    params(("id" = i64, Path, description = "Dish type ID")),
    responses(
        (status = 200, description = "Dish type updated", body = DishTypeResponse),
        (status = 400, description = "Invalid or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish type not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_type_id = id))]
pub async fn update_dish_type(
    State(state): State<AppState>,
    PathParam(id): PathParam<DishTypeId>,
    JsonBody(request): JsonBody<DishTypeUpdate>,
) -> Result<Json<DishTypeResponse>> {
    let updated = state.mutation.update_dish_type(id, request).await?;
    Ok(Json(updated.into()))
}

/// Delete a dish type. Under the `restrict` policy this fails while dishes still belong to
/// it; under `cascade` those dishes are deleted too.
#[utoipa::path(
    delete,
    path = "/admin/api/v1/dish-types/{id}",
    tag = "dish-types",
    summary = "Delete dish type",
    params(("id" = i64, Path, description = "Dish type ID")),
    responses(
        (status = 204, description = "Dish type deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish type not found"),
        (status = 409, description = "Dishes still belong to this type"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_type_id = id))]
pub async fn delete_dish_type(State(state): State<AppState>, PathParam(id): PathParam<DishTypeId>) -> Result<StatusCode> {
    state.mutation.delete_dish_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
