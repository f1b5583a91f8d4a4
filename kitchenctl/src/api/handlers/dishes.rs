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
            cooks::CookResponse,
            dish_types::DishTypeResponse,
            dishes::{DishCreate, DishResponse, DishUpdate, ListDishesQuery},
        },
    },
    db::handlers::DishFilter,
    errors::Result,
    types::DishId,
};

/// List dishes, optionally filtered by name, dish type or cook
#[utoipa::path(
    get,
    path = "/admin/api/v1/dishes",
    tag = "dishes",
    summary = "List dishes",
    params(ListDishesQuery),
    responses(
        (status = 200, description = "Matching dishes ordered by ID", body = Vec<DishResponse>),
        (status = 400, description = "Malformed filter"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_dishes(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListDishesQuery>,
) -> Result<Json<Vec<DishResponse>>> {
    let filter = DishFilter {
        search: query.search,
        dish_type_id: query.dish_type_id,
        cook_id: query.cook_id,
    };
    let dishes = state.query.list_dishes(filter).await?;
    Ok(Json(dishes.into_iter().map(DishResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/dishes",
    tag = "dishes",
    summary = "Create dish",
    request_body = DishCreate,
    responses(
        (status = 201, description = "Dish created", body = DishResponse),
        (status = 400, description = "Missing dish type, negative price or unknown cook"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_dish(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DishCreate>,
) -> Result<(StatusCode, Json<DishResponse>)> {
    let created = state.mutation.create_dish(request).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a dish with its dish type and cooks expanded
#[utoipa::path(
    get,
    path = "/admin/api/v1/dishes/{id}",
    tag = "dishes",
    summary = "Get dish",
    params(("id" = i64, Path, description = "Dish ID")),
    responses(
        (status = 200, description = "Dish with `dish_type` and `cooks` expanded", body = DishResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_id = id))]
pub async fn get_dish(State(state): State<AppState>, PathParam(id): PathParam<DishId>) -> Result<Json<DishResponse>> {
    let dish = state.query.get_dish(id).await?;
    let dish_type = state.query.get_dish_type(dish.dish_type_id).await?;
    let mut cooks_by_id = state.query.get_cooks_bulk(dish.cook_ids.clone()).await?;

    // Keep the ascending id order of cook_ids
    let cooks = dish
        .cook_ids
        .iter()
        .filter_map(|cook_id| cooks_by_id.remove(cook_id))
        .map(CookResponse::from)
        .collect();

    let response = DishResponse::from(dish)
        .with_dish_type(DishTypeResponse::from(dish_type))
        .with_cooks(cooks);
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/admin/api/v1/dishes/{id}",
    tag = "dishes",
    summary = "Update dish",
    request_body = DishUpdate,
    params(("id" = i64, Path, description = "Dish ID")),
    responses(
        (status = 200, description = "Dish updated", body = DishResponse),
        (status = 400, description = "Invalid field or unknown reference"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_id = id))]
pub async fn update_dish(
    State(state): State<AppState>,
    PathParam(id): PathParam<DishId>,
    JsonBody(request): JsonBody<DishUpdate>,
) -> Result<Json<DishResponse>> {
    let updated = state.mutation.update_dish(id, request).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/api/v1/dishes/{id}",
    tag = "dishes",
    summary = "Delete dish",
    params(("id" = i64, Path, description = "Dish ID")),
    responses(
        (status = 204, description = "Dish deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(dish_id = id))]
pub async fn delete_dish(State(state): State<AppState>, PathParam(id): PathParam<DishId>) -> Result<StatusCode> {
    state.mutation.delete_dish(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::models::{cooks::CookCreate, dish_types::DishTypeCreate},
        test_utils::{create_test_app, session_cookie},
        types::{CookId, DishTypeId},
    };
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;

    struct Kitchen {
        server: TestServer,
        cookie: String,
        dessert: DishTypeId,
        soup: DishTypeId,
        ann: CookId,
        ben: CookId,
    }

    async fn kitchen() -> Kitchen {
        let (server, state) = create_test_app().await;
        let cookie = session_cookie(&state).await;
        let dessert = state
            .mutation
            .create_dish_type(DishTypeCreate { name: "Dessert".into() })
            .await
            .unwrap()
            .id;
        let soup = state
            .mutation
            .create_dish_type(DishTypeCreate { name: "Soup".into() })
            .await
            .unwrap()
            .id;
        let mut cook_ids = Vec::new();
        for (username, first, last) in [("alee", "Ann", "Lee"), ("bford", "Ben", "Ford")] {
            let cook = state
                .mutation
                .create_cook(CookCreate {
                    username: username.into(),
                    first_name: Some(first.into()),
                    last_name: Some(last.into()),
                    years_of_experience: Some(3),
                    password: None,
                })
                .await
                .unwrap();
            cook_ids.push(cook.id);
        }
        Kitchen {
            server,
            cookie,
            dessert,
            soup,
            ann: cook_ids[0],
            ben: cook_ids[1],
        }
    }

    #[tokio::test]
    async fn test_create_and_expand_dish() {
        let k = kitchen().await;

        let response = k
            .server
            .post("/admin/api/v1/dishes")
            .add_header("cookie", k.cookie.clone())
            .json(&json!({
                "name": "Tiramisu",
                "description": "Coffee and mascarpone",
                "price": "7.5",
                "dish_type_id": k.dessert,
                "cook_ids": [k.ben, k.ann, k.ben],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: DishResponse = response.json();
        assert_eq!(created.price, Decimal::from_str("7.50").unwrap());
        assert_eq!(created.cook_ids, vec![k.ann, k.ben]);
        assert!(created.dish_type.is_none());

        let detail: DishResponse = k
            .server
            .get(&format!("/admin/api/v1/dishes/{}", created.id))
            .add_header("cookie", k.cookie)
            .await
            .json();
        assert_eq!(detail.dish_type.unwrap().name, "Dessert");
        let cook_names: Vec<String> = detail.cooks.unwrap().into_iter().map(|c| c.last_name).collect();
        assert_eq!(cook_names, vec!["Lee", "Ford"]);
    }

    #[tokio::test]
    async fn test_dish_validation() {
        let k = kitchen().await;
        let cases = [
            (json!({"name": "Cake", "price": "5.00"}), "dish_type_id"),
            (json!({"name": "Cake", "price": "-1", "dish_type_id": k.dessert}), "price"),
            (json!({"name": "Cake", "price": "1.005", "dish_type_id": k.dessert}), "price"),
            (json!({"name": "Cake", "dish_type_id": k.dessert}), "price"),
            (json!({"name": "", "price": "1", "dish_type_id": k.dessert}), "name"),
            (json!({"name": "Cake", "price": "1", "dish_type_id": 9999}), "dish_type_id"),
            (json!({"name": "Cake", "price": "1", "dish_type_id": k.dessert, "cook_ids": [9999]}), "cook_ids"),
        ];

        for (body, field) in cases {
            let response = k
                .server
                .post("/admin/api/v1/dishes")
                .add_header("cookie", k.cookie.clone())
                .json(&body)
                .await;
            response.assert_status_bad_request();
            assert_eq!(response.json::<Value>()["field"], field, "body: {body}");
        }

        let dishes: Vec<DishResponse> = k
            .server
            .get("/admin/api/v1/dishes")
            .add_header("cookie", k.cookie)
            .await
            .json();
        assert!(dishes.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_price_is_bad_request() {
        let k = kitchen().await;
        k.server
            .post("/admin/api/v1/dishes")
            .add_header("cookie", k.cookie)
            .json(&json!({"name": "Cake", "price": "cheap", "dish_type_id": k.dessert}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_partial_update_and_cook_replacement() {
        let k = kitchen().await;
        let created: DishResponse = k
            .server
            .post("/admin/api/v1/dishes")
            .add_header("cookie", k.cookie.clone())
            .json(&json!({"name": "Cake", "price": "4.00", "dish_type_id": k.dessert, "cook_ids": [k.ann]}))
            .await
            .json();

        let moved: DishResponse = k
            .server
            .patch(&format!("/admin/api/v1/dishes/{}", created.id))
            .add_header("cookie", k.cookie.clone())
            .json(&json!({"dish_type_id": k.soup}))
            .await
            .json();
        assert_eq!(moved.dish_type_id, k.soup);
        assert_eq!(moved.name, "Cake");
        assert_eq!(moved.cook_ids, vec![k.ann]);

        let recooked: DishResponse = k
            .server
            .patch(&format!("/admin/api/v1/dishes/{}", created.id))
            .add_header("cookie", k.cookie.clone())
            .json(&json!({"cook_ids": [k.ben]}))
            .await
            .json();
        assert_eq!(recooked.cook_ids, vec![k.ben]);

        let cleared: DishResponse = k
            .server
            .patch(&format!("/admin/api/v1/dishes/{}", created.id))
            .add_header("cookie", k.cookie.clone())
            .json(&json!({"cook_ids": []}))
            .await
            .json();
        assert!(cleared.cook_ids.is_empty());

        k.server
            .patch("/admin/api/v1/dishes/9999")
            .add_header("cookie", k.cookie)
            .json(&json!({"name": "Ghost"}))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_list_filters() {
        let k = kitchen().await;
        for (name, dish_type, cooks) in [
            ("Cake", k.dessert, vec![k.ann]),
            ("Tiramisu", k.dessert, vec![k.ben]),
            ("Miso soup", k.soup, vec![k.ben]),
        ] {
            k.server
                .post("/admin/api/v1/dishes")
                .add_header("cookie", k.cookie.clone())
                .json(&json!({"name": name, "price": "3", "dish_type_id": dish_type, "cook_ids": cooks}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let names = |dishes: Vec<DishResponse>| dishes.into_iter().map(|d| d.name).collect::<Vec<_>>();

        let by_name = k
            .server
            .get("/admin/api/v1/dishes")
            .add_query_param("search", "MIS")
            .add_header("cookie", k.cookie.clone())
            .await
            .json();
        assert_eq!(names(by_name), vec!["Tiramisu", "Miso soup"]);

        let by_type = k
            .server
            .get("/admin/api/v1/dishes")
            .add_query_param("dish_type_id", k.dessert)
            .add_header("cookie", k.cookie.clone())
            .await
            .json();
        assert_eq!(names(by_type), vec!["Cake", "Tiramisu"]);

        let by_cook = k
            .server
            .get("/admin/api/v1/dishes")
            .add_query_param("cook_id", k.ben)
            .add_header("cookie", k.cookie.clone())
            .await
            .json();
        assert_eq!(names(by_cook), vec!["Tiramisu", "Miso soup"]);

        k.server
            .get("/admin/api/v1/dishes")
            .add_query_param("cook_id", "ben")
            .add_header("cookie", k.cookie)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_field_error() {
        let k = kitchen().await;
        for request in [
            k.server.get("/admin/api/v1/dishes/abc"),
            k.server.delete("/admin/api/v1/cooks/abc"),
            k.server.patch("/admin/api/v1/dish-types/abc").json(&json!({"name": "Soup"})),
        ] {
            let response = request.add_header("cookie", k.cookie.clone()).await;
            response.assert_status_bad_request();
            assert_eq!(response.json::<Value>()["field"], "id");
        }
    }

    #[tokio::test]
    async fn test_catalog_requires_login() {
        let k = kitchen().await;
        for path in ["/admin/api/v1/dishes", "/admin/api/v1/cooks", "/admin/api/v1/dish-types"] {
            k.server.get(path).await.assert_status_unauthorized();
        }
        k.server
            .post("/admin/api/v1/dishes")
            .json(&json!({"name": "Cake", "price": "1", "dish_type_id": k.dessert}))
            .await
            .assert_status_unauthorized();
    }
}
