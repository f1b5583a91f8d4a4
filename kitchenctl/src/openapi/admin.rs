//! OpenAPI documentation for the kitchen admin API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api::{handlers, models};

/// Security scheme for the admin API (session cookie issued by `/authentication/login`).
struct CookieSecurityAddon;

impl Modify for CookieSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "CookieAuth".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "kitchenctl_session",
                    "Session cookie set by `POST /authentication/login` and cleared by `POST /authentication/logout`.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_current_user,
        handlers::overview::get_overview,
        handlers::dish_types::list_dish_types,
        handlers::dish_types::create_dish_type,
        handlers::dish_types::get_dish_type,
        handlers::dish_types::update_dish_type,
        handlers::dish_types::delete_dish_type,
        handlers::cooks::list_cooks,
        handlers::cooks::create_cook,
        handlers::cooks::get_cook,
        handlers::cooks::update_cook,
        handlers::cooks::delete_cook,
        handlers::dishes::list_dishes,
        handlers::dishes::create_dish,
        handlers::dishes::get_dish,
        handlers::dishes::update_dish,
        handlers::dishes::delete_dish,
    ),
    components(schemas(
        models::auth::LoginRequest,
        models::auth::AuthResponse,
        models::auth::AuthSuccessResponse,
        models::overview::OverviewResponse,
        models::dish_types::DishTypeCreate,
        models::dish_types::DishTypeUpdate,
        models::dish_types::DishTypeResponse,
        models::cooks::CookCreate,
        models::cooks::CookUpdate,
        models::cooks::CookResponse,
        models::dishes::DishCreate,
        models::dishes::DishUpdate,
        models::dishes::DishResponse,
    )),
    modifiers(&CookieSecurityAddon),
    tags(
        (name = "authentication", description = "Password login and logout"),
        (name = "overview", description = "Landing page counts"),
        (name = "dish-types", description = "Dish categories such as Dessert or Soup"),
        (name = "cooks", description = "Kitchen staff. Cooks with a password can log in."),
        (name = "dishes", description = "Menu items, each with one dish type and any number of cooks"),
    ),
    info(
        title = "Kitchen Admin API",
        version = "1.0.0",
        description = "Manage the dish types, cooks and dishes of a restaurant kitchen.

## Authentication

Log in with `POST /authentication/login`; the response sets a session cookie that every
`/admin/api/v1` route except `/overview` requires.

## Errors

Validation failures return `400` with the offending field:

```json
{ \"message\": \"This field is required.\", \"field\": \"name\" }
```

Deleting a dish type that still has dishes returns `409` unless the service runs with the
`cascade` delete policy.",
    ),
)]
pub struct AdminApiDoc;
