//! API request and response data models.
//!
//! These structures define the public JSON contract and are kept separate from the
//! store models in [`crate::db::models`], so storage and API can change independently.
//! Every model is annotated with `utoipa` for the OpenAPI document.
//!
//! - [`dish_types`], [`cooks`], [`dishes`]: catalog create/update payloads and responses
//! - [`overview`]: landing page counts
//! - [`auth`]: login and logout payloads
//! - [`users`]: the logged-in cook

pub mod auth;
pub mod cooks;
pub mod dish_types;
pub mod dishes;
pub mod overview;
pub mod users;
