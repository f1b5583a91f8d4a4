//! HTTP surface: handlers and JSON models.
//!
//! - **[`handlers`]**: Axum route handlers, one function per operation
//! - **[`models`]**: Request/response data structures
//! - **[`extract`]**: Body and query extractors that reject with [`crate::errors::Error`]
//!
//! # API Structure
//!
//! - **Authentication** (`/authentication/*`): login and logout
//! - **Overview** (`/admin/api/v1/overview`): landing page counts, public
//! - **Dish types** (`/admin/api/v1/dish-types/*`)
//! - **Cooks** (`/admin/api/v1/cooks/*`)
//! - **Dishes** (`/admin/api/v1/dishes/*`)
//!
//! Everything under `/admin/api/v1` except the overview requires a session. The OpenAPI
//! document is served at `/admin/docs`.

pub mod extract;
pub mod handlers;
pub mod models;
