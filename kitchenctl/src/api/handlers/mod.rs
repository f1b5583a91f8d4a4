//! HTTP request handlers, one function per operation.
//!
//! Handlers extract input, call the [`QueryService`](crate::catalog::QueryService) or
//! [`MutationService`](crate::catalog::MutationService) held in [`AppState`](crate::AppState),
//! and convert the result into a response model. They never touch a store directly.
//!
//! - [`auth`]: login, logout and the current cook
//! - [`overview`]: landing page counts
//! - [`dish_types`], [`cooks`], [`dishes`]: catalog CRUD
//!
//! Errors are returned as [`crate::errors::Error`], which renders the status code and body.

pub mod auth;
pub mod cooks;
pub mod dish_types;
pub mod dishes;
pub mod overview;
