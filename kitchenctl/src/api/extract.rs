//! Extractors whose rejections render like every other API error.
//!
//! Axum's stock `Json`, `Query` and `Path` reject with plain-text bodies. Wrapping them routes
//! the rejection through [`Error`], so a body with a non-numeric price or a non-numeric id in
//! the URL comes back as a 400 validation error in the usual `{message, field}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::Error;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);
