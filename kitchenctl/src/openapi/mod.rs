//! OpenAPI documentation for the admin API at `/admin/api/v1/*` and the authentication
//! routes. Served with Scalar at `/admin/docs`.

pub mod admin;

pub use admin::AdminApiDoc;
