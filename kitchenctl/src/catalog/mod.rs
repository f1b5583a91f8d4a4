//! The catalog core: read and write operations over dish types, cooks and dishes.
//!
//! HTTP handlers never touch a store directly. They go through two stateless, cheaply
//! cloneable services that share one [`CatalogStore`](crate::db::store::CatalogStore):
//!
//! - [`QueryService`]: listings, searches, single-record fetches and landing page counts.
//!   Nothing here mutates state.
//! - [`MutationService`]: create, update and delete. Input is validated (see [`validation`])
//!   before it reaches the store, and store constraint failures are translated into
//!   field-level validation errors or conflicts.

pub mod mutation;
pub mod query;
pub mod validation;

pub use mutation::MutationService;
pub use query::QueryService;
