//! PostgreSQL repositories.
//!
//! Each repository wraps a borrowed `PgConnection` (a pooled connection or an open
//! transaction) and implements the [`Repository`] trait for one table, plus a few
//! table-specific helpers such as counting and username lookup.
//!
//! - [`DishTypes`]: Dish types, reported with their dish counts
//! - [`Cooks`]: Cooks and their password credentials
//! - [`Dishes`]: Dishes and their `dish_cooks` association rows
//!
//! ```ignore
//! use kitchenctl::db::handlers::{Cooks, Repository};
//!
//! let mut conn = pool.acquire().await?;
//! let cooks = Cooks::new(&mut conn).list(&CookFilter::default()).await?;
//! ```

pub mod cooks;
pub mod dish_types;
pub mod dishes;
pub mod repository;
pub mod search;

pub use cooks::{CookFilter, Cooks};
pub use dish_types::{DishTypeFilter, DishTypes};
pub use dishes::{DishFilter, Dishes};
pub use repository::Repository;
