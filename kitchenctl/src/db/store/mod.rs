//! Storage traits for the catalog and their backends.
//!
//! Every method is one self-contained unit of work: a mutation either commits the record and
//! all of its association rows or leaves the store unchanged. Constraint failures are reported
//! as [`DbError`](crate::db::errors::DbError) variants carrying the names in
//! [`constraints`](crate::db::errors::constraints), identically for both backends.
//!
//! - [`postgres::PostgresStore`]: one transaction per call, queries via [`crate::db::handlers`]
//! - [`in_memory::InMemoryStore`]: all tables behind one lock, for tests and local demos

use std::collections::HashMap;

use crate::db::errors::Result;
use crate::db::handlers::{CookFilter, DishFilter, DishTypeFilter};
use crate::db::models::{
    cooks::{CookCreateDBRequest, CookDBResponse, CookUpdateDBRequest},
    dish_types::{DeletePolicy, DishTypeCreateDBRequest, DishTypeDBResponse, DishTypeUpdateDBRequest},
    dishes::{DishCreateDBRequest, DishDBResponse, DishUpdateDBRequest},
};
use crate::types::{CookId, DishId, DishTypeId};

pub mod in_memory;
pub mod postgres;

#[cfg(test)]
mod tests;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Persistence of dish types.
#[async_trait::async_trait]
pub trait DishTypeStore: Send + Sync {
    /// # Errors
    /// - `UniqueViolation` (`dish_types_name_unique`) if the name is taken
    async fn create_dish_type(&self, request: &DishTypeCreateDBRequest) -> Result<DishTypeDBResponse>;

    async fn get_dish_type(&self, id: DishTypeId) -> Result<Option<DishTypeDBResponse>>;

    /// Every matching dish type with its dish count, ordered by ID
    async fn list_dish_types(&self, filter: &DishTypeFilter) -> Result<Vec<DishTypeDBResponse>>;

    /// # Errors
    /// - `NotFound` if there is no such dish type
    /// - `UniqueViolation` (`dish_types_name_unique`) if the new name is taken
    async fn update_dish_type(&self, id: DishTypeId, request: &DishTypeUpdateDBRequest) -> Result<DishTypeDBResponse>;

    /// Returns `false` if there was no such dish type.
    ///
    /// # Errors
    /// - `ProtectedEntity` under [`DeletePolicy::Restrict`] while dishes reference the type
    async fn delete_dish_type(&self, id: DishTypeId, policy: DeletePolicy) -> Result<bool>;

    async fn count_dish_types(&self) -> Result<i64>;
}

/// Persistence of cooks.
#[async_trait::async_trait]
pub trait CookStore: Send + Sync {
    /// # Errors
    /// - `UniqueViolation` (`cooks_username_unique`) if the username is taken
    /// - `CheckViolation` (`cooks_years_of_experience_non_negative`)
    async fn create_cook(&self, request: &CookCreateDBRequest) -> Result<CookDBResponse>;

    async fn get_cook(&self, id: CookId) -> Result<Option<CookDBResponse>>;

    async fn get_cook_by_username(&self, username: &str) -> Result<Option<CookDBResponse>>;

    /// Cooks keyed by ID; unknown IDs are skipped
    async fn get_cooks_bulk(&self, ids: Vec<CookId>) -> Result<HashMap<CookId, CookDBResponse>>;

    /// Matching cooks ordered by ID
    async fn list_cooks(&self, filter: &CookFilter) -> Result<Vec<CookDBResponse>>;

    /// # Errors
    /// - `NotFound` if there is no such cook
    /// - `UniqueViolation` / `CheckViolation` as for create
    async fn update_cook(&self, id: CookId, request: &CookUpdateDBRequest) -> Result<CookDBResponse>;

    /// Also removes the cook from every dish. Returns `false` if there was no such cook.
    async fn delete_cook(&self, id: CookId) -> Result<bool>;

    async fn count_cooks(&self) -> Result<i64>;
}

/// Persistence of dishes and their cook associations.
#[async_trait::async_trait]
pub trait DishStore: Send + Sync {
    /// # Errors
    /// - `ForeignKeyViolation` (`dishes_dish_type_id_fkey`) for an unknown dish type
    /// - `ForeignKeyViolation` (`dish_cooks_cook_id_fkey`) for an unknown cook
    /// - `CheckViolation` (`dishes_price_non_negative`)
    async fn create_dish(&self, request: &DishCreateDBRequest) -> Result<DishDBResponse>;

    async fn get_dish(&self, id: DishId) -> Result<Option<DishDBResponse>>;

    /// Matching dishes ordered by ID
    async fn list_dishes(&self, filter: &DishFilter) -> Result<Vec<DishDBResponse>>;

    /// # Errors
    /// - `NotFound` if there is no such dish
    /// - Constraint violations as for create
    async fn update_dish(&self, id: DishId, request: &DishUpdateDBRequest) -> Result<DishDBResponse>;

    /// Returns `false` if there was no such dish.
    async fn delete_dish(&self, id: DishId) -> Result<bool>;

    async fn count_dishes(&self) -> Result<i64>;
}

/// The whole catalog. Implemented for anything that stores all three kinds.
pub trait CatalogStore: DishTypeStore + CookStore + DishStore {}

impl<T> CatalogStore for T where T: DishTypeStore + CookStore + DishStore {}
