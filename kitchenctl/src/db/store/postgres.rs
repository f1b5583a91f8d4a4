//! PostgreSQL-backed catalog store.
//!
//! Each call runs on its own pooled connection; mutations open a transaction and commit only
//! once every statement succeeded, so a failed call leaves the database unchanged.

use std::collections::HashMap;

use sqlx::PgPool;

use super::{CookStore, DishStore, DishTypeStore};
use crate::db::errors::Result;
use crate::db::handlers::{CookFilter, Cooks, DishFilter, DishTypeFilter, DishTypes, Dishes, Repository};
use crate::db::models::{
    cooks::{CookCreateDBRequest, CookDBResponse, CookUpdateDBRequest},
    dish_types::{DeletePolicy, DishTypeCreateDBRequest, DishTypeDBResponse, DishTypeUpdateDBRequest},
    dishes::{DishCreateDBRequest, DishDBResponse, DishUpdateDBRequest},
};
use crate::types::{CookId, DishId, DishTypeId};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DishTypeStore for PostgresStore {
    async fn create_dish_type(&self, request: &DishTypeCreateDBRequest) -> Result<DishTypeDBResponse> {
        let mut tx = self.pool.begin().await?;
        let dish_type = DishTypes::new(&mut tx).create(request).await?;
        tx.commit().await?;
        Ok(dish_type)
    }

    async fn get_dish_type(&self, id: DishTypeId) -> Result<Option<DishTypeDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        DishTypes::new(&mut conn).get_by_id(id).await
    }

    async fn list_dish_types(&self, filter: &DishTypeFilter) -> Result<Vec<DishTypeDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        DishTypes::new(&mut conn).list(filter).await
    }

    async fn update_dish_type(&self, id: DishTypeId, request: &DishTypeUpdateDBRequest) -> Result<DishTypeDBResponse> {
        let mut tx = self.pool.begin().await?;
        let dish_type = DishTypes::new(&mut tx).update(id, request).await?;
        tx.commit().await?;
        Ok(dish_type)
    }

    async fn delete_dish_type(&self, id: DishTypeId, policy: DeletePolicy) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = match policy {
            DeletePolicy::Restrict => DishTypes::new(&mut tx).delete(id).await?,
            DeletePolicy::Cascade => DishTypes::new(&mut tx).delete_with_dishes(id).await?,
        };
        tx.commit().await?;
        Ok(deleted)
    }

    async fn count_dish_types(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        DishTypes::new(&mut conn).count().await
    }
}

#[async_trait::async_trait]
impl CookStore for PostgresStore {
    async fn create_cook(&self, request: &CookCreateDBRequest) -> Result<CookDBResponse> {
        let mut tx = self.pool.begin().await?;
        let cook = Cooks::new(&mut tx).create(request).await?;
        tx.commit().await?;
        Ok(cook)
    }

    async fn get_cook(&self, id: CookId) -> Result<Option<CookDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cooks::new(&mut conn).get_by_id(id).await
    }

    async fn get_cook_by_username(&self, username: &str) -> Result<Option<CookDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cooks::new(&mut conn).get_by_username(username).await
    }

    async fn get_cooks_bulk(&self, ids: Vec<CookId>) -> Result<HashMap<CookId, CookDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cooks::new(&mut conn).get_bulk(ids).await
    }

    async fn list_cooks(&self, filter: &CookFilter) -> Result<Vec<CookDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cooks::new(&mut conn).list(filter).await
    }

    async fn update_cook(&self, id: CookId, request: &CookUpdateDBRequest) -> Result<CookDBResponse> {
        let mut tx = self.pool.begin().await?;
        let cook = Cooks::new(&mut tx).update(id, request).await?;
        tx.commit().await?;
        Ok(cook)
    }

    async fn delete_cook(&self, id: CookId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = Cooks::new(&mut tx).delete(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn count_cooks(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        Cooks::new(&mut conn).count().await
    }
}

#[async_trait::async_trait]
impl DishStore for PostgresStore {
    async fn create_dish(&self, request: &DishCreateDBRequest) -> Result<DishDBResponse> {
        let mut tx = self.pool.begin().await?;
        let dish = Dishes::new(&mut tx).create(request).await?;
        tx.commit().await?;
        Ok(dish)
    }

    async fn get_dish(&self, id: DishId) -> Result<Option<DishDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Dishes::new(&mut conn).get_by_id(id).await
    }

    async fn list_dishes(&self, filter: &DishFilter) -> Result<Vec<DishDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Dishes::new(&mut conn).list(filter).await
    }

    async fn update_dish(&self, id: DishId, request: &DishUpdateDBRequest) -> Result<DishDBResponse> {
        let mut tx = self.pool.begin().await?;
        let dish = Dishes::new(&mut tx).update(id, request).await?;
        tx.commit().await?;
        Ok(dish)
    }

    async fn delete_dish(&self, id: DishId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = Dishes::new(&mut tx).delete(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn count_dishes(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        Dishes::new(&mut conn).count().await
    }
}
