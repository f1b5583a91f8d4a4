//! Database repository for dish types.

use crate::db::{
    errors::{DbError, Result},
    handlers::{repository::Repository, search::contains_pattern},
    models::dish_types::{DishTypeCreateDBRequest, DishTypeDBResponse, DishTypeUpdateDBRequest},
};
use crate::types::{DishTypeId, Operation};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection, QueryBuilder};
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing dish types
#[derive(Debug, Clone, Default)]
pub struct DishTypeFilter {
    pub search: Option<String>, // Case-insensitive substring search on name
}

impl DishTypeFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

// Every read reports the live dish count, aggregated with a LEFT JOIN so empty types count 0
const SELECT_WITH_DISH_COUNT: &str = r#"
    SELECT dt.id, dt.name, dt.created_at, dt.updated_at, COUNT(d.id) AS dish_count
    FROM dish_types dt
    LEFT JOIN dishes d ON d.dish_type_id = dt.id
"#;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct DishType {
    pub id: DishTypeId,
    pub name: String,
    pub dish_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DishType> for DishTypeDBResponse {
    fn from(dish_type: DishType) -> Self {
        Self {
            id: dish_type.id,
            name: dish_type.name,
            dish_count: dish_type.dish_count,
            created_at: dish_type.created_at,
            updated_at: dish_type.updated_at,
        }
    }
}

pub struct DishTypes<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for DishTypes<'c> {
    type CreateRequest = DishTypeCreateDBRequest;
    type UpdateRequest = DishTypeUpdateDBRequest;
    type Response = DishTypeDBResponse;
    type Id = DishTypeId;
    type Filter = DishTypeFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let dish_type = sqlx::query_as::<_, DishType>(
            r#"
            INSERT INTO dish_types (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at, 0::BIGINT AS dish_count
            "#,
        )
        .bind(&request.name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(DishTypeDBResponse::from(dish_type))
    }

    #[instrument(skip(self), fields(dish_type_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let dish_type = sqlx::query_as::<_, DishType>(&format!("{SELECT_WITH_DISH_COUNT} WHERE dt.id = $1 GROUP BY dt.id"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(dish_type.map(DishTypeDBResponse::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        let dish_types = sqlx::query_as::<_, DishType>(&format!("{SELECT_WITH_DISH_COUNT} WHERE dt.id = ANY($1) GROUP BY dt.id"))
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(dish_types.into_iter().map(|dt| (dt.id, DishTypeDBResponse::from(dt))).collect())
    }

    #[instrument(skip(self, filter), fields(search = filter.search.as_deref()), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new(format!("{SELECT_WITH_DISH_COUNT} WHERE 1=1"));

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(" AND dt.name ILIKE ");
            query.push_bind(contains_pattern(search));
        }

        query.push(" GROUP BY dt.id ORDER BY dt.id");

        let dish_types = query.build_query_as::<DishType>().fetch_all(&mut *self.db).await?;

        Ok(dish_types.into_iter().map(DishTypeDBResponse::from).collect())
    }

    /// Restricting delete: refuses while any dish still references the type.
    #[instrument(skip(self), fields(dish_type_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let dish_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes WHERE dish_type_id = $1")
            .bind(id)
            .fetch_one(&mut *self.db)
            .await?;

        if dish_count > 0 {
            return Err(DbError::ProtectedEntity {
                operation: Operation::Delete,
                reason: format!("{dish_count} dish(es) still belong to it"),
                entity_type: "dish type".to_string(),
                entity_id: Some(id.to_string()),
            });
        }

        // The RESTRICT foreign key still catches a dish inserted concurrently
        let result = sqlx::query("DELETE FROM dish_types WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(dish_type_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let dish_type = sqlx::query_as::<_, DishType>(
            r#"
            UPDATE dish_types SET
                name = COALESCE($2, name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at,
                (SELECT COUNT(*) FROM dishes WHERE dishes.dish_type_id = dish_types.id) AS dish_count
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::NotFound)?;

        Ok(DishTypeDBResponse::from(dish_type))
    }
}

impl<'c> DishTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Cascading delete: removes the type's dishes (their `dish_cooks` rows go with them) and
    /// then the type, atomically.
    #[instrument(skip(self), fields(dish_type_id = id), err)]
    pub async fn delete_with_dishes(&mut self, id: DishTypeId) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let dishes = sqlx::query("DELETE FROM dishes WHERE dish_type_id = $1").bind(id).execute(&mut *tx).await?;
        let result = sqlx::query("DELETE FROM dish_types WHERE id = $1").bind(id).execute(&mut *tx).await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            tracing::debug!(dishes_removed = dishes.rows_affected(), "Deleted dish type with its dishes");
        }

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dish_types").fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}
