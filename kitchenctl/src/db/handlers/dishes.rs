//! Database repository for dishes and their cook associations.

use crate::db::{
    errors::{DbError, Result},
    handlers::{repository::Repository, search::contains_pattern},
    models::dishes::{DishCreateDBRequest, DishDBResponse, DishUpdateDBRequest},
};
use crate::types::{CookId, DishId, DishTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection, FromRow, PgConnection, QueryBuilder};
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing dishes
#[derive(Debug, Clone, Default)]
pub struct DishFilter {
    pub search: Option<String>, // Case-insensitive substring search on name
    pub dish_type_id: Option<DishTypeId>,
    pub cook_id: Option<CookId>,
}

impl DishFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_dish_type(mut self, dish_type_id: DishTypeId) -> Self {
        self.dish_type_id = Some(dish_type_id);
        self
    }

    pub fn with_cook(mut self, cook_id: CookId) -> Self {
        self.cook_id = Some(cook_id);
        self
    }
}

// Database entity models
#[derive(Debug, Clone, FromRow)]
struct Dish {
    pub id: DishId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub dish_type_id: DishTypeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DishCook {
    pub dish_id: DishId,
    pub cook_id: CookId,
}

impl From<(Vec<CookId>, Dish)> for DishDBResponse {
    fn from((cook_ids, dish): (Vec<CookId>, Dish)) -> Self {
        Self {
            id: dish.id,
            name: dish.name,
            description: dish.description,
            price: dish.price,
            dish_type_id: dish.dish_type_id,
            cook_ids,
            created_at: dish.created_at,
            updated_at: dish.updated_at,
        }
    }
}

/// Cook IDs per dish, each list sorted ascending
async fn cook_ids_by_dish(db: &mut PgConnection, dish_ids: &[DishId]) -> Result<HashMap<DishId, Vec<CookId>>> {
    if dish_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, DishCook>("SELECT dish_id, cook_id FROM dish_cooks WHERE dish_id = ANY($1) ORDER BY dish_id, cook_id")
        .bind(dish_ids)
        .fetch_all(&mut *db)
        .await?;

    let mut result: HashMap<DishId, Vec<CookId>> = HashMap::new();
    for row in rows {
        result.entry(row.dish_id).or_default().push(row.cook_id);
    }

    Ok(result)
}

/// Insert association rows; unknown cooks surface as `dish_cooks_cook_id_fkey` violations
async fn insert_cooks(db: &mut PgConnection, dish_id: DishId, cook_ids: &[CookId]) -> Result<()> {
    let mut cook_ids = cook_ids.to_vec();
    cook_ids.sort_unstable();
    cook_ids.dedup();

    if cook_ids.is_empty() {
        return Ok(());
    }

    sqlx::query("INSERT INTO dish_cooks (dish_id, cook_id) SELECT $1, UNNEST($2::BIGINT[])")
        .bind(dish_id)
        .bind(&cook_ids)
        .execute(&mut *db)
        .await?;

    Ok(())
}

fn attach_cooks(dishes: Vec<Dish>, mut cook_ids: HashMap<DishId, Vec<CookId>>) -> Vec<DishDBResponse> {
    dishes
        .into_iter()
        .map(|dish| {
            let ids = cook_ids.remove(&dish.id).unwrap_or_default();
            DishDBResponse::from((ids, dish))
        })
        .collect()
}

pub struct Dishes<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Dishes<'c> {
    type CreateRequest = DishCreateDBRequest;
    type UpdateRequest = DishUpdateDBRequest;
    type Response = DishDBResponse;
    type Id = DishId;
    type Filter = DishFilter;

    #[instrument(skip(self, request), fields(name = %request.name, dish_type_id = request.dish_type_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // The dish and its association rows touch two tables, so always use a transaction
        let mut tx = self.db.begin().await?;

        let dish = sqlx::query_as::<_, Dish>(
            r#"
            INSERT INTO dishes (name, description, price, dish_type_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.dish_type_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_cooks(&mut tx, dish.id, &request.cook_ids).await?;
        let mut cook_ids = cook_ids_by_dish(&mut tx, &[dish.id]).await?;

        tx.commit().await?;

        Ok(DishDBResponse::from((cook_ids.remove(&dish.id).unwrap_or_default(), dish)))
    }

    #[instrument(skip(self), fields(dish_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let dish = sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        match dish {
            Some(dish) => {
                let cook_ids = cook_ids_by_dish(&mut *self.db, &[dish.id]).await?;
                Ok(attach_cooks(vec![dish], cook_ids).pop())
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let dishes = sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        let dish_ids: Vec<DishId> = dishes.iter().map(|d| d.id).collect();
        let cook_ids = cook_ids_by_dish(&mut *self.db, &dish_ids).await?;

        Ok(attach_cooks(dishes, cook_ids).into_iter().map(|d| (d.id, d)).collect())
    }

    #[instrument(skip(self, filter), fields(search = filter.search.as_deref(), dish_type_id = filter.dish_type_id, cook_id = filter.cook_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT * FROM dishes WHERE 1=1");

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(" AND name ILIKE ");
            query.push_bind(contains_pattern(search));
        }

        if let Some(dish_type_id) = filter.dish_type_id {
            query.push(" AND dish_type_id = ");
            query.push_bind(dish_type_id);
        }

        if let Some(cook_id) = filter.cook_id {
            query.push(" AND EXISTS (SELECT 1 FROM dish_cooks dc WHERE dc.dish_id = dishes.id AND dc.cook_id = ");
            query.push_bind(cook_id);
            query.push(")");
        }

        query.push(" ORDER BY id");

        let dishes = query.build_query_as::<Dish>().fetch_all(&mut *self.db).await?;

        let dish_ids: Vec<DishId> = dishes.iter().map(|d| d.id).collect();
        let cook_ids = cook_ids_by_dish(&mut *self.db, &dish_ids).await?;

        Ok(attach_cooks(dishes, cook_ids))
    }

    /// Association rows in `dish_cooks` go with the dish (ON DELETE CASCADE)
    #[instrument(skip(self), fields(dish_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(dish_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // This update may replace association rows, so regardless of the connection passed in we need a transaction
        let mut tx = self.db.begin().await?;

        let dish = sqlx::query_as::<_, Dish>(
            r#"
            UPDATE dishes SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                dish_type_id = COALESCE($5, dish_type_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.dish_type_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::NotFound)?;

        if let Some(new_cook_ids) = &request.cook_ids {
            sqlx::query("DELETE FROM dish_cooks WHERE dish_id = $1").bind(id).execute(&mut *tx).await?;
            insert_cooks(&mut tx, id, new_cook_ids).await?;
        }

        let mut cook_ids = cook_ids_by_dish(&mut tx, &[id]).await?;

        tx.commit().await?;

        Ok(DishDBResponse::from((cook_ids.remove(&id).unwrap_or_default(), dish)))
    }
}

impl<'c> Dishes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes").fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}
