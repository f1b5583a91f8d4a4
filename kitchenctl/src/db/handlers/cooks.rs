//! Database repository for cooks.

use crate::db::{
    errors::{DbError, Result},
    handlers::{repository::Repository, search::contains_pattern},
    models::cooks::{CookCreateDBRequest, CookDBResponse, CookUpdateDBRequest},
};
use crate::types::CookId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, QueryBuilder};
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing cooks
#[derive(Debug, Clone, Default)]
pub struct CookFilter {
    /// Case-insensitive substring match against first name, last name or username.
    /// Not trimmed; an empty string matches everyone.
    pub search: Option<String>,
}

impl CookFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Cook {
    pub id: CookId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cook> for CookDBResponse {
    fn from(cook: Cook) -> Self {
        Self {
            id: cook.id,
            username: cook.username,
            first_name: cook.first_name,
            last_name: cook.last_name,
            years_of_experience: cook.years_of_experience,
            password_hash: cook.password_hash,
            created_at: cook.created_at,
            updated_at: cook.updated_at,
        }
    }
}

pub struct Cooks<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Cooks<'c> {
    type CreateRequest = CookCreateDBRequest;
    type UpdateRequest = CookUpdateDBRequest;
    type Response = CookDBResponse;
    type Id = CookId;
    type Filter = CookFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let cook = sqlx::query_as::<_, Cook>(
            r#"
            INSERT INTO cooks (username, first_name, last_name, years_of_experience, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.username)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.years_of_experience)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(CookDBResponse::from(cook))
    }

    #[instrument(skip(self), fields(cook_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let cook = sqlx::query_as::<_, Cook>("SELECT * FROM cooks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(cook.map(CookDBResponse::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cooks = sqlx::query_as::<_, Cook>("SELECT * FROM cooks WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(cooks.into_iter().map(|cook| (cook.id, CookDBResponse::from(cook))).collect())
    }

    #[instrument(skip(self, filter), fields(search = filter.search.as_deref()), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT * FROM cooks WHERE 1=1");

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            query.push(" AND (first_name ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR last_name ILIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR username ILIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY id");

        let cooks = query.build_query_as::<Cook>().fetch_all(&mut *self.db).await?;

        Ok(cooks.into_iter().map(CookDBResponse::from).collect())
    }

    /// Association rows in `dish_cooks` go with the cook (ON DELETE CASCADE)
    #[instrument(skip(self), fields(cook_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cooks WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(cook_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let cook = sqlx::query_as::<_, Cook>(
            r#"
            UPDATE cooks SET
                username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                years_of_experience = COALESCE($5, years_of_experience),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.username)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.years_of_experience)
        .bind(&request.password_hash)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or_else(|| DbError::NotFound)?;

        Ok(CookDBResponse::from(cook))
    }
}

impl<'c> Cooks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<CookDBResponse>> {
        let cook = sqlx::query_as::<_, Cook>("SELECT * FROM cooks WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(cook.map(CookDBResponse::from))
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cooks").fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}
