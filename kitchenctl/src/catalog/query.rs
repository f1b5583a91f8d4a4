use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use crate::api::models::overview::OverviewResponse;
use crate::db::handlers::{CookFilter, DishFilter, DishTypeFilter};
use crate::db::models::{cooks::CookDBResponse, dish_types::DishTypeDBResponse, dishes::DishDBResponse};
use crate::db::store::{CatalogStore, CookStore, DishStore, DishTypeStore};
use crate::errors::{Error, Result};
use crate::types::{CookId, DishId, DishTypeId};

/// Empty search strings behave like no search at all
fn non_empty(search: Option<&str>) -> Option<&str> {
    search.filter(|s| !s.is_empty())
}

/// Read side of the catalog. All results are ordered by ID.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn CatalogStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every dish type with the number of dishes it owns (zero included)
    #[instrument(skip(self), err)]
    pub async fn list_dish_types(&self, search: Option<&str>) -> Result<Vec<DishTypeDBResponse>> {
        let mut filter = DishTypeFilter::default();
        if let Some(search) = non_empty(search) {
            filter = filter.with_search(search);
        }
        Ok(self.store.list_dish_types(&filter).await?)
    }

    /// Cooks whose first name, last name or username contains `query`, ignoring case.
    ///
    /// The query is used as given: `" ford"` only matches values containing the leading space.
    #[instrument(skip(self), err)]
    pub async fn search_cooks(&self, query: Option<&str>) -> Result<Vec<CookDBResponse>> {
        let mut filter = CookFilter::default();
        if let Some(query) = non_empty(query) {
            filter = filter.with_search(query);
        }
        Ok(self.store.list_cooks(&filter).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn list_dishes(&self, mut filter: DishFilter) -> Result<Vec<DishDBResponse>> {
        filter.search = filter.search.filter(|s| !s.is_empty());
        Ok(self.store.list_dishes(&filter).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_dish_type(&self, id: DishTypeId) -> Result<DishTypeDBResponse> {
        self.store
            .get_dish_type(id)
            .await?
            .ok_or_else(|| Error::not_found("Dish type", id))
    }

    #[instrument(skip(self), err)]
    pub async fn get_cook(&self, id: CookId) -> Result<CookDBResponse> {
        self.store.get_cook(id).await?.ok_or_else(|| Error::not_found("Cook", id))
    }

    #[instrument(skip(self), err)]
    pub async fn get_cook_by_username(&self, username: &str) -> Result<Option<CookDBResponse>> {
        Ok(self.store.get_cook_by_username(username).await?)
    }

    /// Cooks for the given IDs; unknown IDs are simply absent from the map
    #[instrument(skip(self), fields(count = ids.len()), err)]
    pub async fn get_cooks_bulk(&self, ids: Vec<CookId>) -> Result<HashMap<CookId, CookDBResponse>> {
        Ok(self.store.get_cooks_bulk(ids).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_dish(&self, id: DishId) -> Result<DishDBResponse> {
        self.store.get_dish(id).await?.ok_or_else(|| Error::not_found("Dish", id))
    }

    /// Record counts for the landing page
    #[instrument(skip(self), err)]
    pub async fn overview(&self) -> Result<OverviewResponse> {
        Ok(OverviewResponse {
            dish_types_count: self.store.count_dish_types().await?,
            cooks_count: self.store.count_cooks().await?,
            dishes_count: self.store.count_dishes().await?,
        })
    }
}
