//! In-memory catalog store.
//!
//! All tables live behind a single lock, so every call observes and produces a consistent
//! snapshot, just like one PostgreSQL transaction. Suitable for tests and local demos; the data
//! is lost on restart.
//!
//! Constraint checks mirror the migration: the same uniqueness, check and foreign key rules,
//! reported with the same constraint names.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;

use super::{CookStore, DishStore, DishTypeStore};
use crate::db::errors::{DbError, Result, constraints};
use crate::db::handlers::search::contains_ignore_case;
use crate::db::handlers::{CookFilter, DishFilter, DishTypeFilter};
use crate::db::models::{
    cooks::{CookCreateDBRequest, CookDBResponse, CookUpdateDBRequest},
    dish_types::{DeletePolicy, DishTypeCreateDBRequest, DishTypeDBResponse, DishTypeUpdateDBRequest},
    dishes::{DishCreateDBRequest, DishDBResponse, DishUpdateDBRequest},
};
use crate::types::{CookId, DishId, DishTypeId, Operation};

#[derive(Debug, Clone)]
struct DishTypeRow {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct DishRow {
    name: String,
    description: String,
    price: Decimal,
    dish_type_id: DishTypeId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    dish_types: BTreeMap<DishTypeId, DishTypeRow>,
    // Cooks have no association-free derived fields, so the response shape is stored directly
    cooks: BTreeMap<CookId, CookDBResponse>,
    dishes: BTreeMap<DishId, DishRow>,
    dish_cooks: BTreeSet<(DishId, CookId)>,
    last_dish_type_id: DishTypeId,
    last_cook_id: CookId,
    last_dish_id: DishId,
}

impl Tables {
    fn dish_count(&self, dish_type_id: DishTypeId) -> i64 {
        self.dishes.values().filter(|d| d.dish_type_id == dish_type_id).count() as i64
    }

    fn dish_type_response(&self, id: DishTypeId, row: &DishTypeRow) -> DishTypeDBResponse {
        DishTypeDBResponse {
            id,
            name: row.name.clone(),
            dish_count: self.dish_count(id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn cook_ids(&self, dish_id: DishId) -> Vec<CookId> {
        self.dish_cooks
            .range((dish_id, CookId::MIN)..=(dish_id, CookId::MAX))
            .map(|(_, cook_id)| *cook_id)
            .collect()
    }

    fn dish_response(&self, id: DishId, row: &DishRow) -> DishDBResponse {
        DishDBResponse {
            id,
            name: row.name.clone(),
            description: row.description.clone(),
            price: row.price,
            dish_type_id: row.dish_type_id,
            cook_ids: self.cook_ids(id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn check_dish_type_name(&self, name: &str, own_id: Option<DishTypeId>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DbError::check(constraints::DISH_TYPES_NAME_NOT_BLANK, "dish_types", "name must not be blank"));
        }
        if self.dish_types.iter().any(|(id, row)| row.name == name && Some(*id) != own_id) {
            return Err(DbError::unique(
                constraints::DISH_TYPES_NAME_UNIQUE,
                "dish_types",
                format!("Key (name)=({name}) already exists."),
            ));
        }
        Ok(())
    }

    fn check_cook(&self, username: &str, years_of_experience: i32, own_id: Option<CookId>) -> Result<()> {
        if username.trim().is_empty() {
            return Err(DbError::check(constraints::COOKS_USERNAME_NOT_BLANK, "cooks", "username must not be blank"));
        }
        if years_of_experience < 0 {
            return Err(DbError::check(
                constraints::COOKS_YEARS_OF_EXPERIENCE_NON_NEGATIVE,
                "cooks",
                "years_of_experience must be non-negative",
            ));
        }
        if self.cooks.values().any(|cook| cook.username == username && Some(cook.id) != own_id) {
            return Err(DbError::unique(
                constraints::COOKS_USERNAME_UNIQUE,
                "cooks",
                format!("Key (username)=({username}) already exists."),
            ));
        }
        Ok(())
    }

    fn check_dish(&self, name: &str, price: Decimal, dish_type_id: DishTypeId, cook_ids: Option<&[CookId]>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DbError::check(constraints::DISHES_NAME_NOT_BLANK, "dishes", "name must not be blank"));
        }
        if price < Decimal::ZERO {
            return Err(DbError::check(constraints::DISHES_PRICE_NON_NEGATIVE, "dishes", "price must be non-negative"));
        }
        if !self.dish_types.contains_key(&dish_type_id) {
            return Err(DbError::foreign_key(
                constraints::DISHES_DISH_TYPE_ID_FKEY,
                "dishes",
                format!("Key (dish_type_id)=({dish_type_id}) is not present in table \"dish_types\"."),
            ));
        }
        if let Some(missing) = cook_ids.into_iter().flatten().find(|id| !self.cooks.contains_key(*id)) {
            return Err(DbError::foreign_key(
                constraints::DISH_COOKS_COOK_ID_FKEY,
                "dish_cooks",
                format!("Key (cook_id)=({missing}) is not present in table \"cooks\"."),
            ));
        }
        Ok(())
    }

    fn replace_cooks(&mut self, dish_id: DishId, cook_ids: &[CookId]) {
        self.dish_cooks.retain(|(d, _)| *d != dish_id);
        self.dish_cooks.extend(cook_ids.iter().map(|cook_id| (dish_id, *cook_id)));
    }

    fn remove_dish(&mut self, dish_id: DishId) -> bool {
        self.dish_cooks.retain(|(d, _)| *d != dish_id);
        self.dishes.remove(&dish_id).is_some()
    }
}

/// In-memory implementation of the catalog store traits.
///
/// # Example
/// ```ignore
/// let store = InMemoryStore::new();
/// let soup = store.create_dish_type(&DishTypeCreateDBRequest { name: "Soup".into() }).await?;
/// assert_eq!(store.count_dish_types().await?, 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DishTypeStore for InMemoryStore {
    async fn create_dish_type(&self, request: &DishTypeCreateDBRequest) -> Result<DishTypeDBResponse> {
        let mut tables = self.tables.write();
        tables.check_dish_type_name(&request.name, None)?;

        tables.last_dish_type_id += 1;
        let id = tables.last_dish_type_id;
        let now = Utc::now();
        let row = DishTypeRow {
            name: request.name.clone(),
            created_at: now,
            updated_at: now,
        };
        let response = tables.dish_type_response(id, &row);
        tables.dish_types.insert(id, row);

        Ok(response)
    }

    async fn get_dish_type(&self, id: DishTypeId) -> Result<Option<DishTypeDBResponse>> {
        let tables = self.tables.read();
        Ok(tables.dish_types.get(&id).map(|row| tables.dish_type_response(id, row)))
    }

    async fn list_dish_types(&self, filter: &DishTypeFilter) -> Result<Vec<DishTypeDBResponse>> {
        let tables = self.tables.read();
        let search = filter.search.as_deref().unwrap_or_default();

        Ok(tables
            .dish_types
            .iter()
            .filter(|(_, row)| contains_ignore_case(&row.name, search))
            .map(|(id, row)| tables.dish_type_response(*id, row))
            .collect())
    }

    async fn update_dish_type(&self, id: DishTypeId, request: &DishTypeUpdateDBRequest) -> Result<DishTypeDBResponse> {
        let mut tables = self.tables.write();
        let mut row = tables.dish_types.get(&id).cloned().ok_or(DbError::NotFound)?;

        if let Some(name) = &request.name {
            tables.check_dish_type_name(name, Some(id))?;
            row.name = name.clone();
        }
        row.updated_at = Utc::now();

        let response = tables.dish_type_response(id, &row);
        tables.dish_types.insert(id, row);

        Ok(response)
    }

    async fn delete_dish_type(&self, id: DishTypeId, policy: DeletePolicy) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.dish_types.contains_key(&id) {
            return Ok(false);
        }

        let owned: Vec<DishId> = tables
            .dishes
            .iter()
            .filter(|(_, dish)| dish.dish_type_id == id)
            .map(|(dish_id, _)| *dish_id)
            .collect();

        match policy {
            DeletePolicy::Restrict if !owned.is_empty() => {
                return Err(DbError::ProtectedEntity {
                    operation: Operation::Delete,
                    reason: format!("{} dish(es) still belong to it", owned.len()),
                    entity_type: "dish type".to_string(),
                    entity_id: Some(id.to_string()),
                });
            }
            DeletePolicy::Restrict => {}
            DeletePolicy::Cascade => {
                for dish_id in owned {
                    tables.remove_dish(dish_id);
                }
            }
        }

        Ok(tables.dish_types.remove(&id).is_some())
    }

    async fn count_dish_types(&self) -> Result<i64> {
        Ok(self.tables.read().dish_types.len() as i64)
    }
}

#[async_trait::async_trait]
impl CookStore for InMemoryStore {
    async fn create_cook(&self, request: &CookCreateDBRequest) -> Result<CookDBResponse> {
        let mut tables = self.tables.write();
        tables.check_cook(&request.username, request.years_of_experience, None)?;

        tables.last_cook_id += 1;
        let now = Utc::now();
        let cook = CookDBResponse {
            id: tables.last_cook_id,
            username: request.username.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            years_of_experience: request.years_of_experience,
            password_hash: request.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.cooks.insert(cook.id, cook.clone());

        Ok(cook)
    }

    async fn get_cook(&self, id: CookId) -> Result<Option<CookDBResponse>> {
        Ok(self.tables.read().cooks.get(&id).cloned())
    }

    async fn get_cook_by_username(&self, username: &str) -> Result<Option<CookDBResponse>> {
        Ok(self.tables.read().cooks.values().find(|cook| cook.username == username).cloned())
    }

    async fn get_cooks_bulk(&self, ids: Vec<CookId>) -> Result<HashMap<CookId, CookDBResponse>> {
        let tables = self.tables.read();
        Ok(ids
            .into_iter()
            .filter_map(|id| tables.cooks.get(&id).map(|cook| (id, cook.clone())))
            .collect())
    }

    async fn list_cooks(&self, filter: &CookFilter) -> Result<Vec<CookDBResponse>> {
        let tables = self.tables.read();
        let search = filter.search.as_deref().unwrap_or_default();

        Ok(tables
            .cooks
            .values()
            .filter(|cook| {
                contains_ignore_case(&cook.first_name, search)
                    || contains_ignore_case(&cook.last_name, search)
                    || contains_ignore_case(&cook.username, search)
            })
            .cloned()
            .collect())
    }

    async fn update_cook(&self, id: CookId, request: &CookUpdateDBRequest) -> Result<CookDBResponse> {
        let mut tables = self.tables.write();
        let mut cook = tables.cooks.get(&id).cloned().ok_or(DbError::NotFound)?;

        if let Some(username) = &request.username {
            cook.username = username.clone();
        }
        if let Some(first_name) = &request.first_name {
            cook.first_name = first_name.clone();
        }
        if let Some(last_name) = &request.last_name {
            cook.last_name = last_name.clone();
        }
        if let Some(years) = request.years_of_experience {
            cook.years_of_experience = years;
        }
        if let Some(password_hash) = &request.password_hash {
            cook.password_hash = Some(password_hash.clone());
        }
        tables.check_cook(&cook.username, cook.years_of_experience, Some(id))?;
        cook.updated_at = Utc::now();

        tables.cooks.insert(id, cook.clone());

        Ok(cook)
    }

    async fn delete_cook(&self, id: CookId) -> Result<bool> {
        let mut tables = self.tables.write();
        tables.dish_cooks.retain(|(_, cook_id)| *cook_id != id);
        Ok(tables.cooks.remove(&id).is_some())
    }

    async fn count_cooks(&self) -> Result<i64> {
        Ok(self.tables.read().cooks.len() as i64)
    }
}

#[async_trait::async_trait]
impl DishStore for InMemoryStore {
    async fn create_dish(&self, request: &DishCreateDBRequest) -> Result<DishDBResponse> {
        let mut tables = self.tables.write();
        tables.check_dish(&request.name, request.price, request.dish_type_id, Some(&request.cook_ids))?;

        tables.last_dish_id += 1;
        let id = tables.last_dish_id;
        let now = Utc::now();
        let row = DishRow {
            name: request.name.clone(),
            description: request.description.clone(),
            price: request.price,
            dish_type_id: request.dish_type_id,
            created_at: now,
            updated_at: now,
        };
        tables.replace_cooks(id, &request.cook_ids);
        let response = tables.dish_response(id, &row);
        tables.dishes.insert(id, row);

        Ok(response)
    }

    async fn get_dish(&self, id: DishId) -> Result<Option<DishDBResponse>> {
        let tables = self.tables.read();
        Ok(tables.dishes.get(&id).map(|row| tables.dish_response(id, row)))
    }

    async fn list_dishes(&self, filter: &DishFilter) -> Result<Vec<DishDBResponse>> {
        let tables = self.tables.read();
        let search = filter.search.as_deref().unwrap_or_default();

        Ok(tables
            .dishes
            .iter()
            .filter(|(_, row)| contains_ignore_case(&row.name, search))
            .filter(|(_, row)| filter.dish_type_id.is_none_or(|dt| row.dish_type_id == dt))
            .filter(|(id, _)| filter.cook_id.is_none_or(|cook_id| tables.dish_cooks.contains(&(**id, cook_id))))
            .map(|(id, row)| tables.dish_response(*id, row))
            .collect())
    }

    async fn update_dish(&self, id: DishId, request: &DishUpdateDBRequest) -> Result<DishDBResponse> {
        let mut tables = self.tables.write();
        let mut row = tables.dishes.get(&id).cloned().ok_or(DbError::NotFound)?;

        if let Some(name) = &request.name {
            row.name = name.clone();
        }
        if let Some(description) = &request.description {
            row.description = description.clone();
        }
        if let Some(price) = request.price {
            row.price = price;
        }
        if let Some(dish_type_id) = request.dish_type_id {
            row.dish_type_id = dish_type_id;
        }
        tables.check_dish(&row.name, row.price, row.dish_type_id, request.cook_ids.as_deref())?;
        row.updated_at = Utc::now();

        if let Some(cook_ids) = &request.cook_ids {
            tables.replace_cooks(id, cook_ids);
        }
        let response = tables.dish_response(id, &row);
        tables.dishes.insert(id, row);

        Ok(response)
    }

    async fn delete_dish(&self, id: DishId) -> Result<bool> {
        Ok(self.tables.write().remove_dish(id))
    }

    async fn count_dishes(&self) -> Result<i64> {
        Ok(self.tables.read().dishes.len() as i64)
    }
}
