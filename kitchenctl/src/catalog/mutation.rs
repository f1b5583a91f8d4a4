use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::models::{
    cooks::{CookCreate, CookUpdate},
    dish_types::{DishTypeCreate, DishTypeUpdate},
    dishes::{DishCreate, DishUpdate},
};
use crate::auth::password;
use crate::catalog::validation::{self, NAME_MAX_LENGTH, PERSON_NAME_MAX_LENGTH};
use crate::config::PasswordConfig;
use crate::db::errors::{DbError, constraints};
use crate::db::models::{
    cooks::{CookCreateDBRequest, CookDBResponse, CookUpdateDBRequest},
    dish_types::{DeletePolicy, DishTypeCreateDBRequest, DishTypeDBResponse, DishTypeUpdateDBRequest},
    dishes::{DishCreateDBRequest, DishDBResponse, DishUpdateDBRequest},
};
use crate::db::store::{CatalogStore, CookStore, DishStore, DishTypeStore};
use crate::errors::{Error, Result};
use crate::types::{CookId, DishId, DishTypeId};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
const REQUIRED: &str = "This field is required.";
const NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";

/// Translate a store failure into what the caller can act on.
///
/// Constraint violations become field errors, dependents blocking a delete become conflicts and
/// a missing row becomes `NotFound` for `resource`/`id`.
fn map_store_error(err: DbError, resource: &str, id: Option<i64>) -> Error {
    match err {
        DbError::NotFound => {
            return match id {
                Some(id) => Error::not_found(resource, id),
                None => Error::Database(DbError::NotFound),
            };
        }
        DbError::ProtectedEntity { .. } => {
            return Error::Conflict {
                message: Error::Database(err).user_message(),
            };
        }
        _ => {}
    }

    let constraint = err.constraint().unwrap_or_default().to_string();
    let (field, message) = match constraint.as_str() {
        constraints::DISH_TYPES_NAME_UNIQUE => ("name", "Dish type with this Name already exists."),
        constraints::COOKS_USERNAME_UNIQUE => ("username", "A user with that username already exists."),
        constraints::DISH_TYPES_NAME_NOT_BLANK | constraints::DISHES_NAME_NOT_BLANK => ("name", REQUIRED),
        constraints::COOKS_USERNAME_NOT_BLANK => ("username", REQUIRED),
        constraints::COOKS_YEARS_OF_EXPERIENCE_NON_NEGATIVE => ("years_of_experience", NON_NEGATIVE),
        constraints::DISHES_PRICE_NON_NEGATIVE => ("price", NON_NEGATIVE),
        // Deleting a referenced dish type only reaches the foreign key if the restrict
        // check raced with a concurrent insert
        constraints::DISHES_DISH_TYPE_ID_FKEY if resource == "Dish type" => {
            return Error::Conflict {
                message: "Cannot delete dish type: dishes still belong to it".to_string(),
            };
        }
        constraints::DISHES_DISH_TYPE_ID_FKEY => ("dish_type_id", INVALID_CHOICE),
        constraints::DISH_COOKS_COOK_ID_FKEY => ("cook_ids", INVALID_CHOICE),
        _ => return Error::Database(err),
    };
    Error::validation(field, message)
}

/// Write side of the catalog.
#[derive(Clone)]
pub struct MutationService {
    store: Arc<dyn CatalogStore>,
    delete_policy: DeletePolicy,
    password: PasswordConfig,
}

impl MutationService {
    pub fn new(store: Arc<dyn CatalogStore>, delete_policy: DeletePolicy, password: PasswordConfig) -> Self {
        Self {
            store,
            delete_policy,
            password,
        }
    }

    async fn hash_password(&self, raw: &str) -> Result<String> {
        validation::password(raw, &self.password)?;
        password::hash_blocking(raw.to_string(), self.password.argon2_params()).await
    }

    /// Reject unknown cooks up front so the error can name them
    async fn check_cooks_exist(&self, cook_ids: &[CookId]) -> Result<Vec<CookId>> {
        let mut ids = cook_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let found = self.store.get_cooks_bulk(ids.clone()).await?;
        if let Some(missing) = ids.iter().find(|id| !found.contains_key(*id)) {
            return Err(Error::validation(
                "cook_ids",
                format!("Select a valid choice. {missing} is not one of the available choices."),
            ));
        }
        Ok(ids)
    }

    // Dish types

    #[instrument(skip(self, request), err)]
    pub async fn create_dish_type(&self, request: DishTypeCreate) -> Result<DishTypeDBResponse> {
        let db_request = DishTypeCreateDBRequest {
            name: validation::required_text("name", &request.name, NAME_MAX_LENGTH)?,
        };
        let created = self
            .store
            .create_dish_type(&db_request)
            .await
            .map_err(|e| map_store_error(e, "Dish type", None))?;
        info!(dish_type_id = created.id, "Created dish type");
        Ok(created)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update_dish_type(&self, id: DishTypeId, request: DishTypeUpdate) -> Result<DishTypeDBResponse> {
        let db_request = DishTypeUpdateDBRequest {
            name: request
                .name
                .map(|name| validation::required_text("name", &name, NAME_MAX_LENGTH))
                .transpose()?,
        };
        self.store
            .update_dish_type(id, &db_request)
            .await
            .map_err(|e| map_store_error(e, "Dish type", Some(id)))
    }

    /// Deletes under the configured policy: `restrict` refuses while dishes remain,
    /// `cascade` removes them along with the type.
    #[instrument(skip(self), fields(policy = ?self.delete_policy), err)]
    pub async fn delete_dish_type(&self, id: DishTypeId) -> Result<()> {
        let deleted = self
            .store
            .delete_dish_type(id, self.delete_policy)
            .await
            .map_err(|e| map_store_error(e, "Dish type", Some(id)))?;
        if !deleted {
            return Err(Error::not_found("Dish type", id));
        }
        info!(dish_type_id = id, "Deleted dish type");
        Ok(())
    }

    // Cooks

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    pub async fn create_cook(&self, request: CookCreate) -> Result<CookDBResponse> {
        let username = validation::username(&request.username)?;
        let first_name = validation::optional_text("first_name", request.first_name.as_deref().unwrap_or_default(), PERSON_NAME_MAX_LENGTH)?;
        let last_name = validation::optional_text("last_name", request.last_name.as_deref().unwrap_or_default(), PERSON_NAME_MAX_LENGTH)?;
        let years_of_experience = validation::years_of_experience(request.years_of_experience.unwrap_or(0))?;
        let password_hash = match request.password.as_deref() {
            Some(raw) => Some(self.hash_password(raw).await?),
            None => None,
        };

        let db_request = CookCreateDBRequest {
            username,
            first_name,
            last_name,
            years_of_experience,
            password_hash,
        };
        let created = self
            .store
            .create_cook(&db_request)
            .await
            .map_err(|e| map_store_error(e, "Cook", None))?;
        info!(cook_id = created.id, "Created cook");
        Ok(created)
    }

    /// Partial update; without `password` the stored credential is kept
    #[instrument(skip(self, request), err)]
    pub async fn update_cook(&self, id: CookId, request: CookUpdate) -> Result<CookDBResponse> {
        let username = request.username.as_deref().map(validation::username).transpose()?;
        let first_name = request
            .first_name
            .as_deref()
            .map(|v| validation::optional_text("first_name", v, PERSON_NAME_MAX_LENGTH))
            .transpose()?;
        let last_name = request
            .last_name
            .as_deref()
            .map(|v| validation::optional_text("last_name", v, PERSON_NAME_MAX_LENGTH))
            .transpose()?;
        let years_of_experience = request.years_of_experience.map(validation::years_of_experience).transpose()?;
        let password_hash = match request.password.as_deref() {
            Some(raw) => Some(self.hash_password(raw).await?),
            None => None,
        };

        let db_request = CookUpdateDBRequest {
            username,
            first_name,
            last_name,
            years_of_experience,
            password_hash,
        };
        self.store
            .update_cook(id, &db_request)
            .await
            .map_err(|e| map_store_error(e, "Cook", Some(id)))
    }

    /// Removes the cook and their dish assignments; the dishes stay
    #[instrument(skip(self), err)]
    pub async fn delete_cook(&self, id: CookId) -> Result<()> {
        let deleted = self.store.delete_cook(id).await.map_err(|e| map_store_error(e, "Cook", Some(id)))?;
        if !deleted {
            return Err(Error::not_found("Cook", id));
        }
        info!(cook_id = id, "Deleted cook");
        Ok(())
    }

    // Dishes

    #[instrument(skip(self, request), err)]
    pub async fn create_dish(&self, request: DishCreate) -> Result<DishDBResponse> {
        let name = validation::required_text("name", &request.name, NAME_MAX_LENGTH)?;
        let description = request.description.unwrap_or_default().trim().to_string();
        let price = validation::price(validation::required("price", request.price)?)?;
        let dish_type_id = validation::required("dish_type_id", request.dish_type_id)?;
        let cook_ids = self.check_cooks_exist(&request.cook_ids).await?;

        let db_request = DishCreateDBRequest {
            name,
            description,
            price,
            dish_type_id,
            cook_ids,
        };
        let created = self
            .store
            .create_dish(&db_request)
            .await
            .map_err(|e| map_store_error(e, "Dish", None))?;
        info!(dish_id = created.id, "Created dish");
        Ok(created)
    }

    /// Partial update; a supplied `cook_ids` replaces the whole set
    #[instrument(skip(self, request), err)]
    pub async fn update_dish(&self, id: DishId, request: DishUpdate) -> Result<DishDBResponse> {
        let name = request
            .name
            .as_deref()
            .map(|v| validation::required_text("name", v, NAME_MAX_LENGTH))
            .transpose()?;
        let price = request.price.map(validation::price).transpose()?;
        let cook_ids = match request.cook_ids.as_deref() {
            Some(ids) => Some(self.check_cooks_exist(ids).await?),
            None => None,
        };

        let db_request = DishUpdateDBRequest {
            name,
            description: request.description.map(|d| d.trim().to_string()),
            price,
            dish_type_id: request.dish_type_id,
            cook_ids,
        };
        self.store
            .update_dish(id, &db_request)
            .await
            .map_err(|e| map_store_error(e, "Dish", Some(id)))
    }

    #[instrument(skip(self), err)]
    pub async fn delete_dish(&self, id: DishId) -> Result<()> {
        let deleted = self.store.delete_dish(id).await.map_err(|e| map_store_error(e, "Dish", Some(id)))?;
        if !deleted {
            return Err(Error::not_found("Dish", id));
        }
        info!(dish_id = id, "Deleted dish");
        Ok(())
    }
}
