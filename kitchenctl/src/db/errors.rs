use crate::types::Operation;
use thiserror::Error;

/// Constraint names shared by the PostgreSQL schema and the in-memory store, so that callers
/// can tell violations apart without caring which backend produced them.
pub mod constraints {
    pub const DISH_TYPES_NAME_UNIQUE: &str = "dish_types_name_unique";
    pub const DISH_TYPES_NAME_NOT_BLANK: &str = "dish_types_name_not_blank";
    pub const COOKS_USERNAME_UNIQUE: &str = "cooks_username_unique";
    pub const COOKS_USERNAME_NOT_BLANK: &str = "cooks_username_not_blank";
    pub const COOKS_YEARS_OF_EXPERIENCE_NON_NEGATIVE: &str = "cooks_years_of_experience_non_negative";
    pub const DISHES_NAME_NOT_BLANK: &str = "dishes_name_not_blank";
    pub const DISHES_PRICE_NON_NEGATIVE: &str = "dishes_price_non_negative";
    pub const DISHES_DISH_TYPE_ID_FKEY: &str = "dishes_dish_type_id_fkey";
    pub const DISH_COOKS_COOK_ID_FKEY: &str = "dish_cooks_cook_id_fkey";
}

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Entity cannot be modified or deleted while other records depend on it
    #[error("{operation:?} cannot be applied to entity of type {entity_type}: {reason}")]
    ProtectedEntity {
        operation: Operation,
        reason: String,
        entity_type: String,
        entity_id: Option<String>,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// Name of the violated constraint, if this is a constraint violation
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::UniqueViolation { constraint, .. }
            | DbError::ForeignKeyViolation { constraint, .. }
            | DbError::CheckViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn unique(constraint: &str, table: &str, message: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            constraint: Some(constraint.to_string()),
            table: Some(table.to_string()),
            message: message.into(),
        }
    }

    pub(crate) fn foreign_key(constraint: &str, table: &str, message: impl Into<String>) -> Self {
        DbError::ForeignKeyViolation {
            constraint: Some(constraint.to_string()),
            table: Some(table.to_string()),
            message: message.into(),
        }
    }

    pub(crate) fn check(constraint: &str, table: &str, message: impl Into<String>) -> Self {
        DbError::CheckViolation {
            constraint: Some(constraint.to_string()),
            table: Some(table.to_string()),
            message: message.into(),
        }
    }
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint, table, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint, table, message }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation { constraint, table, message }
                } else {
                    // All other database errors are non-recoverable - convert to anyhow
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            // All other sqlx errors are non-recoverable - convert to anyhow with context
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, DbError>;
