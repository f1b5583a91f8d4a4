//! Common type definitions shared by the store, services and HTTP layer.
//!
//! # ID Types
//!
//! All entity IDs are database-assigned 64-bit integers (`BIGSERIAL` in PostgreSQL, a
//! monotonically increasing counter in the in-memory store), so ordering by ID is the same as
//! ordering by creation time:
//!
//! - [`DishTypeId`]: Dish type (category) identifier
//! - [`CookId`]: Cook (staff member and login account) identifier
//! - [`DishId`]: Dish identifier

use std::fmt;

// Type aliases for IDs
pub type DishTypeId = i64;
pub type CookId = i64;
pub type DishId = i64;

/// Operations that can be refused by a store-level protection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete => write!(f, "delete"),
        }
    }
}
