//! Database models for cooks.

use crate::types::CookId;
use chrono::{DateTime, Utc};

/// Database request for creating a new cook
#[derive(Debug, Clone)]
pub struct CookCreateDBRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
    pub password_hash: Option<String>,
}

/// Database request for updating a cook
#[derive(Debug, Clone, Default)]
pub struct CookUpdateDBRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub years_of_experience: Option<i32>,
    /// `None` keeps the existing credential
    pub password_hash: Option<String>,
}

/// Database response for a cook
#[derive(Debug, Clone, PartialEq)]
pub struct CookDBResponse {
    pub id: CookId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub years_of_experience: i32,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CookDBResponse {
    /// First and last name separated by a space, trimmed when either is blank
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}
