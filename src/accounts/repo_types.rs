use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String, // SHA-256 hex digest, never the plaintext
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub account_created: Option<String>,
    pub last_login: Option<String>,
    pub last_profile_update: Option<String>,
}

/// Profile projection of a user row: the editable fields plus the three
/// lifecycle timestamps.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub account_created: Option<String>,
    pub last_login: Option<String>,
    pub last_profile_update: Option<String>,
}
