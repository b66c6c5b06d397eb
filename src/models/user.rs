//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    /// Email address (unique, used for login)
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Bcrypt hash, never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}
