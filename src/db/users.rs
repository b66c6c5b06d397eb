// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User storage operations.

use super::Db;
use crate::error::AppError;
use crate::models::User;
use chrono::Utc;
use sqlx::Row;

impl Db {
    pub(super) async fn migrate_users(&self) -> Result<(), AppError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Create a user. Fails with a bad-request error when the email is
    /// already registered.
    pub async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (email, name, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::BadRequest("Email already registered".to_string())
            }
            other => AppError::from(other),
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: email.to_string(),
            name: name.map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_user))
    }

    /// Get a user by email (login lookup).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_user))
    }

    /// Delete a user; plans, sessions, tokens and activities cascade.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}
