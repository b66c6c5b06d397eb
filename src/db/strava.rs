// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava token and activity storage operations.

use super::Db;
use crate::error::AppError;
use crate::models::{StravaActivity, StravaToken};
use sqlx::Row;

/// Mutable fields of a fetched activity, applied on upsert.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub strava_id: i64,
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub start_date: Option<String>,
    pub distance: Option<f64>,
    pub moving_time: Option<i64>,
}

impl Db {
    pub(super) async fn migrate_strava(&self) -> Result<(), AppError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS strava_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                access_token TEXT NOT NULL,
                refresh_token TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS strava_activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                strava_id INTEGER NOT NULL UNIQUE,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT,
                sport_type TEXT,
                start_date TEXT,
                distance REAL,
                moving_time INTEGER
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_strava_activities_user ON strava_activities(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ─── Tokens ──────────────────────────────────────────────────

    /// Get the stored OAuth token for a user, if linked.
    pub async fn get_strava_token(&self, user_id: i64) -> Result<Option<StravaToken>, AppError> {
        let row = sqlx::query(
            "SELECT user_id, access_token, refresh_token, expires_at \
             FROM strava_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_token))
    }

    /// Insert or overwrite the token for a user (one row per user).
    pub async fn upsert_strava_token(
        &self,
        user_id: i64,
        access_token: &str,
        refresh_token: &str,
        expires_at: i64,
    ) -> Result<StravaToken, AppError> {
        sqlx::query(
            r"
            INSERT INTO strava_tokens (user_id, access_token, refresh_token, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at
            ",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(StravaToken {
            user_id,
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        })
    }

    /// Delete the token (unlink).
    pub async fn delete_strava_token(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM strava_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Insert or overwrite an activity, keyed by its Strava ID.
    ///
    /// `user_id` only applies on insert; an update never reassigns
    /// ownership. Returns the stored row and whether it was created.
    pub async fn upsert_strava_activity(
        &self,
        user_id: i64,
        activity: &NewActivity,
    ) -> Result<(StravaActivity, bool), AppError> {
        let existing = sqlx::query("SELECT id, user_id FROM strava_activities WHERE strava_id = $1")
            .bind(activity.strava_id)
            .fetch_optional(&self.pool)
            .await?;

        let (id, owner_id, created) = match existing {
            Some(row) => {
                let id: i64 = row.get("id");
                sqlx::query(
                    r"
                    UPDATE strava_activities
                    SET name = $1, sport_type = $2, start_date = $3, distance = $4, moving_time = $5
                    WHERE id = $6
                    ",
                )
                .bind(activity.name.as_deref())
                .bind(activity.sport_type.as_deref())
                .bind(activity.start_date.as_deref())
                .bind(activity.distance)
                .bind(activity.moving_time)
                .bind(id)
                .execute(&self.pool)
                .await?;
                (id, row.get("user_id"), false)
            }
            None => {
                let result = sqlx::query(
                    r"
                    INSERT INTO strava_activities
                        (strava_id, user_id, name, sport_type, start_date, distance, moving_time)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ",
                )
                .bind(activity.strava_id)
                .bind(user_id)
                .bind(activity.name.as_deref())
                .bind(activity.sport_type.as_deref())
                .bind(activity.start_date.as_deref())
                .bind(activity.distance)
                .bind(activity.moving_time)
                .execute(&self.pool)
                .await?;
                (result.last_insert_rowid(), user_id, true)
            }
        };

        Ok((
            StravaActivity {
                id,
                strava_id: activity.strava_id,
                user_id: owner_id,
                name: activity.name.clone(),
                sport_type: activity.sport_type.clone(),
                start_date: activity.start_date.clone(),
                distance: activity.distance,
                moving_time: activity.moving_time,
            },
            created,
        ))
    }

    /// List a user's imported activities, most recent first.
    pub async fn list_strava_activities(
        &self,
        user_id: i64,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let rows = sqlx::query(
            "SELECT id, strava_id, user_id, name, sport_type, start_date, distance, moving_time \
             FROM strava_activities WHERE user_id = $1 ORDER BY start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_activity).collect())
    }
}

fn row_to_token(row: sqlx::sqlite::SqliteRow) -> StravaToken {
    StravaToken {
        user_id: row.get("user_id"),
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        expires_at: row.get("expires_at"),
    }
}

fn row_to_activity(row: sqlx::sqlite::SqliteRow) -> StravaActivity {
    StravaActivity {
        id: row.get("id"),
        strava_id: row.get("strava_id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        sport_type: row.get("sport_type"),
        start_date: row.get("start_date"),
        distance: row.get("distance"),
        moving_time: row.get("moving_time"),
    }
}
