// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training plan and session storage operations.

use super::Db;
use crate::error::AppError;
use crate::models::{PlanSession, SessionKind, TrainingPlan};
use chrono::{NaiveDate, Utc};
use sqlx::Row;

/// Fields for inserting a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: NaiveDate,
    pub kind: SessionKind,
    pub exercise: String,
    pub strava_activity_id: Option<String>,
    pub completed: bool,
}

impl Db {
    pub(super) async fn migrate_plans(&self) -> Result<(), AppError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                goal TEXT,
                owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plan_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plan_id INTEGER NOT NULL REFERENCES training_plans(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                kind TEXT NOT NULL,
                exercise TEXT NOT NULL,
                strava_activity_id TEXT,
                completed INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_plan_sessions_plan ON plan_sessions(plan_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ─── Plans ───────────────────────────────────────────────────

    /// Create an empty plan.
    pub async fn create_plan(
        &self,
        owner_id: i64,
        name: &str,
        goal: Option<&str>,
    ) -> Result<TrainingPlan, AppError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO training_plans (name, goal, owner_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(name)
        .bind(goal)
        .bind(owner_id)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(TrainingPlan {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            goal: goal.map(str::to_string),
            owner_id,
            created_at,
        })
    }

    /// Create a plan together with its sessions (generated plans).
    pub async fn create_plan_with_sessions(
        &self,
        owner_id: i64,
        name: &str,
        goal: Option<&str>,
        sessions: &[NewSession],
    ) -> Result<TrainingPlan, AppError> {
        let plan = self.create_plan(owner_id, name, goal).await?;
        for session in sessions {
            self.add_session(plan.id, session).await?;
        }
        Ok(plan)
    }

    /// Get a plan by id.
    pub async fn get_plan(&self, plan_id: i64) -> Result<Option<TrainingPlan>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, goal, owner_id, created_at FROM training_plans WHERE id = $1",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_plan))
    }

    /// List a user's plans, newest first.
    pub async fn list_plans(&self, owner_id: i64) -> Result<Vec<TrainingPlan>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, goal, owner_id, created_at FROM training_plans \
             WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_plan).collect())
    }

    /// Delete a plan; its sessions cascade.
    pub async fn delete_plan(&self, plan_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM training_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Sessions ────────────────────────────────────────────────

    /// Add a session to a plan.
    pub async fn add_session(
        &self,
        plan_id: i64,
        session: &NewSession,
    ) -> Result<PlanSession, AppError> {
        let result = sqlx::query(
            r"
            INSERT INTO plan_sessions (plan_id, date, kind, exercise, strava_activity_id, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(plan_id)
        .bind(session.date)
        .bind(kind_to_str(session.kind))
        .bind(&session.exercise)
        .bind(session.strava_activity_id.as_deref())
        .bind(session.completed)
        .execute(&self.pool)
        .await?;

        Ok(PlanSession {
            id: result.last_insert_rowid(),
            plan_id,
            date: session.date,
            kind: session.kind,
            exercise: session.exercise.clone(),
            strava_activity_id: session.strava_activity_id.clone(),
            completed: session.completed,
        })
    }

    /// List a plan's sessions in date order.
    pub async fn list_sessions(&self, plan_id: i64) -> Result<Vec<PlanSession>, AppError> {
        let rows = sqlx::query(
            "SELECT id, plan_id, date, kind, exercise, strava_activity_id, completed \
             FROM plan_sessions WHERE plan_id = $1 ORDER BY date",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_session).collect())
    }
}

fn row_to_plan(row: sqlx::sqlite::SqliteRow) -> TrainingPlan {
    TrainingPlan {
        id: row.get("id"),
        name: row.get("name"),
        goal: row.get("goal"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
    }
}

fn row_to_session(row: sqlx::sqlite::SqliteRow) -> PlanSession {
    PlanSession {
        id: row.get("id"),
        plan_id: row.get("plan_id"),
        date: row.get("date"),
        kind: parse_kind(row.get("kind")),
        exercise: row.get("exercise"),
        strava_activity_id: row.get("strava_activity_id"),
        completed: row.get("completed"),
    }
}

fn kind_to_str(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Run => "run",
        SessionKind::Cardio => "cardio",
        SessionKind::Rest => "rest",
        SessionKind::Other => "other",
    }
}

fn parse_kind(s: &str) -> SessionKind {
    match s {
        "run" => SessionKind::Run,
        "cardio" => SessionKind::Cardio,
        "rest" => SessionKind::Rest,
        _ => SessionKind::Other,
    }
}
