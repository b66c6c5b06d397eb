// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training plan and session models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user's training plan.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingPlan {
    pub id: i64,
    /// Plan name (e.g. "16-week marathon build")
    pub name: String,
    /// Free-form goal description
    pub goal: Option<String>,
    /// Owning user
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Kind of a planned session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Run,
    Cardio,
    Rest,
    Other,
}

/// A dated session within a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSession {
    pub id: i64,
    pub plan_id: i64,
    /// Scheduled date
    pub date: NaiveDate,
    pub kind: SessionKind,
    /// What to do (e.g. "5km easy pace")
    pub exercise: String,
    /// Strava activity linked to this session, if completed there
    pub strava_activity_id: Option<String>,
    pub completed: bool,
}
