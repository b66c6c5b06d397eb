// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training plan routes.

use crate::db::NewSession;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PlanSession, SessionKind, TrainingPlan};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", post(create_plan).get(list_plans))
        .route("/api/plans/generate", post(generate_plan))
        .route("/api/plans/{id}", get(get_plan).delete(delete_plan))
        .route(
            "/api/plans/{id}/sessions",
            post(add_session).get(list_sessions),
        )
}

/// Plan creation payload.
#[derive(Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub goal: Option<String>,
}

/// Session creation payload.
#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    #[serde(default = "default_kind")]
    pub kind: SessionKind,
    pub exercise: String,
    #[serde(default)]
    pub strava_activity_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

fn default_kind() -> SessionKind {
    SessionKind::Run
}

/// Prompt for plan generation.
#[derive(Deserialize, Validate)]
pub struct GeneratePlanRequest {
    #[validate(length(min = 1))]
    pub prompt: String,
}

/// A plan with its sessions.
#[derive(Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: TrainingPlan,
    pub sessions: Vec<PlanSession>,
}

/// Load a plan and verify the caller owns it. Other users' plans look
/// like they don't exist.
async fn owned_plan(state: &AppState, user_id: i64, plan_id: i64) -> Result<TrainingPlan> {
    let plan = state
        .db
        .get_plan(plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {}", plan_id)))?;

    if plan.owner_id != user_id {
        return Err(AppError::NotFound(format!("Plan {}", plan_id)));
    }

    Ok(plan)
}

/// Create an empty plan.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<Json<TrainingPlan>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let plan = state
        .db
        .create_plan(auth.user_id, &payload.name, payload.goal.as_deref())
        .await?;

    Ok(Json(plan))
}

/// List the caller's plans.
async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<TrainingPlan>>> {
    let plans = state.db.list_plans(auth.user_id).await?;
    Ok(Json(plans))
}

/// Get a plan with its sessions.
async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
) -> Result<Json<PlanResponse>> {
    let plan = owned_plan(&state, auth.user_id, plan_id).await?;
    let sessions = state.db.list_sessions(plan.id).await?;
    Ok(Json(PlanResponse { plan, sessions }))
}

/// Delete a plan and its sessions.
async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
) -> Result<StatusCode> {
    owned_plan(&state, auth.user_id, plan_id).await?;
    state.db.delete_plan(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a session to a plan.
async fn add_session(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<PlanSession>> {
    owned_plan(&state, auth.user_id, plan_id).await?;

    let session = NewSession {
        date: payload.date,
        kind: payload.kind,
        exercise: payload.exercise,
        strava_activity_id: payload.strava_activity_id,
        completed: payload.completed,
    };

    let stored = state.db.add_session(plan_id, &session).await?;
    Ok(Json(stored))
}

/// List a plan's sessions in date order.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(plan_id): Path<i64>,
) -> Result<Json<Vec<PlanSession>>> {
    owned_plan(&state, auth.user_id, plan_id).await?;
    let sessions = state.db.list_sessions(plan_id).await?;
    Ok(Json(sessions))
}

/// Generate a plan from a prompt via Gemini and persist it.
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<GeneratePlanRequest>,
) -> Result<Json<PlanResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let generated = state.gemini.generate_plan(&payload.prompt).await?;

    let sessions: Vec<NewSession> = generated
        .sessions
        .iter()
        .map(|s| NewSession {
            date: s.date,
            kind: s.kind,
            exercise: s.exercise.clone(),
            strava_activity_id: None,
            completed: false,
        })
        .collect();

    let plan = state
        .db
        .create_plan_with_sessions(
            auth.user_id,
            &generated.name,
            generated.goal.as_deref(),
            &sessions,
        )
        .await?;

    let sessions = state.db.list_sessions(plan.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        plan_id = plan.id,
        sessions = sessions.len(),
        "Generated training plan"
    );

    Ok(Json(PlanResponse { plan, sessions }))
}
