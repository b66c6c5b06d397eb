// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava account linking and activity sync routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StravaActivity, SyncResult};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public routes (the OAuth callback arrives from Strava's redirect,
/// not from an authenticated client).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/strava/callback", get(callback))
}

/// Protected routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/strava/connect", get(connect))
        .route("/api/strava/connect-url", get(connect_url))
        .route("/api/strava/sync", post(sync))
        .route("/api/strava/activities", get(list_activities))
}

/// Redirect the user to Strava's authorization page.
async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Redirect> {
    let url = state.strava.authorize_url_for(auth.user_id)?;
    Ok(Redirect::temporary(&url))
}

/// Authorization URL as JSON, for client-side navigation.
#[derive(Serialize)]
pub struct ConnectUrlResponse {
    pub url: String,
}

async fn connect_url(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ConnectUrlResponse>> {
    let url = state.strava.authorize_url_for(auth.user_id)?;
    Ok(Json(ConnectUrlResponse { url }))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, store the token, and send the
/// user back to the dashboard.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    // The state parameter round-trips the user id through Strava.
    let user_id: i64 = params
        .state
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid state parameter".to_string()))?;

    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown user in state parameter".to_string()))?;

    // The user may have denied access on Strava's side.
    if let Some(error) = params.error {
        tracing::warn!(user_id, error = %error, "OAuth error from Strava");
        let redirect = format!("{}/dashboard?error={}", state.config.frontend_url, error);
        return Ok(Redirect::temporary(&redirect));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    state.strava.handle_oauth_callback(user_id, &code).await?;

    let dashboard = format!("{}/dashboard", state.config.frontend_url);
    Ok(Redirect::temporary(&dashboard))
}

/// Trigger a sync of recent Strava activities.
async fn sync(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SyncResult>> {
    let result = state.strava.sync_activities(auth.user_id).await?;
    Ok(Json(result))
}

/// List the caller's imported activities.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<StravaActivity>>> {
    let activities = state.db.list_strava_activities(auth.user_id).await?;
    Ok(Json(activities))
}
