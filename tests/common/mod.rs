// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use training_tracker::config::Config;
use training_tracker::db::Db;
use training_tracker::routes::create_router;
use training_tracker::services::{GeminiClient, StravaClient, StravaService};
use training_tracker::AppState;

/// Create an in-memory test database with migrations applied.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

/// Strava client with test credentials pointed at a mock server.
#[allow(dead_code)]
pub fn test_strava_client(base_url: &str) -> StravaClient {
    StravaClient::new(
        Some("test_client_id".to_string()),
        Some("test_secret".to_string()),
        "http://localhost:8000/strava/callback".to_string(),
    )
    .with_base_url(base_url)
}

/// Create a test app backed by an in-memory database.
///
/// When `mock_url` is given, the Strava and Gemini clients both point
/// at it (their request paths never overlap).
#[allow(dead_code)]
pub async fn create_test_app(mock_url: Option<&str>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;

    let mut strava_client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        config.strava_redirect_uri.clone(),
    );
    let mut gemini = GeminiClient::new(config.gemini_api_key.clone());

    if let Some(url) = mock_url {
        strava_client = strava_client.with_base_url(url);
        gemini = gemini.with_base_url(url);
    }

    let strava = StravaService::new(strava_client, db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        strava,
        gemini,
    });

    (create_router(state.clone()), state)
}
