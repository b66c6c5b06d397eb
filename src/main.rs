// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training-Tracker API Server
//!
//! Backend for managing training plans, generating plans from a
//! prompt, and importing completed activities from Strava.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use training_tracker::{
    config::Config,
    db::Db,
    services::{GeminiClient, StravaClient, StravaService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Training-Tracker API");

    // Open the database and run migrations
    let db = Db::new(&config.database_url)
        .await
        .expect("Failed to open database");

    // Initialize Strava service
    let strava_client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        config.strava_redirect_uri.clone(),
    );
    let strava = StravaService::new(strava_client, db.clone());

    // Initialize Gemini client for plan generation
    let gemini = GeminiClient::new(config.gemini_api_key.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        strava,
        gemini,
    });

    // Build router
    let app = training_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("training_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
