// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training-Tracker: personal training plans with Strava import
//!
//! This crate provides the backend API for managing training plans and
//! their sessions, generating plans from a natural-language prompt, and
//! syncing completed activities from Strava.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{GeminiClient, StravaService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub strava: StravaService,
    pub gemini: GeminiClient,
}
