// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava token and imported activity models.

use serde::Serialize;

/// Per-user Strava OAuth credentials.
///
/// One row per user; overwritten in place on refresh, no history kept.
#[derive(Debug, Clone, Serialize)]
pub struct StravaToken {
    pub user_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (epoch seconds)
    pub expires_at: i64,
}

/// Imported Strava activity, deduplicated by `strava_id`.
#[derive(Debug, Clone, Serialize)]
pub struct StravaActivity {
    pub id: i64,
    /// Strava's activity ID - globally unique, the upsert key
    pub strava_id: i64,
    /// Owning user (assigned on first import only)
    pub user_id: i64,
    /// Activity name/title
    pub name: Option<String>,
    /// Sport type (Run, Ride, etc.)
    pub sport_type: Option<String>,
    /// Start timestamp exactly as Strava reports it, never reparsed
    pub start_date: Option<String>,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Moving time in seconds
    pub moving_time: Option<i64>,
}

/// Counts for one sync invocation. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Activities newly created this sync
    pub imported: u32,
    /// Activities that already existed and were overwritten
    pub updated: u32,
    /// Records dropped because they carried no usable identifier
    pub skipped: u32,
}
