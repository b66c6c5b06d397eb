// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod gemini;
pub mod strava;

pub use gemini::{GeminiClient, GeneratedPlan};
pub use strava::{StravaClient, StravaService};
