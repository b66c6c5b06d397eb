// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for storage and API.

pub mod activity;
pub mod plan;
pub mod user;

pub use activity::{StravaActivity, StravaToken, SyncResult};
pub use plan::{PlanSession, SessionKind, TrainingPlan};
pub use user::User;
