// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and activity sync.
//!
//! Handles:
//! - OAuth authorization URL construction and code exchange
//! - Token refresh when expired (60 second safety margin)
//! - Activity fetching (one page per sync)
//! - The sync workflow importing activities into local storage

use crate::db::{Db, NewActivity};
use crate::error::{AppError, Result};
use crate::models::{StravaToken, SyncResult};
use serde::Deserialize;

/// Margin before token expiration when we proactively refresh.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Activities fetched per sync (one page of the most recent).
const SYNC_PAGE_SIZE: u32 = 30;

/// OAuth scope requested from Strava.
const OAUTH_SCOPE: &str = "read,activity:read";

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Strava API client.
///
/// Credentials may be absent; operations that need them fail with a
/// configuration error at call time rather than at startup.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: String,
    /// Injected time source so tests can pin the refresh margin.
    now: fn() -> i64,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com".to_string(),
            client_id,
            client_secret,
            redirect_uri,
            now: unix_now,
        }
    }

    /// Override the base URL (for testing with a mock server).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Override the time source (for testing the refresh margin).
    pub fn with_now(mut self, now: fn() -> i64) -> Self {
        self.now = now;
        self
    }

    fn client_id(&self) -> Result<&str> {
        self.client_id
            .as_deref()
            .ok_or(AppError::Configuration("STRAVA_CLIENT_ID"))
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let id = self.client_id()?;
        let secret = self
            .client_secret
            .as_deref()
            .ok_or(AppError::Configuration("STRAVA_CLIENT_SECRET"))?;
        Ok((id, secret))
    }

    /// Build the authorization URL for the OAuth redirect.
    ///
    /// `state` is the local user id, round-tripped through Strava so
    /// the callback can tell which user authorized.
    pub fn authorize_url(&self, state: i64) -> Result<String> {
        let client_id = self.client_id()?;
        Ok(format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}&approval_prompt=auto&state={}",
            self.base_url,
            client_id,
            urlencoding::encode(&self.redirect_uri),
            OAUTH_SCOPE,
            state,
        ))
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let (client_id, client_secret) = self.credentials()?;
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaRequest(format!("Token exchange failed: {}", e)))?;

        check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let (client_id, client_secret) = self.credentials()?;
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaRequest(format!("Token refresh failed: {}", e)))?;

        check_response_json(response).await
    }

    /// Return the stored token unchanged while it is still valid past
    /// the refresh margin, otherwise refresh it.
    ///
    /// The common path makes no network call. The caller is
    /// responsible for persisting the result when the access token
    /// changed.
    pub async fn refresh_if_needed(&self, token: &StravaToken) -> Result<TokenResponse> {
        if token.expires_at > (self.now)() + TOKEN_REFRESH_MARGIN_SECS {
            return Ok(TokenResponse {
                access_token: token.access_token.clone(),
                refresh_token: token.refresh_token.clone(),
                expires_at: token.expires_at,
            });
        }

        tracing::info!(user_id = token.user_id, "Access token expiring, refreshing");
        self.refresh_token(&token.refresh_token).await
    }

    /// Fetch one page of the athlete's activities.
    pub async fn fetch_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>> {
        let response = self
            .http
            .get(format!("{}/api/v3/athlete/activities", self.base_url))
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaRequest(format!("Activity fetch failed: {}", e)))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body, carrying Strava's
/// status and body into the error on a non-2xx response.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::StravaApi {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| AppError::StravaRequest(format!("JSON parse error: {}", e)))
}

/// Token response from Strava's token endpoint (exchange and refresh).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// One activity record from the listing endpoint.
///
/// Strava owns this shape, so everything is optional at the boundary.
/// A record without an id cannot be stored and is skipped by the sync;
/// other missing fields become NULLs.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub start_date: Option<String>,
    pub distance: Option<f64>,
    pub moving_time: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - account linking and activity sync
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service owning the token lifecycle and the
/// activity sync workflow.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: Db,
}

impl StravaService {
    pub fn new(client: StravaClient, db: Db) -> Self {
        Self { client, db }
    }

    /// Authorization URL carrying the user id as the state parameter.
    pub fn authorize_url_for(&self, user_id: i64) -> Result<String> {
        self.client.authorize_url(user_id)
    }

    /// Handle the OAuth callback: exchange the code and store the token.
    pub async fn handle_oauth_callback(&self, user_id: i64, code: &str) -> Result<StravaToken> {
        let token = self.client.exchange_code(code).await?;
        let stored = self
            .db
            .upsert_strava_token(
                user_id,
                &token.access_token,
                &token.refresh_token,
                token.expires_at,
            )
            .await?;

        tracing::info!(user_id, "Strava account linked");
        Ok(stored)
    }

    /// Sync the user's most recent activities from Strava.
    ///
    /// Refreshes the token if needed, persisting it before the fetch so
    /// a later failure cannot lose a successful refresh, then fetches
    /// one page of activities and upserts each by Strava ID. Terminal
    /// on first failure; a retry is safe because the refresh is checked
    /// first and the upsert key is stable.
    pub async fn sync_activities(&self, user_id: i64) -> Result<SyncResult> {
        let stored = self
            .db
            .get_strava_token(user_id)
            .await?
            .ok_or(AppError::StravaNotLinked)?;

        let current = self.client.refresh_if_needed(&stored).await?;

        if current.access_token != stored.access_token {
            self.db
                .upsert_strava_token(
                    user_id,
                    &current.access_token,
                    &current.refresh_token,
                    current.expires_at,
                )
                .await?;
            tracing::info!(user_id, "Refreshed Strava token persisted");
        }

        let fetched = self
            .client
            .fetch_activities(&current.access_token, 1, SYNC_PAGE_SIZE)
            .await?;

        let mut result = SyncResult::default();
        if fetched.is_empty() {
            return Ok(result);
        }

        for summary in fetched {
            let Some(strava_id) = summary.id else {
                tracing::warn!(user_id, "Skipping activity record without an id");
                result.skipped += 1;
                continue;
            };

            let activity = NewActivity {
                strava_id,
                name: summary.name,
                sport_type: summary.sport_type,
                start_date: summary.start_date,
                distance: summary.distance,
                moving_time: summary.moving_time,
            };

            let (_, created) = self.db.upsert_strava_activity(user_id, &activity).await?;
            if created {
                result.imported += 1;
            } else {
                result.updated += 1;
            }
        }

        tracing::info!(
            user_id,
            imported = result.imported,
            updated = result.updated,
            skipped = result.skipped,
            "Strava sync completed"
        );

        Ok(result)
    }
}
