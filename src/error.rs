// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Missing configuration: {0}")]
    Configuration(&'static str),

    #[error("No Strava account linked")]
    StravaNotLinked,

    #[error("Strava API error (HTTP {status}): {body}")]
    StravaApi { status: u16, body: String },

    #[error("Strava request failed: {0}")]
    StravaRequest(String),

    #[error("Plan generation error: {0}")]
    Gemini(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Configuration(name) => {
                tracing::error!(setting = %name, "Missing configuration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    Some(format!("{} is not configured", name)),
                )
            }
            AppError::StravaNotLinked => (
                StatusCode::BAD_REQUEST,
                "strava_not_linked",
                Some("Connect a Strava account first".to_string()),
            ),
            // The upstream status and body travel with the response so
            // the client sees what Strava actually said.
            AppError::StravaApi { status, body } => (
                StatusCode::BAD_GATEWAY,
                "strava_error",
                Some(format!("HTTP {}: {}", status, body)),
            ),
            AppError::StravaRequest(msg) => {
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::Gemini(msg) => (StatusCode::BAD_GATEWAY, "gemini_error", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strava_api_error_is_bad_gateway() {
        let err = AppError::StravaApi {
            status: 429,
            body: "Rate Limit Exceeded".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_linked_is_bad_request() {
        let response = AppError::StravaNotLinked.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_strava_api_error_message_carries_status_and_body() {
        let err = AppError::StravaApi {
            status: 500,
            body: "upstream broke".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("upstream broke"));
    }
}
