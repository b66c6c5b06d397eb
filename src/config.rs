//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and passed into each component constructor.
//! The JWT signing key is required up front; Strava and Gemini
//! credentials are optional here and checked at call time by the
//! services that need them.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite)
    pub database_url: String,
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Strava OAuth client ID
    pub strava_client_id: Option<String>,
    /// Strava OAuth client secret
    pub strava_client_secret: Option<String>,
    /// Redirect URI registered with Strava
    pub strava_redirect_uri: String,
    /// Gemini API key for plan generation
    pub gemini_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:training.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .ok()
                .map(|v| v.trim().to_string()),
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .ok()
                .map(|v| v.trim().to_string()),
            strava_redirect_uri: env::var("STRAVA_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8000/strava/callback".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8000,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            strava_client_id: Some("test_client_id".to_string()),
            strava_client_secret: Some("test_secret".to_string()),
            strava_redirect_uri: "http://localhost:8000/strava/callback".to_string(),
            gemini_api_key: Some("test_gemini_key".to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::remove_var("STRAVA_CLIENT_ID");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8000);
        assert_eq!(config.strava_client_id, None);
        assert_eq!(
            config.strava_redirect_uri,
            "http://localhost:8000/strava/callback"
        );
    }

    #[test]
    fn test_config_optional_credentials() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STRAVA_CLIENT_SECRET", " secret-with-whitespace \n");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(
            config.strava_client_secret.as_deref(),
            Some("secret-with-whitespace")
        );
    }
}
