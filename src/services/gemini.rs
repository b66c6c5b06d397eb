// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini plan generation client.
//!
//! One stateless call: user prompt in, structured JSON training plan
//! out. The prompt pins the response to a fixed JSON shape which is
//! then parsed into [`GeneratedPlan`].

use crate::error::{AppError, Result};
use crate::models::SessionKind;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create a new client. The key may be absent; generation then
    /// fails at call time with a configuration error.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the base URL (for testing with a mock server).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Generate a structured training plan from a user prompt.
    pub async fn generate_plan(&self, prompt: &str) -> Result<GeneratedPlan> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::Configuration("GEMINI_API_KEY"))?;

        let full_prompt = format!(
            "Create a training plan for this request from the user: '{}'.\n\n\
             The response MUST be a valid JSON object and nothing else, with this structure:\n\
             {{\n\
               \"name\": \"Plan name (e.g. 16-week marathon build)\",\n\
               \"goal\": \"Goal description (e.g. run a marathon under 4 hours)\",\n\
               \"sessions\": [\n\
                 {{\n\
                   \"date\": \"YYYY-MM-DD\",\n\
                   \"kind\": \"run\" | \"cardio\" | \"rest\" | \"other\",\n\
                   \"exercise\": \"Session description (e.g. 5km easy pace)\"\n\
                 }}\n\
               ]\n\
             }}",
            prompt
        );

        let body = json!({
            "contents": [{"parts": [{"text": full_prompt}]}],
            "generationConfig": {
                "temperature": 1,
                "topP": 0.95,
                "topK": 64,
                "maxOutputTokens": 8192,
                "responseMimeType": "application/json",
            },
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Gemini(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Gemini(format!("HTTP {}: {}", status, body)));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Gemini(format!("JSON parse error: {}", e)))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::Gemini("Empty response from Gemini".to_string()))?;

        serde_json::from_str(&text)
            .map_err(|e| AppError::Gemini(format!("Malformed plan JSON: {}", e)))
    }
}

/// Response envelope from the generateContent endpoint.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

/// Structured plan parsed from the model's JSON output.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPlan {
    pub name: String,
    pub goal: Option<String>,
    #[serde(default)]
    pub sessions: Vec<GeneratedSession>,
}

/// One session of a generated plan.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSession {
    pub date: NaiveDate,
    pub kind: SessionKind,
    pub exercise: String,
}
