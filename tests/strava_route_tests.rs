// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava linking and sync endpoint tests.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method as http_method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, email: &str) -> (i64, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"email": email, "password": "hunter22"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    (
        json["user"]["id"].as_i64().unwrap(),
        json["access_token"].as_str().unwrap().to_string(),
    )
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_connect_redirects_to_strava() {
    let (app, _) = common::create_test_app(None).await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let response = app
        .oneshot(get_request("/api/strava/connect", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.contains("/oauth/authorize"));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains(&format!("state={}", user_id)));
}

#[tokio::test]
async fn test_connect_url_returns_json() {
    let (app, _) = common::create_test_app(None).await;
    let (user_id, token) = register(&app, "bob@example.com").await;

    let response = app
        .oneshot(get_request("/api/strava/connect-url", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let url = json["url"].as_str().unwrap();
    assert!(url.contains("scope=read,activity:read"));
    assert!(url.contains(&format!("state={}", user_id)));
}

#[tokio::test]
async fn test_callback_rejects_non_integer_state() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/strava/callback?code=abc&state=not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_rejects_unknown_user() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/strava/callback?code=abc&state=9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_stores_token_and_redirects() {
    let server = MockServer::start().await;
    let (app, state) = common::create_test_app(Some(&server.uri())).await;
    let (user_id, _) = register(&app, "carol@example.com").await;

    Mock::given(http_method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "expires_at": 1_900_000_000i64,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/strava/callback?code=authcode&state={}", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(location, "http://localhost:3000/dashboard");

    let token = state.db.get_strava_token(user_id).await.unwrap().unwrap();
    assert_eq!(token.access_token, "A1");
    assert_eq!(token.refresh_token, "R1");
    assert_eq!(token.expires_at, 1_900_000_000);
}

#[tokio::test]
async fn test_callback_exchange_failure_propagates() {
    let server = MockServer::start().await;
    let (app, state) = common::create_test_app(Some(&server.uri())).await;
    let (user_id, _) = register(&app, "dave@example.com").await;

    Mock::given(http_method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid code"))
        .mount(&server)
        .await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/strava/callback?code=bad&state={}", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(state.db.get_strava_token(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sync_endpoint_returns_counts() {
    let server = MockServer::start().await;
    let (app, state) = common::create_test_app(Some(&server.uri())).await;
    let (user_id, token) = register(&app, "erin@example.com").await;

    // Link with a token valid well past the refresh margin
    let expires_at = chrono::Utc::now().timestamp() + 3600;
    state
        .db
        .upsert_strava_token(user_id, "A1", "R1", expires_at)
        .await
        .unwrap();

    Mock::given(http_method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 111,
            "name": "Lunch Run",
            "sport_type": "Run",
            "start_date": "2026-05-02T12:00:00Z",
            "distance": 8100.5,
            "moving_time": 2400
        }])))
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/strava/sync")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["imported"], 1);
    assert_eq!(json["updated"], 0);
    assert_eq!(json["skipped"], 0);

    // The imported activity is visible in the listing
    let response = app
        .oneshot(get_request("/api/strava/activities", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let activities = body_json(response).await;
    assert_eq!(activities.as_array().unwrap().len(), 1);
    assert_eq!(activities[0]["strava_id"], 111);
    assert_eq!(activities[0]["name"], "Lunch Run");
}

#[tokio::test]
async fn test_sync_without_link_fails() {
    let (app, _) = common::create_test_app(None).await;
    let (_, token) = register(&app, "frank@example.com").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/strava/sync")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "strava_not_linked");
}
