// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and JWT auth tests.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Register a user and return their access token.
async fn register(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"email": email, "name": "Test", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_me_round_trip() {
    let (app, _) = common::create_test_app(None).await;

    let token = register(&app, "alice@example.com").await;
    assert!(!token.is_empty());

    // Login with the same credentials
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({"email": "alice@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "alice@example.com");
    let login_token = json["access_token"].as_str().unwrap();

    // Fetch the profile with the login token
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", login_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["name"], "Test");
    // The password hash never leaks into responses
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"email": "not-an-email", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"email": "bob@example.com", "password": "short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (app, _) = common::create_test_app(None).await;

    register(&app, "carol@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/register",
            serde_json::json!({"email": "carol@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = common::create_test_app(None).await;

    register(&app, "dave@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({"email": "dave@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({"email": "nobody@example.com", "password": "hunter22"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = common::create_test_app(None).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
