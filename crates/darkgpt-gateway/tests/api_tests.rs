// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use darkgpt_agent::attachment::encode_data_uri;
use darkgpt_auth::IdentityService;
use darkgpt_config::model::AuthConfig;
use darkgpt_gateway::{body_limit_for, router, GatewayState};
use darkgpt_test_utils::{MockReply, TestHarness};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app(replies: Vec<MockReply>) -> (Router, TestHarness) {
    let harness = TestHarness::builder()
        .with_mock_replies(replies)
        .build()
        .await
        .unwrap();
    let state = GatewayState {
        identity: Arc::new(IdentityService::new(
            harness.storage.clone(),
            AuthConfig::default(),
        )),
        sessions: harness.sessions.clone(),
        max_body_bytes: body_limit_for(harness.config.chat.max_image_bytes),
    };
    (router(state), harness)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup_and_login(app: &Router) -> String {
    let (status, _) = call(
        app,
        "POST",
        "/v1/auth/signup",
        None,
        Some(json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _h) = app(vec![]).await;
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn signup_validation_and_duplicates() {
    let (app, _h) = app(vec![]).await;

    let (status, body) = call(
        &app,
        "POST",
        "/v1/auth/signup",
        None,
        Some(json!({"name": "A", "email": "nope", "password": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let form = json!({"name": "Ada", "email": "Ada@Example.com", "password": "secret1"});
    let (status, body) = call(&app, "POST", "/v1/auth/signup", None, Some(form.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ada@example.com");

    let (status, body) = call(&app, "POST", "/v1/auth/signup", None, Some(form)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("email already in use"));
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let (app, _h) = app(vec![]).await;
    signup_and_login(&app).await;

    let (status, _) = call(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong!"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn messages_require_a_token() {
    let (app, _h) = app(vec![]).await;
    let (status, _) = call(&app, "GET", "/v1/messages", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/v1/messages", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_round_trip() {
    let (app, harness) = app(vec![MockReply::Text("Salut".into())]).await;
    let token = signup_and_login(&app).await;

    let (status, body) = call(&app, "GET", "/v1/messages", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");

    let (status, body) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "Bonjour"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["role"], "assistant");
    assert_eq!(body["reply"]["content"], "Salut");

    harness.writer.flush().await.unwrap();
    let (_, body) = call(&app, "GET", "/v1/messages", Some(&token), None).await;
    let contents: Vec<_> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, ["Bonjour", "Salut"]);
}

#[tokio::test]
async fn error_statuses() {
    let (app, _h) = app(vec![MockReply::Error("overloaded".into())]).await;
    let token = signup_and_login(&app).await;

    let (status, _) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "news?", "use_web_search": true})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not configured"));

    let (status, body) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "AI backend error: overloaded");
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let (app, _h) = app(vec![]).await;
    let token = signup_and_login(&app).await;

    let (status, _) = call(&app, "POST", "/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/v1/messages", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn large_images_reach_validation() {
    let (app, harness) = app(vec![MockReply::Text("a picture".into())]).await;
    let token = signup_and_login(&app).await;
    let max = harness.config.chat.max_image_bytes;

    let image = encode_data_uri("image/png", &vec![7u8; 3 * 1024 * 1024]);
    let (status, body) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "what is this", "image": image})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["content"], "a picture");

    let image = encode_data_uri("image/png", &vec![7u8; max + 1]);
    let (status, body) = call(
        &app,
        "POST",
        "/v1/messages",
        Some(&token),
        Some(json!({"content": "and this?", "image": image})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}
