mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{send, test_app};

async fn login(app: &axum::Router, password: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Method::POST,
        "/auth/login",
        Some(json!({ "username": "admin", "password": password })),
        None,
    )
    .await
}

#[tokio::test]
async fn test_login_issues_token() {
    let (app, _) = test_app(true);

    let (status, body) = login(&app, "admin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userName"], "admin");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_bad_password() {
    let (app, _) = test_app(true);
    let (status, _) = login(&app, "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_required_session_guards_operations() {
    let (app, repo) = test_app(true);

    let (status, _) = send(&app, Method::GET, "/operacoes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/operacoes",
        Some(json!({ "amount": 10 })),
        Some("forged"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(repo.is_empty());

    let (_, body) = login(&app, "admin").await;
    let token = body["token"].as_str().unwrap();

    let (status, created) = send(
        &app,
        Method::POST,
        "/operacoes",
        Some(json!({ "amount": 10 })),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/operacoes/{}/aprovar", created["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::PUT, &uri, None, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let (app, _) = test_app(true);
    let (_, body) = login(&app, "admin").await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/auth/logout", None, Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/operacoes", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::POST, "/auth/logout", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_optional_by_default() {
    let (app, _) = test_app(false);
    let (status, _) = send(&app, Method::GET, "/operacoes", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
