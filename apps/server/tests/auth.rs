mod common;

use axum::http::Method;
use common::{body_json, spawn_app};
use serde_json::json;

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = spawn_app().await;

    let response = app.request(Method::GET, "/api/v1/accounts", None, None).await;
    assert_eq!(response.status(), 401);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");

    let response = app
        .request(Method::GET, "/api/v1/accounts", Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn register_login_and_access_protected_route() {
    let app = spawn_app().await;
    let token = app.register("Pilot@Example.com", "correct-horse").await;

    let response = app
        .request(Method::GET, "/api/v1/auth/me", Some(&token), None)
        .await;
    assert_eq!(response.status(), 200);
    let me = body_json(response).await;
    assert_eq!(me["email"], "pilot@example.com");
    assert!(me.get("passwordHash").is_none());

    // Registration seeds the default categories
    let response = app
        .request(Method::GET, "/api/v1/categories", Some(&token), None)
        .await;
    assert_eq!(response.status(), 200);
    assert!(!body_json(response).await.as_array().unwrap().is_empty());

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "pilot@example.com", "password": "correct-horse" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let login = body_json(response).await;
    assert_eq!(login["tokenType"], "Bearer");
    let login_token = login["accessToken"].as_str().unwrap();

    let response = app
        .request(Method::GET, "/api/v1/accounts", Some(login_token), None)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = spawn_app().await;
    app.register("someone@example.com", "long-enough-pw").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "someone@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "long-enough-pw" })),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn register_rejects_short_password_and_duplicate_email() {
    let app = spawn_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "short@example.com", "password": "abc" })),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["fieldErrors"]["password"].is_array());

    app.register("dup@example.com", "long-enough-pw").await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "DUP@example.com", "password": "long-enough-pw" })),
        )
        .await;
    assert_eq!(response.status(), 409);
}
