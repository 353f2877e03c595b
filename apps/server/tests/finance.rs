mod common;

use axum::http::{header, Method};
use common::{body_json, body_text, spawn_app, TestApp};
use serde_json::json;

async fn create_account(app: &TestApp, token: &str, balance: f64) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/accounts",
            Some(token),
            Some(json!({ "name": "Checking", "accountType": "checking", "balance": balance })),
        )
        .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn transaction_validation_errors_are_flattened() {
    let app = spawn_app().await;
    let token = app.register("tx@example.com", "long-enough-pw").await;
    let account_id = create_account(&app, &token, 100.0).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/transactions",
            Some(&token),
            Some(json!({
                "accountId": account_id,
                "amount": 0,
                "description": " ",
                "date": "2024-05-01"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["fieldErrors"]["amount"].is_array());
    assert!(body["details"]["fieldErrors"]["description"].is_array());
}

#[tokio::test]
async fn expense_updates_balance_and_is_searchable() {
    let app = spawn_app().await;
    let token = app.register("flow@example.com", "long-enough-pw").await;
    let account_id = create_account(&app, &token, 100.0).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/transactions",
            Some(&token),
            Some(json!({
                "accountId": account_id,
                "amount": 25.5,
                "transactionType": "expense",
                "description": "Groceries",
                "merchant": "Corner Shop",
                "date": "2024-05-01"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/accounts/{}", account_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let account = body_json(response).await;
    assert_eq!(account["balance"], json!(74.5));

    let response = app
        .request(
            Method::GET,
            "/api/v1/transactions?search=corner&type=expense",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["description"], "Groceries");
}

#[tokio::test]
async fn resources_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let owner = app.register("owner@example.com", "long-enough-pw").await;
    let intruder = app.register("intruder@example.com", "long-enough-pw").await;
    let account_id = create_account(&app, &owner, 10.0).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/accounts/{}", account_id),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
    let app = spawn_app().await;
    let token = app.register("export@example.com", "long-enough-pw").await;
    create_account(&app, &token, 0.0).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/export/transactions.csv",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"pocket-pilot-transactions-"));
    assert!(disposition.ends_with(".csv\""));
    let body = body_text(response).await;
    assert!(body.starts_with("date,description"));

    let response = app
        .request(Method::GET, "/api/v1/export/all.json", Some(&token), None)
        .await;
    assert_eq!(response.status(), 200);
    let backup = body_json(response).await;
    assert_eq!(backup["accounts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn report_query_selects_the_report_type() {
    let app = spawn_app().await;
    let token = app.register("reports@example.com", "long-enough-pw").await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/reports?type=date-range&startDate=2024-01-01&endDate=2024-01-31",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await["type"], "date-range");
}

#[tokio::test]
async fn chat_without_api_key_is_a_client_error() {
    let app = spawn_app().await;
    let token = app.register("chat@example.com", "long-enough-pw").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/ai/chat",
            Some(&token),
            Some(json!({ "messages": [{ "role": "user", "content": "How am I doing?" }] })),
        )
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await["code"], "MISSING_API_KEY");
}
