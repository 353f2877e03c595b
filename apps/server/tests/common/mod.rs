#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use pocketpilot_ai::{LlmConfig, DEFAULT_MODEL};
use pocketpilot_server::{api::app_router, build_state, config::Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    _tmp: TempDir,
}

fn test_config(tmp: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        jwt_secret: b"0123456789abcdef0123456789abcdef".to_vec(),
        token_ttl: Duration::from_secs(3600),
        llm: LlmConfig {
            base_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Registers a fresh user and returns its access token.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(serde_json::json!({ "email": email, "password": password, "name": "Test" })),
            )
            .await;
        assert_eq!(response.status(), 201);
        let json = body_json(response).await;
        json["accessToken"].as_str().unwrap().to_string()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
