use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{hash_password, verify_password, AuthError, AuthUser},
    error::ApiResult,
    main_lib::AppState,
};
use pocketpilot_core::errors::FieldErrors;
use pocketpilot_core::users::{normalize_email, NewUser, User};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    email: String,
    password: String,
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
    token_type: &'static str,
    expires_in: u64,
    user: User,
}

fn auth_response(state: &AppState, user: User) -> Result<AuthResponse, AuthError> {
    Ok(AuthResponse {
        access_token: state.auth.issue_token(&user.id)?,
        token_type: "Bearer",
        expires_in: state.auth.expires_in().as_secs(),
        user,
    })
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let mut errors = FieldErrors::new();
    errors.check(
        body.password.chars().count() < MIN_PASSWORD_LEN,
        "password",
        "Password must be at least 8 characters",
    );
    errors.into_result()?;

    let new_user = NewUser {
        email: normalize_email(&body.email),
        name: body
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        password_hash: hash_password(&body.password)?,
    };
    new_user.validate()?;

    let user = state.user_repository.create(new_user).await?;
    let seeded = state
        .category_service
        .seed_default_categories(&user.id)
        .await?;
    tracing::info!("Registered user {} with {} default categories", user.id, seeded);

    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .user_repository
        .get_by_email(&normalize_email(&body.email))?
        .ok_or(AuthError::InvalidCredentials)?;
    verify_password(&body.password, &user.password_hash)?;
    Ok(Json(auth_response(&state, user)?))
}

async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResult<Json<User>> {
    let user = state.user_repository.get_by_id(&user.user_id)?;
    Ok(Json(user))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}
