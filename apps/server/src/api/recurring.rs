use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::recurring::{
    GenerateResult, NewRecurringTransaction, RecurringSuggestion, RecurringTransaction,
    RecurringUpdate,
};
use pocketpilot_core::utils::time_utils::today;

async fn list_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<RecurringTransaction>>> {
    Ok(Json(state.recurring_service.list_recurring(&user.user_id)?))
}

async fn get_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<RecurringTransaction>> {
    Ok(Json(
        state.recurring_service.get_recurring(&user.user_id, &id)?,
    ))
}

async fn create_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewRecurringTransaction>,
) -> ApiResult<(StatusCode, Json<RecurringTransaction>)> {
    let item = state
        .recurring_service
        .create_recurring(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RecurringUpdate>,
) -> ApiResult<Json<RecurringTransaction>> {
    let item = state
        .recurring_service
        .update_recurring(&user.user_id, &id, payload)
        .await?;
    Ok(Json(item))
}

async fn delete_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .recurring_service
        .delete_recurring(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_due(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<GenerateResult>> {
    let result = state
        .recurring_service
        .generate_due(&user.user_id, today())
        .await?;
    Ok(Json(result))
}

async fn detect_recurring(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<RecurringSuggestion>>> {
    let suggestions = state
        .recurring_service
        .detect_recurring(&user.user_id, today())?;
    Ok(Json(suggestions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recurring", get(list_recurring).post(create_recurring))
        .route("/recurring/generate", post(generate_due))
        .route("/recurring/detect", get(detect_recurring))
        .route(
            "/recurring/{id}",
            get(get_recurring)
                .put(update_recurring)
                .delete(delete_recurring),
        )
}
