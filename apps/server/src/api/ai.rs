use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_ai::{ChatRequest, ChatResponse};
use pocketpilot_core::ai::{AiLearningRule, AiMemory, AiSummary, CategorySuggestion, MemoryUpsert};
use pocketpilot_core::utils::time_utils::{add_months, month_key, today};

async fn chat(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.ai_chat_service.chat(&user.user_id, payload).await?;
    Ok(Json(response))
}

async fn list_memories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<AiMemory>>> {
    Ok(Json(state.memory_service.list_memories(&user.user_id)?))
}

async fn upsert_memory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<MemoryUpsert>,
) -> ApiResult<Json<AiMemory>> {
    let memory = state
        .memory_service
        .upsert_memory(&user.user_id, payload)
        .await?;
    Ok(Json(memory))
}

async fn delete_memory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .memory_service
        .delete_memory(&user.user_id, &key)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rules(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<AiLearningRule>>> {
    Ok(Json(state.rule_service.list_rules(&user.user_id)?))
}

async fn delete_rule(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.rule_service.delete_rule(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct SummaryQuery {
    /// `YYYY-MM`; defaults to the previous month.
    month: Option<String>,
    #[serde(default)]
    refresh: bool,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<AiSummary>> {
    let period = query
        .month
        .unwrap_or_else(|| month_key(add_months(today(), -1)));
    let summary = state
        .summary_service
        .get_or_generate_summary(&user.user_id, &period, query.refresh)
        .await?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
struct SuggestCategoryBody {
    text: String,
}

async fn suggest_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<SuggestCategoryBody>,
) -> ApiResult<Json<Option<CategorySuggestion>>> {
    let suggestion = state
        .rule_service
        .suggest_category(&user.user_id, &payload.text)?;
    Ok(Json(suggestion))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ai/chat", post(chat))
        .route("/ai/memory", get(list_memories).put(upsert_memory))
        .route("/ai/memory/{key}", delete(delete_memory))
        .route("/ai/rules", get(list_rules))
        .route("/ai/rules/{id}", delete(delete_rule))
        .route("/ai/summary", get(get_summary))
        .route("/ai/suggest-category", post(suggest_category))
}
