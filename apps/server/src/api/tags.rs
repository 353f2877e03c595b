use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::tags::{NewTag, Tag, TagUpdate};

async fn list_tags(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tag_service.list_tags(&user.user_id)?))
}

async fn create_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewTag>,
) -> ApiResult<Json<Tag>> {
    let tag = state.tag_service.create_tag(&user.user_id, payload).await?;
    Ok(Json(tag))
}

async fn update_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TagUpdate>,
) -> ApiResult<Json<Tag>> {
    let tag = state
        .tag_service
        .update_tag(&user.user_id, &id, payload)
        .await?;
    Ok(Json(tag))
}

async fn delete_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.tag_service.delete_tag(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", put(update_tag).delete(delete_tag))
}
