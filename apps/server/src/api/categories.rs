use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::categories::{Category, CategoryType, CategoryUpdate, NewCategory};

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    category_type: Option<CategoryType>,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state
        .category_service
        .list_categories(&user.user_id, query.category_type)?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewCategory>,
) -> ApiResult<Json<Category>> {
    let created = state
        .category_service
        .create_category(&user.user_id, payload)
        .await?;
    Ok(Json(created))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    let updated = state
        .category_service
        .update_category(&user.user_id, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .category_service
        .delete_category(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}
