use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::transactions::{
    NewTransaction, TransactionFilter, TransactionPage, TransactionUpdate,
    TransactionWithDetails,
};

#[derive(Deserialize)]
struct BulkDeleteRequest {
    ids: Vec<String>,
}

#[derive(Serialize)]
struct BulkDeleteResponse {
    deleted: usize,
}

async fn search_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<TransactionPage>> {
    let page = state
        .transaction_service
        .search_transactions(&user.user_id, filter)?;
    Ok(Json(page))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionWithDetails>> {
    let transaction = state
        .transaction_service
        .get_transaction(&user.user_id, &id)?;
    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<TransactionWithDetails>)> {
    let created = state
        .transaction_service
        .create_transaction(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TransactionUpdate>,
) -> ApiResult<Json<TransactionWithDetails>> {
    let updated = state
        .transaction_service
        .update_transaction(&user.user_id, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_delete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state
        .transaction_service
        .bulk_delete(&user.user_id, body.ids)
        .await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(search_transactions).post(create_transaction),
        )
        .route("/transactions/bulk-delete", post(bulk_delete))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
