use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::accounts::{Account, AccountUpdate, NetWorth, NewAccount};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default)]
    include_archived: bool,
}

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Account>>> {
    let accounts = state
        .account_service
        .list_accounts(&user.user_id, query.include_archived)?;
    Ok(Json(accounts))
}

async fn get_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.account_service.get_account(&user.user_id, &id)?))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewAccount>,
) -> ApiResult<Json<Account>> {
    let created = state
        .account_service
        .create_account(&user.user_id, payload)
        .await?;
    Ok(Json(created))
}

async fn update_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AccountUpdate>,
) -> ApiResult<Json<Account>> {
    let updated = state
        .account_service
        .update_account(&user.user_id, &id, payload)
        .await?;
    Ok(Json(updated))
}

/// Deleting an account archives it.
async fn archive_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Account>> {
    let archived = state
        .account_service
        .archive_account(&user.user_id, &id)
        .await?;
    Ok(Json(archived))
}

async fn get_net_worth(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<NetWorth>> {
    Ok(Json(state.account_service.get_net_worth(&user.user_id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/net-worth", get(get_net_worth))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(archive_account),
        )
}
