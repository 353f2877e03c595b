use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::transactions::TransactionFilter;
use pocketpilot_core::utils::time_utils::today;

fn attachment(kind: &str, ext: &str) -> String {
    format!(
        "attachment; filename=\"pocket-pilot-{}-{}.{}\"",
        kind,
        today().format("%Y-%m-%d"),
        ext
    )
}

async fn export_transactions_csv(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Response> {
    let body = state
        .export_service
        .export_transactions_csv(&user.user_id, filter)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment("transactions", "csv")),
        ],
        body,
    )
        .into_response())
}

async fn export_all_json(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    let export = state.export_service.export_all_json(&user.user_id)?;
    Ok((
        [(header::CONTENT_DISPOSITION, attachment("backup", "json"))],
        Json(export),
    )
        .into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/export/transactions.csv", get(export_transactions_csv))
        .route("/export/all.json", get(export_all_json))
}
