use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::reports::{Report, ReportRequest};

/// `GET /reports?type=<report-type>&...` where the remaining parameters depend on the type.
async fn get_report(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(request): Query<ReportRequest>,
) -> ApiResult<Json<Report>> {
    Ok(Json(state.report_service.generate(&user.user_id, request)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/reports", get(get_report))
}
