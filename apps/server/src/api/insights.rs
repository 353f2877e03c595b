use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::insights::{Forecast, PaydayPrediction};
use pocketpilot_core::utils::time_utils::today;

async fn get_payday(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<PaydayPrediction>>> {
    let predictions = state
        .insights_service
        .get_payday_pattern(&user.user_id, today())?;
    Ok(Json(predictions))
}

async fn get_forecast(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Forecast>> {
    Ok(Json(
        state.insights_service.get_forecast(&user.user_id, today())?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights/payday", get(get_payday))
        .route("/insights/forecast", get(get_forecast))
}
