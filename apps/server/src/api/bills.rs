use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::bills::{
    Bill, BillCalendar, BillPaymentResult, BillSummary, BillUpdate, BillWithStatus, NewBill,
    PayBillRequest,
};
use pocketpilot_core::insights::PaymentSchedule;
use pocketpilot_core::utils::time_utils::{month_key, today};

#[derive(Deserialize)]
struct CalendarQuery {
    /// `YYYY-MM`; defaults to the current month.
    month: Option<String>,
}

async fn list_bills(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<BillWithStatus>>> {
    Ok(Json(state.bill_service.list_bills(&user.user_id, today())?))
}

async fn get_bill(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<BillWithStatus>> {
    Ok(Json(state.bill_service.get_bill(&user.user_id, &id, today())?))
}

async fn create_bill(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewBill>,
) -> ApiResult<(StatusCode, Json<Bill>)> {
    let bill = state.bill_service.create_bill(&user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

async fn update_bill(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<BillUpdate>,
) -> ApiResult<Json<Bill>> {
    let bill = state
        .bill_service
        .update_bill(&user.user_id, &id, payload)
        .await?;
    Ok(Json(bill))
}

async fn delete_bill(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.bill_service.delete_bill(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pay_bill(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Option<Json<PayBillRequest>>,
) -> ApiResult<Json<BillPaymentResult>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let result = state
        .bill_service
        .pay_bill(&user.user_id, &id, request, today())
        .await?;
    Ok(Json(result))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<BillSummary>> {
    Ok(Json(
        state.bill_service.get_bill_summary(&user.user_id, today())?,
    ))
}

async fn get_calendar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<BillCalendar>> {
    let today = today();
    let month = query.month.unwrap_or_else(|| month_key(today));
    let calendar = state
        .bill_service
        .get_calendar(&user.user_id, &month, today)?;
    Ok(Json(calendar))
}

async fn get_schedule(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<PaymentSchedule>> {
    let schedule = state
        .insights_service
        .get_payment_schedule(&user.user_id, today())?;
    Ok(Json(schedule))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .route("/bills/summary", get(get_summary))
        .route("/bills/calendar", get(get_calendar))
        .route("/bills/schedule", get(get_schedule))
        .route(
            "/bills/{id}",
            get(get_bill).put(update_bill).delete(delete_bill),
        )
        .route("/bills/{id}/pay", post(pay_bill))
}
