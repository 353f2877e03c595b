use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::budgets::{
    ApplyTemplateRequest, ApplyTemplateResult, Budget, BudgetStatus, BudgetTemplate,
    BudgetUpdate, BudgetWithCategory, NewBudget, NewBudgetTemplate,
};
use pocketpilot_core::utils::time_utils::today;

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<BudgetWithCategory>>> {
    Ok(Json(state.budget_service.list_budgets(&user.user_id)?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let budget = state
        .budget_service
        .create_budget(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    let budget = state
        .budget_service
        .update_budget(&user.user_id, &id, payload)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.budget_service.delete_budget(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_budget_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<BudgetStatus>>> {
    let status = state
        .budget_service
        .get_budget_status(&user.user_id, today())?;
    Ok(Json(status))
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<BudgetTemplate>>> {
    Ok(Json(state.budget_service.list_templates(&user.user_id)?))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewBudgetTemplate>,
) -> ApiResult<(StatusCode, Json<BudgetTemplate>)> {
    let template = state
        .budget_service
        .create_template(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .delete_template(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_template(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<ApplyTemplateRequest>,
) -> ApiResult<Json<ApplyTemplateResult>> {
    let result = state
        .budget_service
        .apply_template(&user.user_id, payload, today())
        .await?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/status", get(get_budget_status))
        .route("/budgets/{id}", put(update_budget).delete(delete_budget))
        .route(
            "/budget-templates",
            get(list_templates).post(create_template),
        )
        .route("/budget-templates/apply", post(apply_template))
        .route("/budget-templates/{id}", delete(delete_template))
}
