use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use pocketpilot_core::goals::{
    ContributionResult, Goal, GoalContribution, GoalUpdate, GoalWithProgress, NewContribution,
    NewGoal,
};
use pocketpilot_core::utils::time_utils::today;

async fn list_goals(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<GoalWithProgress>>> {
    Ok(Json(state.goal_service.list_goals(&user.user_id, today())?))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<GoalWithProgress>> {
    Ok(Json(state.goal_service.get_goal(&user.user_id, &id, today())?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = state.goal_service.create_goal(&user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    let goal = state
        .goal_service
        .update_goal(&user.user_id, &id, payload)
        .await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_contributions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<GoalContribution>>> {
    let contributions = state.goal_service.list_contributions(&user.user_id, &id)?;
    Ok(Json(contributions))
}

async fn add_contribution(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<NewContribution>,
) -> ApiResult<(StatusCode, Json<ContributionResult>)> {
    let result = state
        .goal_service
        .add_contribution(&user.user_id, &id, payload, today())
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn auto_contribute(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ContributionResult>>> {
    let results = state
        .goal_service
        .process_auto_contributions(&user.user_id, today())
        .await?;
    Ok(Json(results))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/auto-contribute", post(auto_contribute))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route(
            "/goals/{id}/contributions",
            get(list_contributions).post(add_contribution),
        )
}
