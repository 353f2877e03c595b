//! Goals tool - savings goals with progress using rig-core's Tool trait.

use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::constants::MAX_GOALS;
use super::money;
use crate::env::AiEnvironment;
use crate::error::AiError;

/// Arguments for the get_goals tool (no required args).
#[derive(Debug, Default, Deserialize)]
pub struct GetGoalsArgs {
    /// Include goals that already reached their target.
    #[serde(default)]
    pub include_completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub remaining: f64,
    pub progress_percent: f64,
    pub target_date: Option<String>,
    pub monthly_needed: Option<f64>,
    pub is_on_track: bool,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetGoalsOutput {
    pub goals: Vec<GoalDto>,
    pub count: usize,
    pub total_target: f64,
    pub total_saved: f64,
    pub completed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_count: Option<usize>,
}

pub struct GetGoalsTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> GetGoalsTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl<E: AiEnvironment> Clone for GetGoalsTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for GetGoalsTool<E> {
    const NAME: &'static str = "get_goals";

    type Error = AiError;
    type Args = GetGoalsArgs;
    type Output = GetGoalsOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the user's savings goals with progress: target, saved amount, percent complete, target date, the monthly amount needed to reach it in time and whether it is on track.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "include_completed": {
                        "type": "boolean",
                        "description": "Also list goals that already reached their target (default true)"
                    }
                },
                "required": []
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let include_completed = args.include_completed.unwrap_or(true);
        let goals = self
            .env
            .goal_service()
            .list_goals(&self.user_id, self.env.today())
            .map_err(AiError::tool)?;

        let goals: Vec<_> = goals
            .into_iter()
            .filter(|g| include_completed || !g.goal.is_completed)
            .collect();
        let original_count = goals.len();

        let dtos: Vec<GoalDto> = goals
            .into_iter()
            .take(MAX_GOALS)
            .map(|g| GoalDto {
                id: g.goal.id,
                name: g.goal.name,
                target_amount: money(g.goal.target_amount),
                current_amount: money(g.goal.current_amount),
                remaining: money(g.remaining),
                progress_percent: money(g.percent),
                target_date: g.goal.target_date.map(|d| d.to_string()),
                monthly_needed: g.monthly_needed.map(money),
                is_on_track: g.is_on_track,
                is_completed: g.goal.is_completed,
            })
            .collect();

        let count = dtos.len();
        let truncated = original_count > count;
        let total_target = dtos.iter().map(|g| g.target_amount).sum();
        let total_saved = dtos.iter().map(|g| g.current_amount).sum();
        let completed_count = dtos.iter().filter(|g| g.is_completed).count();

        Ok(GetGoalsOutput {
            goals: dtos,
            count,
            total_target,
            total_saved,
            completed_count,
            truncated: truncated.then_some(true),
            original_count: truncated.then_some(original_count),
        })
    }
}
