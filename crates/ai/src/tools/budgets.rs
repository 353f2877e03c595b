//! Budget status tool.

use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pocketpilot_core::budgets::BudgetPeriod;

use super::money;
use crate::env::AiEnvironment;
use crate::error::AiError;

#[derive(Debug, Default, Deserialize)]
pub struct GetBudgetStatusArgs {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusDto {
    pub category: String,
    pub period: BudgetPeriod,
    pub period_start: String,
    pub period_end: String,
    pub amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub is_over_budget: bool,
    pub is_alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBudgetStatusOutput {
    pub budgets: Vec<BudgetStatusDto>,
    pub count: usize,
    pub over_budget_count: usize,
    pub alert_count: usize,
}

pub struct GetBudgetStatusTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> GetBudgetStatusTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }
}

impl<E: AiEnvironment> Clone for GetBudgetStatusTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for GetBudgetStatusTool<E> {
    const NAME: &'static str = "get_budget_status";

    type Error = AiError;
    type Args = GetBudgetStatusArgs;
    type Output = GetBudgetStatusOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get every budget with the amount spent in its current period, what is left, percent used, and whether it is over budget or past its alert threshold.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let statuses = self
            .env
            .budget_service()
            .get_budget_status(&self.user_id, self.env.today())
            .map_err(AiError::tool)?;

        let budgets: Vec<BudgetStatusDto> = statuses
            .into_iter()
            .map(|s| BudgetStatusDto {
                category: s.budget.category_name,
                period: s.budget.budget.period,
                period_start: s.period_start.to_string(),
                period_end: s.period_end.to_string(),
                amount: money(s.budget.budget.amount),
                spent: money(s.spent),
                remaining: money(s.remaining),
                percent_used: money(s.percent_used),
                is_over_budget: s.is_over_budget,
                is_alert: s.is_alert,
            })
            .collect();

        Ok(GetBudgetStatusOutput {
            count: budgets.len(),
            over_budget_count: budgets.iter().filter(|b| b.is_over_budget).count(),
            alert_count: budgets.iter().filter(|b| b.is_alert).count(),
            budgets,
        })
    }
}
