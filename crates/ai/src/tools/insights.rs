//! Month-end forecast tool.

use rig::{completion::ToolDefinition, tool::Tool};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::money;
use crate::env::AiEnvironment;
use crate::error::AiError;

#[derive(Debug, Default, Deserialize)]
pub struct GetForecastArgs {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetForecastOutput {
    pub month: String,
    pub days_elapsed: u32,
    pub days_in_month: u32,
    pub spent_so_far: f64,
    pub income_so_far: f64,
    pub daily_average: f64,
    pub projected_spending: f64,
    pub remaining_bills: f64,
    pub projected_net: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_variance: Option<f64>,
}

pub struct GetForecastTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> GetForecastTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }
}

impl<E: AiEnvironment> Clone for GetForecastTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for GetForecastTool<E> {
    const NAME: &'static str = "get_forecast";

    type Error = AiError;
    type Args = GetForecastArgs;
    type Output = GetForecastOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Project this month's spending to month end from the daily average so far, including bills still to pay, and the projected net (income minus spending).".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn call(&self, _args: Self::Args) -> Result<Self::Output, Self::Error> {
        let forecast = self
            .env
            .insights_service()
            .get_forecast(&self.user_id, self.env.today())
            .map_err(AiError::tool)?;

        let has_budget = !forecast.total_budget.is_zero();
        Ok(GetForecastOutput {
            month: forecast.month,
            days_elapsed: forecast.days_elapsed,
            days_in_month: forecast.days_in_month,
            spent_so_far: money(forecast.spent_so_far),
            income_so_far: money(forecast.income_so_far),
            daily_average: money(forecast.daily_average),
            projected_spending: money(forecast.projected_spending),
            remaining_bills: money(forecast.remaining_bills),
            projected_net: money(forecast.projected_net),
            total_budget: has_budget.then(|| money(forecast.total_budget)),
            budget_variance: forecast.budget_variance.map(money),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::test_env::{MockEnvironment, USER};

    #[tokio::test]
    async fn test_forecast_tool() {
        let env = Arc::new(MockEnvironment::new());
        let tool = GetForecastTool::new(env, USER);

        let output = tool.call(GetForecastArgs::default()).await.unwrap();
        assert_eq!(output.month, "2024-06");
        assert_eq!(output.projected_spending, 1800.0);
        assert_eq!(output.total_budget, Some(2000.0));
        assert_eq!(output.budget_variance, Some(200.0));
    }
}
