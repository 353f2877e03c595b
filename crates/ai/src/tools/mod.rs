//! Assistant tools implementing rig-core's `Tool` trait:
//! - AddTransactionTool: record an income, expense or transfer
//! - AddBillTool: start tracking a recurring bill
//! - GetSpendingSummaryTool: income, expenses and top categories for a window
//! - GetForecastTool: month-end projection
//! - GetUpcomingBillsTool: bills due soon, overdue first
//! - GetBudgetStatusTool: spend against each budget
//! - GetGoalsTool: savings goals with progress
//!
//! Every tool is bound to one user id when the tool set is built.

pub mod bills;
pub mod budgets;
pub mod constants;
pub mod goals;
pub mod insights;
pub mod transactions;

pub use constants::*;

pub use bills::{AddBillTool, GetUpcomingBillsTool};
pub use budgets::GetBudgetStatusTool;
pub use goals::GetGoalsTool;
pub use insights::GetForecastTool;
pub use transactions::{AddTransactionTool, GetSpendingSummaryTool};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use pocketpilot_core::utils::money::{round_money, to_f64};

use crate::env::AiEnvironment;
use crate::error::AiError;

/// Container for all assistant tools.
pub struct ToolSet<E: AiEnvironment> {
    pub add_transaction: AddTransactionTool<E>,
    pub add_bill: AddBillTool<E>,
    pub spending_summary: GetSpendingSummaryTool<E>,
    pub forecast: GetForecastTool<E>,
    pub upcoming_bills: GetUpcomingBillsTool<E>,
    pub budget_status: GetBudgetStatusTool<E>,
    pub goals: GetGoalsTool<E>,
}

impl<E: AiEnvironment> ToolSet<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            add_transaction: AddTransactionTool::new(env.clone(), user_id),
            add_bill: AddBillTool::new(env.clone(), user_id),
            spending_summary: GetSpendingSummaryTool::new(env.clone(), user_id),
            forecast: GetForecastTool::new(env.clone(), user_id),
            upcoming_bills: GetUpcomingBillsTool::new(env.clone(), user_id),
            budget_status: GetBudgetStatusTool::new(env.clone(), user_id),
            goals: GetGoalsTool::new(env, user_id),
        }
    }
}

/// Parses an optional `YYYY-MM-DD` argument.
pub(crate) fn parse_date_arg(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AiError::invalid_input(format!("{} must be a YYYY-MM-DD date, got '{}'", field, raw))),
    }
}

/// Rounded money value for tool output.
pub(crate) fn money(value: Decimal) -> f64 {
    to_f64(round_money(value))
}
