//! Ledger tools: record a transaction and summarise spending.

use chrono::NaiveDate;
use log::debug;
use rig::{completion::ToolDefinition, tool::Tool};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pocketpilot_core::accounts::Account;
use pocketpilot_core::categories::CategoryType;
use pocketpilot_core::reports::{category_totals, Totals};
use pocketpilot_core::transactions::{NewTransaction, TransactionType};
use pocketpilot_core::utils::time_utils::month_bounds_of;

use super::constants::MAX_CATEGORIES;
use super::{money, parse_date_arg};
use crate::env::AiEnvironment;
use crate::error::AiError;

// ============================================================================
// add_transaction
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddTransactionArgs {
    pub amount: Decimal,
    pub description: String,
    /// income, expense or transfer; defaults to expense.
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
    /// `YYYY-MM-DD`; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// Category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Account name or id; defaults to the first open account.
    #[serde(default)]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionOutput {
    pub transaction_id: String,
    pub date: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub description: String,
    pub account_name: String,
    pub category_name: Option<String>,
}

pub struct AddTransactionTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> AddTransactionTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }

    fn resolve_account(&self, wanted: Option<&str>) -> Result<Account, AiError> {
        let accounts = self
            .env
            .account_service()
            .list_accounts(&self.user_id, false)
            .map_err(AiError::tool)?;

        match wanted.map(str::trim).filter(|w| !w.is_empty()) {
            Some(wanted) => accounts
                .into_iter()
                .find(|a| a.id == wanted || a.name.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| AiError::invalid_input(format!("No open account named '{}'", wanted))),
            None => accounts
                .into_iter()
                .next()
                .ok_or_else(|| AiError::invalid_input("The user has no open accounts yet")),
        }
    }

    /// Unknown names yield `None` so a learned rule can still categorise the row.
    fn resolve_category(
        &self,
        wanted: Option<&str>,
        kind: TransactionType,
    ) -> Result<Option<String>, AiError> {
        let Some(wanted) = wanted.map(str::trim).filter(|w| !w.is_empty()) else {
            return Ok(None);
        };
        let category_type = match kind {
            TransactionType::Income => Some(CategoryType::Income),
            TransactionType::Expense => Some(CategoryType::Expense),
            TransactionType::Transfer => None,
        };
        let categories = self
            .env
            .category_service()
            .list_categories(&self.user_id, category_type)
            .map_err(AiError::tool)?;
        let found = categories
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .map(|c| c.id);
        if found.is_none() {
            debug!("No category named '{}', leaving transaction uncategorised", wanted);
        }
        Ok(found)
    }
}

impl<E: AiEnvironment> Clone for AddTransactionTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for AddTransactionTool<E> {
    const NAME: &'static str = "add_transaction";

    type Error = AiError;
    type Args = AddTransactionArgs;
    type Output = AddTransactionOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Record a transaction for the user. Amount is always positive; use transaction_type to say whether money came in (income), went out (expense) or moved between accounts (transfer). Only call this when the user clearly asked to record something.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "amount": { "type": "number", "description": "Positive amount" },
                    "description": { "type": "string", "description": "Short description, e.g. 'Lunch with Sam'" },
                    "transaction_type": { "type": "string", "enum": ["income", "expense", "transfer"] },
                    "merchant": { "type": "string" },
                    "date": { "type": "string", "description": "YYYY-MM-DD, defaults to today" },
                    "category": { "type": "string", "description": "Existing category name" },
                    "account": { "type": "string", "description": "Account name, defaults to the first open account" }
                },
                "required": ["amount", "description"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let kind = match args.transaction_type.as_deref().map(str::trim) {
            None | Some("") => TransactionType::Expense,
            Some(raw) => raw
                .to_lowercase()
                .parse::<TransactionType>()
                .map_err(AiError::invalid_input)?,
        };
        let date = parse_date_arg(args.date.as_deref(), "date")?.unwrap_or_else(|| self.env.today());
        let account = self.resolve_account(args.account.as_deref())?;
        let category_id = self.resolve_category(args.category.as_deref(), kind)?;

        let created = self
            .env
            .transaction_service()
            .create_transaction(
                &self.user_id,
                NewTransaction {
                    account_id: account.id,
                    category_id,
                    amount: args.amount,
                    transaction_type: kind,
                    description: args.description,
                    merchant: args.merchant.filter(|m| !m.trim().is_empty()),
                    date,
                    notes: None,
                    tag_ids: Vec::new(),
                    recurring_id: None,
                },
            )
            .await
            .map_err(AiError::tool)?;

        Ok(AddTransactionOutput {
            transaction_id: created.transaction.id,
            date: created.transaction.date.to_string(),
            amount: money(created.transaction.amount),
            transaction_type: created.transaction.transaction_type,
            description: created.transaction.description,
            account_name: created.account_name,
            category_name: created.category_name,
        })
    }
}

// ============================================================================
// get_spending_summary
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetSpendingSummaryArgs {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpendDto {
    pub category: String,
    pub total: f64,
    pub percent: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSpendingSummaryOutput {
    pub start_date: String,
    pub end_date: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub transaction_count: usize,
    pub categories: Vec<CategorySpendDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

pub struct GetSpendingSummaryTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> GetSpendingSummaryTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }

    /// Explicit bounds win; otherwise the current calendar month.
    fn window(&self, args: &GetSpendingSummaryArgs) -> Result<(NaiveDate, NaiveDate), AiError> {
        let today = self.env.today();
        let (month_start, month_end) = month_bounds_of(today);
        let start = parse_date_arg(args.start_date.as_deref(), "start_date")?.unwrap_or(month_start);
        let end = parse_date_arg(args.end_date.as_deref(), "end_date")?.unwrap_or(month_end);
        if start > end {
            return Err(AiError::invalid_input("start_date must not be after end_date"));
        }
        Ok((start, end))
    }
}

impl<E: AiEnvironment> Clone for GetSpendingSummaryTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for GetSpendingSummaryTool<E> {
    const NAME: &'static str = "get_spending_summary";

    type Error = AiError;
    type Args = GetSpendingSummaryArgs;
    type Output = GetSpendingSummaryOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Summarise income and spending for a date range (defaults to the current month): totals, net, and expenses per category largest first.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "start_date": { "type": "string", "description": "YYYY-MM-DD" },
                    "end_date": { "type": "string", "description": "YYYY-MM-DD" }
                },
                "required": []
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let (start, end) = self.window(&args)?;
        let rows = self
            .env
            .transaction_service()
            .list_between(&self.user_id, start, end)
            .map_err(AiError::tool)?;

        let totals = Totals::of(&rows);
        let categories = category_totals(&rows);
        let truncated = categories.len() > MAX_CATEGORIES;

        Ok(GetSpendingSummaryOutput {
            start_date: start.to_string(),
            end_date: end.to_string(),
            total_income: money(totals.income),
            total_expenses: money(totals.expenses),
            net: money(totals.net()),
            transaction_count: totals.count,
            categories: categories
                .into_iter()
                .take(MAX_CATEGORIES)
                .map(|c| CategorySpendDto {
                    category: c.category_name,
                    total: money(c.total),
                    percent: money(c.percent),
                    count: c.count,
                })
                .collect(),
            truncated: truncated.then_some(true),
        })
    }
}
