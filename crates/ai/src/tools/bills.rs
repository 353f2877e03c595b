//! Bill tools: start tracking a bill and list what is due.

use rig::{completion::ToolDefinition, tool::Tool};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pocketpilot_core::bills::{BillFrequency, BillStatus, NewBill};
use pocketpilot_core::categories::CategoryType;

use super::constants::{DEFAULT_BILL_DAYS, MAX_BILLS, MAX_BILL_DAYS};
use super::{money, parse_date_arg};
use crate::env::AiEnvironment;
use crate::error::AiError;

// ============================================================================
// add_bill
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddBillArgs {
    pub name: String,
    pub amount: Decimal,
    /// `YYYY-MM-DD`
    pub next_due_date: String,
    /// weekly, biweekly, monthly, quarterly or yearly; defaults to monthly.
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub is_autopay: Option<bool>,
    /// Expense category name.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBillOutput {
    pub bill_id: String,
    pub name: String,
    pub amount: f64,
    pub frequency: BillFrequency,
    pub next_due_date: String,
    pub is_autopay: bool,
}

pub struct AddBillTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> AddBillTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }
}

impl<E: AiEnvironment> Clone for AddBillTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for AddBillTool<E> {
    const NAME: &'static str = "add_bill";

    type Error = AiError;
    type Args = AddBillArgs;
    type Output = AddBillOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Start tracking a recurring bill (rent, subscriptions, utilities...) so the user gets due-date reminders and payment streaks.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "amount": { "type": "number", "description": "Positive amount per payment" },
                    "next_due_date": { "type": "string", "description": "YYYY-MM-DD" },
                    "frequency": {
                        "type": "string",
                        "enum": ["weekly", "biweekly", "monthly", "quarterly", "yearly"]
                    },
                    "is_autopay": { "type": "boolean" },
                    "category": { "type": "string", "description": "Existing expense category name" }
                },
                "required": ["name", "amount", "next_due_date"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let next_due_date = parse_date_arg(Some(&args.next_due_date), "next_due_date")?
            .ok_or_else(|| AiError::invalid_input("next_due_date is required"))?;
        let frequency = match args.frequency.as_deref().map(str::trim) {
            None | Some("") => BillFrequency::default(),
            Some(raw) => raw
                .to_lowercase()
                .parse::<BillFrequency>()
                .map_err(AiError::invalid_input)?,
        };

        let category_id = match args.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(name) => self
                .env
                .category_service()
                .list_categories(&self.user_id, Some(CategoryType::Expense))
                .map_err(AiError::tool)?
                .into_iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .map(|c| c.id),
            None => None,
        };

        let bill = self
            .env
            .bill_service()
            .create_bill(
                &self.user_id,
                NewBill {
                    name: args.name,
                    amount: args.amount,
                    frequency,
                    next_due_date,
                    category_id,
                    account_id: None,
                    is_autopay: args.is_autopay.unwrap_or(false),
                    reminder_days: 3,
                    notes: None,
                },
            )
            .await
            .map_err(AiError::tool)?;

        Ok(AddBillOutput {
            bill_id: bill.id,
            name: bill.name,
            amount: money(bill.amount),
            frequency: bill.frequency,
            next_due_date: bill.next_due_date.to_string(),
            is_autopay: bill.is_autopay,
        })
    }
}

// ============================================================================
// get_upcoming_bills
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetUpcomingBillsArgs {
    /// Look-ahead in days; overdue bills are always included.
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBillDto {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub due_date: String,
    pub days_until_due: i64,
    pub status: BillStatus,
    pub is_autopay: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUpcomingBillsOutput {
    pub days: i64,
    pub bills: Vec<UpcomingBillDto>,
    pub count: usize,
    pub total_due: f64,
    pub overdue_count: usize,
}

pub struct GetUpcomingBillsTool<E: AiEnvironment> {
    env: Arc<E>,
    user_id: String,
}

impl<E: AiEnvironment> GetUpcomingBillsTool<E> {
    pub fn new(env: Arc<E>, user_id: &str) -> Self {
        Self {
            env,
            user_id: user_id.to_string(),
        }
    }
}

impl<E: AiEnvironment> Clone for GetUpcomingBillsTool<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: AiEnvironment + 'static> Tool for GetUpcomingBillsTool<E> {
    const NAME: &'static str = "get_upcoming_bills";

    type Error = AiError;
    type Args = GetUpcomingBillsArgs;
    type Output = GetUpcomingBillsOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "List active bills that are overdue or due within the next N days (default 30), soonest first, with their status (overdue, due-today, due-soon, upcoming).".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "days": { "type": "integer", "minimum": 0, "maximum": MAX_BILL_DAYS }
                },
                "required": []
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let days = args.days.unwrap_or(DEFAULT_BILL_DAYS).clamp(0, MAX_BILL_DAYS);
        let mut bills: Vec<_> = self
            .env
            .bill_service()
            .list_bills(&self.user_id, self.env.today())
            .map_err(AiError::tool)?
            .into_iter()
            .filter(|b| b.bill.is_active && b.days_until_due <= days)
            .collect();
        bills.sort_by(|a, b| {
            a.bill
                .next_due_date
                .cmp(&b.bill.next_due_date)
                .then_with(|| a.bill.name.cmp(&b.bill.name))
        });

        let total_due: Decimal = bills.iter().map(|b| b.bill.amount).sum();
        let overdue_count = bills
            .iter()
            .filter(|b| b.status == BillStatus::Overdue)
            .count();
        let dtos: Vec<UpcomingBillDto> = bills
            .into_iter()
            .take(MAX_BILLS)
            .map(|b| UpcomingBillDto {
                id: b.bill.id,
                name: b.bill.name,
                amount: money(b.bill.amount),
                due_date: b.bill.next_due_date.to_string(),
                days_until_due: b.days_until_due,
                status: b.status,
                is_autopay: b.bill.is_autopay,
            })
            .collect();

        Ok(GetUpcomingBillsOutput {
            days,
            count: dtos.len(),
            bills: dtos,
            total_due: money(total_due),
            overdue_count,
        })
    }
}
