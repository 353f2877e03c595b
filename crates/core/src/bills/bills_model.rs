use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};
use crate::transactions::TransactionWithDetails;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillFrequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillFrequency::Weekly => "weekly",
            BillFrequency::Biweekly => "biweekly",
            BillFrequency::Monthly => "monthly",
            BillFrequency::Quarterly => "quarterly",
            BillFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BillFrequency::Weekly),
            "biweekly" => Ok(BillFrequency::Biweekly),
            "monthly" => Ok(BillFrequency::Monthly),
            "quarterly" => Ok(BillFrequency::Quarterly),
            "yearly" => Ok(BillFrequency::Yearly),
            _ => Err(format!("Unknown bill frequency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillStatus {
    Overdue,
    DueToday,
    DueSoon,
    Upcoming,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount: Decimal,
    pub frequency: BillFrequency,
    pub next_due_date: NaiveDate,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub is_autopay: bool,
    pub reminder_days: i32,
    pub is_active: bool,
    pub last_paid_date: Option<NaiveDate>,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_payments: i32,
    pub on_time_payments: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A bill plus the figures derived from today's date and its payment history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillWithStatus {
    #[serde(flatten)]
    pub bill: Bill,
    pub status: BillStatus,
    pub days_until_due: i64,
    pub monthly_equivalent: Decimal,
    /// Percent of payments made on or before the due date; `None` before the first payment.
    pub on_time_rate: Option<Decimal>,
}

fn default_reminder_days() -> i32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub frequency: BillFrequency,
    pub next_due_date: NaiveDate,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    #[serde(default)]
    pub is_autopay: bool,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i32,
    pub notes: Option<String>,
}

impl NewBill {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required");
        errors.check(self.name.len() > 100, "name", "Name is too long");
        errors.check(
            self.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        errors.check(
            !(0..=30).contains(&self.reminder_days),
            "reminderDays",
            "Reminder days must be between 0 and 30",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillUpdate {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub frequency: Option<BillFrequency>,
    pub next_due_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub is_autopay: Option<bool>,
    pub reminder_days: Option<i32>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

impl BillUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(amount) = self.amount {
            errors.check(
                amount <= Decimal::ZERO,
                "amount",
                "Amount must be greater than zero",
            );
        }
        if let Some(days) = self.reminder_days {
            errors.check(
                !(0..=30).contains(&days),
                "reminderDays",
                "Reminder days must be between 0 and 30",
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBillRequest {
    /// Defaults to today.
    pub paid_date: Option<NaiveDate>,
    /// Defaults to the bill amount.
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub create_transaction: bool,
}

/// Payment-tracking fields after recording a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentState {
    pub on_time: bool,
    pub last_paid_date: NaiveDate,
    pub next_due_date: NaiveDate,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_payments: i32,
    pub on_time_payments: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPaymentResult {
    pub bill: BillWithStatus,
    pub on_time: bool,
    pub transaction: Option<TransactionWithDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub active_count: usize,
    pub monthly_total: Decimal,
    pub overdue_count: usize,
    pub due_today_count: usize,
    pub due_soon_count: usize,
    pub upcoming_count: usize,
    pub on_time_rate: Option<Decimal>,
    pub next_due: Option<BillWithStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub bill_id: String,
    pub name: String,
    pub amount: Decimal,
    pub is_autopay: bool,
    pub status: BillStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCalendar {
    /// `YYYY-MM`
    pub month: String,
    pub events: Vec<CalendarEvent>,
    pub total: Decimal,
}
