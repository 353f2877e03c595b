use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_RECURRING_CATCH_UP;
use crate::errors::{FieldErrors, Result};
use crate::transactions::{NewTransaction, Transaction, TransactionType};
use crate::utils::time_utils::add_months;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFrequency::Daily => "daily",
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Biweekly => "biweekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Quarterly => "quarterly",
            RecurringFrequency::Yearly => "yearly",
        }
    }

    /// Next occurrence after `date`; month-based steps clamp to month end.
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            RecurringFrequency::Daily => date + Duration::days(1),
            RecurringFrequency::Weekly => date + Duration::days(7),
            RecurringFrequency::Biweekly => date + Duration::days(14),
            RecurringFrequency::Monthly => add_months(date, 1),
            RecurringFrequency::Quarterly => add_months(date, 3),
            RecurringFrequency::Yearly => add_months(date, 12),
        }
    }
}

impl fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurringFrequency::Daily),
            "weekly" => Ok(RecurringFrequency::Weekly),
            "biweekly" => Ok(RecurringFrequency::Biweekly),
            "monthly" => Ok(RecurringFrequency::Monthly),
            "quarterly" => Ok(RecurringFrequency::Quarterly),
            "yearly" => Ok(RecurringFrequency::Yearly),
            _ => Err(format!("Unknown recurring frequency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub description: String,
    pub merchant: Option<String>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub frequency: RecurringFrequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_date: NaiveDate,
    pub is_active: bool,
    pub last_generated: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RecurringTransaction {
    pub fn to_new_transaction(&self, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            account_id: self.account_id.clone(),
            category_id: self.category_id.clone(),
            amount: self.amount,
            transaction_type: self.transaction_type,
            description: self.description.clone(),
            merchant: self.merchant.clone(),
            date,
            notes: None,
            tag_ids: Vec::new(),
            recurring_id: Some(self.id.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringTransaction {
    pub account_id: String,
    pub category_id: Option<String>,
    pub description: String,
    pub merchant: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub frequency: RecurringFrequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewRecurringTransaction {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.account_id.trim().is_empty(), "accountId", "Account is required");
        errors.check(
            self.description.trim().is_empty(),
            "description",
            "Description is required",
        );
        errors.check(
            self.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        if let Some(end) = self.end_date {
            errors.check(
                end < self.start_date,
                "endDate",
                "End date must be on or after the start date",
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringUpdate {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    pub frequency: Option<RecurringFrequency>,
    pub next_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl RecurringUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(description) = &self.description {
            errors.check(
                description.trim().is_empty(),
                "description",
                "Description cannot be empty",
            );
        }
        if let Some(amount) = self.amount {
            errors.check(
                amount <= Decimal::ZERO,
                "amount",
                "Amount must be greater than zero",
            );
        }
        errors.into_result()
    }
}

/// Occurrences owed by one recurring item as of a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub dates: Vec<NaiveDate>,
    pub next_date: NaiveDate,
    pub deactivate: bool,
}

/// Works out which occurrences of `item` are due by `today`.
///
/// Missed occurrences are caught up one by one, bounded per item. Items whose
/// schedule has moved past `end_date` are flagged for deactivation.
pub fn plan_generation(item: &RecurringTransaction, today: NaiveDate) -> GenerationPlan {
    let mut dates = Vec::new();
    let mut current = item.next_date;
    let within_end = |d: NaiveDate| item.end_date.map_or(true, |end| d <= end);

    if item.is_active {
        while current <= today && within_end(current) && dates.len() < MAX_RECURRING_CATCH_UP {
            dates.push(current);
            current = item.frequency.advance(current);
        }
    }

    GenerationPlan {
        deactivate: item.is_active && !within_end(current),
        dates,
        next_date: current,
    }
}

/// Everything the repository persists for one item in a single database transaction.
#[derive(Debug, Clone)]
pub struct RecurringGeneration {
    pub recurring_id: String,
    pub transactions: Vec<NewTransaction>,
    pub next_date: NaiveDate,
    pub last_generated: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub generated: usize,
    pub deactivated: usize,
    pub transactions: Vec<Transaction>,
}

/// A repeating expense found in history that is not yet scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringSuggestion {
    pub merchant: String,
    pub normalized_merchant: String,
    pub frequency: RecurringFrequency,
    pub average_amount: Decimal,
    pub occurrences: usize,
    pub average_interval_days: Decimal,
    pub last_date: NaiveDate,
    pub next_expected_date: NaiveDate,
    pub account_id: String,
    pub category_id: Option<String>,
    pub already_tracked: bool,
}
