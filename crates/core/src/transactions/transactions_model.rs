//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{FieldErrors, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Signed change applied to the owning account's balance.
    ///
    /// Income credits the account; expenses and outgoing transfers debit it.
    pub fn balance_effect(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense | TransactionType::Transfer => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "transfer" => Ok(TransactionType::Transfer),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    /// Always positive; direction comes from `transaction_type`.
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub description: String,
    pub merchant: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub recurring_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagRef {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Transaction joined with its account, category and tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithDetails {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_name: String,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub transaction_type: TransactionType,
    pub description: String,
    pub merchant: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(skip)]
    pub recurring_id: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.account_id.trim().is_empty(), "accountId", "Account is required");
        errors.check(
            self.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        errors.check(
            self.description.trim().is_empty(),
            "description",
            "Description is required",
        );
        errors.check(
            self.description.len() > 255,
            "description",
            "Description is too long",
        );
        if let Some(notes) = &self.notes {
            errors.check(notes.len() > 1000, "notes", "Notes are too long");
        }
        errors.into_result()
    }
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_type: Option<TransactionType>,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub tag_ids: Option<Vec<String>>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(amount) = self.amount {
            errors.check(
                amount <= Decimal::ZERO,
                "amount",
                "Amount must be greater than zero",
            );
        }
        if let Some(description) = &self.description {
            errors.check(
                description.trim().is_empty(),
                "description",
                "Description cannot be empty",
            );
            errors.check(
                description.len() > 255,
                "description",
                "Description is too long",
            );
        }
        errors.into_result()
    }
}

/// Search criteria for listing transactions. Deserialised from query strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring over description and merchant.
    pub search: Option<String>,
    pub tag_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            account_id: None,
            category_id: None,
            transaction_type: None,
            start_date: None,
            end_date: None,
            search: None,
            tag_id: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl TransactionFilter {
    /// Clamps paging into range and drops blank search text.
    pub fn normalized(mut self) -> Result<Self> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                let mut errors = FieldErrors::new();
                errors.add("startDate", "Start date must be before end date");
                errors.into_result()?;
            }
        }
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(self)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Same criteria without paging, used by exports.
    pub fn unpaged(&self) -> Self {
        Self {
            page: 1,
            page_size: i64::MAX,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<TransactionWithDetails>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl TransactionPage {
    pub fn new(items: Vec<TransactionWithDetails>, total: i64, filter: &TransactionFilter) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + filter.page_size - 1) / filter.page_size
        };
        Self {
            items,
            total,
            page: filter.page,
            page_size: filter.page_size,
            total_pages,
        }
    }
}
