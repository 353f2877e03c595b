//! Account domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};

/// Kind of account. Credit cards and loans hold liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
    Loan,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::CreditCard => "credit_card",
            AccountType::Cash => "cash",
            AccountType::Investment => "investment",
            AccountType::Loan => "loan",
            AccountType::Other => "other",
        }
    }

    pub fn is_liability(&self) -> bool {
        matches!(self, AccountType::CreditCard | AccountType::Loan)
    }

    /// Accounts whose balance can pay bills today.
    pub fn is_liquid(&self) -> bool {
        matches!(
            self,
            AccountType::Checking | AccountType::Savings | AccountType::Cash
        )
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "credit_card" => Ok(AccountType::CreditCard),
            "cash" => Ok(AccountType::Cash),
            "investment" => Ok(AccountType::Investment),
            "loan" => Ok(AccountType::Loan),
            "other" => Ok(AccountType::Other),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

/// Domain model representing an account owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub currency: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required");
        errors.check(self.name.len() > 100, "name", "Name is too long");
        errors.check(
            !is_currency_code(&self.currency),
            "currency",
            "Currency must be a 3-letter code",
        );
        errors.into_result()
    }
}

/// Partial update for an account; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_archived: Option<bool>,
}

impl AccountUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(currency) = &self.currency {
            errors.check(
                !is_currency_code(currency),
                "currency",
                "Currency must be a 3-letter code",
            );
        }
        errors.into_result()
    }
}

/// Assets minus liabilities across non-archived accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
    pub account_count: usize,
}

impl NetWorth {
    /// Liability balances count by magnitude regardless of the sign they were entered with.
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut assets = Decimal::ZERO;
        let mut liabilities = Decimal::ZERO;
        let mut count = 0;
        for account in accounts.iter().filter(|a| !a.is_archived) {
            count += 1;
            if account.account_type.is_liability() {
                liabilities += account.balance.abs();
            } else {
                assets += account.balance;
            }
        }
        NetWorth {
            assets,
            liabilities,
            net_worth: assets - liabilities,
            account_count: count,
        }
    }
}
