//! Budget and budget template models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ALERT_THRESHOLD;
use crate::errors::{FieldErrors, Result};
use crate::utils::time_utils::{month_bounds_of, week_bounds, year_bounds_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    /// Inclusive window of the period containing `today`.
    /// Weeks start on Monday; months and years follow the calendar.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            BudgetPeriod::Weekly => week_bounds(today),
            BudgetPeriod::Monthly => month_bounds_of(today),
            BudgetPeriod::Yearly => year_bounds_of(today),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    /// Percent of `amount` at which the budget is flagged.
    pub alert_threshold: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithCategory {
    #[serde(flatten)]
    pub budget: Budget,
    pub category_name: String,
    pub category_color: Option<String>,
}

fn check_threshold(errors: &mut FieldErrors, threshold: i32) {
    errors.check(
        !(1..=100).contains(&threshold),
        "alertThreshold",
        "Alert threshold must be between 1 and 100",
    );
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: Option<NaiveDate>,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: i32,
}

fn default_alert_threshold() -> i32 {
    DEFAULT_ALERT_THRESHOLD
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            self.category_id.trim().is_empty(),
            "categoryId",
            "Category is required",
        );
        errors.check(
            self.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        check_threshold(&mut errors, self.alert_threshold);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub amount: Option<Decimal>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub alert_threshold: Option<i32>,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(amount) = self.amount {
            errors.check(
                amount <= Decimal::ZERO,
                "amount",
                "Amount must be greater than zero",
            );
        }
        if let Some(threshold) = self.alert_threshold {
            check_threshold(&mut errors, threshold);
        }
        errors.into_result()
    }
}

/// Spending against a budget for its current period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: BudgetWithCategory,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub is_over_budget: bool,
    pub is_alert: bool,
}

/// One line of a template: a category by name with either a share of income or a
/// fixed amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAllocation {
    pub category_name: String,
    pub percentage: Option<Decimal>,
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl TemplateAllocation {
    fn validate(&self, index: usize, errors: &mut FieldErrors) {
        let field = format!("allocations.{}", index);
        errors.check(
            self.category_name.trim().is_empty(),
            &field,
            "Category name is required",
        );
        match (self.percentage, self.amount) {
            (Some(pct), None) => errors.check(
                pct <= Decimal::ZERO || pct > Decimal::ONE_HUNDRED,
                &field,
                "Percentage must be between 0 and 100",
            ),
            (None, Some(amount)) => errors.check(
                amount <= Decimal::ZERO,
                &field,
                "Amount must be greater than zero",
            ),
            _ => errors.add(&field, "Exactly one of percentage or amount is required"),
        }
    }

    pub fn is_percentage(&self) -> bool {
        self.percentage.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    pub id: String,
    /// `None` for built-in templates shared by every user.
    pub user_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub allocations: Vec<TemplateAllocation>,
    pub created_at: NaiveDateTime,
}

impl BudgetTemplate {
    pub fn is_builtin(&self) -> bool {
        self.user_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetTemplate {
    pub name: String,
    pub description: Option<String>,
    pub allocations: Vec<TemplateAllocation>,
}

impl NewBudgetTemplate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required");
        errors.check(
            self.allocations.is_empty(),
            "allocations",
            "At least one allocation is required",
        );
        for (i, allocation) in self.allocations.iter().enumerate() {
            allocation.validate(i, &mut errors);
        }
        let total_pct: Decimal = self.allocations.iter().filter_map(|a| a.percentage).sum();
        errors.check(
            total_pct > Decimal::ONE_HUNDRED,
            "allocations",
            "Percentages cannot add up to more than 100",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateRequest {
    pub template_id: String,
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateResult {
    pub created: Vec<Budget>,
    /// Category names left alone because a budget already covered them.
    pub skipped: Vec<String>,
}
