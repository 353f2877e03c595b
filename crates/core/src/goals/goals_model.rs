//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};
use crate::utils::money::{percent_of, round_money};
use crate::utils::time_utils::{add_months, months_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl ContributionFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionFrequency::Weekly => "weekly",
            ContributionFrequency::Biweekly => "biweekly",
            ContributionFrequency::Monthly => "monthly",
        }
    }

    pub fn next_after(&self, date: NaiveDate) -> NaiveDate {
        match self {
            ContributionFrequency::Weekly => date + Duration::days(7),
            ContributionFrequency::Biweekly => date + Duration::days(14),
            ContributionFrequency::Monthly => add_months(date, 1),
        }
    }

    /// Approximate contributions per month, matching the bill lookup factors.
    pub fn per_month(&self) -> Decimal {
        match self {
            ContributionFrequency::Weekly => Decimal::new(433, 2),
            ContributionFrequency::Biweekly => Decimal::new(217, 2),
            ContributionFrequency::Monthly => Decimal::ONE,
        }
    }
}

impl fmt::Display for ContributionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ContributionFrequency::Weekly),
            "biweekly" => Ok(ContributionFrequency::Biweekly),
            "monthly" => Ok(ContributionFrequency::Monthly),
            _ => Err(format!("Unknown contribution frequency: {}", s)),
        }
    }
}

/// Domain model representing a savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_completed: bool,
    pub auto_contribute: bool,
    pub contribution_amount: Option<Decimal>,
    pub contribution_frequency: Option<ContributionFrequency>,
    pub account_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub percent: Decimal,
    pub remaining: Decimal,
    pub months_remaining: Option<i64>,
    /// Monthly saving required to hit the target by `target_date`.
    pub monthly_needed: Option<Decimal>,
    pub is_on_track: bool,
}

impl GoalWithProgress {
    pub fn from_goal(goal: Goal, today: NaiveDate) -> Self {
        let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
        let percent = percent_of(goal.current_amount, goal.target_amount).min(Decimal::ONE_HUNDRED);

        let (months_remaining, monthly_needed) = match goal.target_date {
            Some(target) if !goal.is_completed && target > today => {
                let months = months_until(today, target);
                (
                    Some(months),
                    Some(round_money(remaining / Decimal::from(months))),
                )
            }
            Some(_) if !goal.is_completed => (Some(0), Some(remaining)),
            _ => (None, None),
        };

        let is_on_track = if goal.is_completed {
            true
        } else {
            match goal.target_date {
                None => true,
                Some(target) if target <= today => false,
                Some(target) => {
                    let auto_monthly = match (goal.auto_contribute, goal.contribution_amount, goal.contribution_frequency) {
                        (true, Some(amount), Some(freq)) => Some(amount * freq.per_month()),
                        _ => None,
                    };
                    match (auto_monthly, monthly_needed) {
                        (Some(auto), Some(needed)) => auto >= needed,
                        _ => {
                            let start = goal.created_at.date();
                            let total_days = (target - start).num_days().max(1);
                            let elapsed = (today - start).num_days().clamp(0, total_days);
                            let expected = percent_of(Decimal::from(elapsed), Decimal::from(total_days));
                            percent >= expected
                        }
                    }
                }
            }
        };

        Self {
            goal,
            percent,
            remaining: round_money(remaining),
            months_remaining,
            monthly_needed,
            is_on_track,
        }
    }
}

fn check_schedule(
    errors: &mut FieldErrors,
    auto_contribute: bool,
    amount: Option<Decimal>,
    frequency: Option<ContributionFrequency>,
) {
    if auto_contribute {
        errors.check(
            amount.map_or(true, |a| a <= Decimal::ZERO),
            "contributionAmount",
            "Auto-contribution needs a positive amount",
        );
        errors.check(
            frequency.is_none(),
            "contributionFrequency",
            "Auto-contribution needs a frequency",
        );
    }
}

/// Input model for creating a new goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub auto_contribute: bool,
    pub contribution_amount: Option<Decimal>,
    pub contribution_frequency: Option<ContributionFrequency>,
    pub account_id: Option<String>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required");
        errors.check(
            self.target_amount <= Decimal::ZERO,
            "targetAmount",
            "Target must be greater than zero",
        );
        errors.check(
            self.current_amount < Decimal::ZERO,
            "currentAmount",
            "Current amount cannot be negative",
        );
        check_schedule(
            &mut errors,
            self.auto_contribute,
            self.contribution_amount,
            self.contribution_frequency,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub auto_contribute: Option<bool>,
    pub contribution_amount: Option<Decimal>,
    pub contribution_frequency: Option<ContributionFrequency>,
    pub account_id: Option<String>,
}

impl GoalUpdate {
    /// Validates the update as applied on top of `existing`.
    pub fn validate(&self, existing: &Goal) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(target) = self.target_amount {
            errors.check(
                target <= Decimal::ZERO,
                "targetAmount",
                "Target must be greater than zero",
            );
        }
        check_schedule(
            &mut errors,
            self.auto_contribute.unwrap_or(existing.auto_contribute),
            self.contribution_amount.or(existing.contribution_amount),
            self.contribution_frequency.or(existing.contribution_frequency),
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub amount: Decimal,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl NewContribution {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            self.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResult {
    pub contribution: GoalContribution,
    pub goal: GoalWithProgress,
}
