//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use pocketpilot_core::goals::{Goal, GoalContribution, GoalUpdate, NewGoal};

use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_optional_decimal};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub target_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_completed: bool,
    pub auto_contribute: bool,
    pub contribution_amount: Option<String>,
    pub contribution_frequency: Option<String>,
    pub account_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::goal_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalContributionDB {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub amount: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl GoalDB {
    pub fn from_new(user_id: &str, domain: NewGoal) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: domain.name.trim().to_string(),
            target_amount: decimal_to_db(domain.target_amount),
            current_amount: decimal_to_db(domain.current_amount),
            target_date: domain.target_date,
            color: domain.color,
            icon: domain.icon,
            is_completed: domain.current_amount >= domain.target_amount,
            auto_contribute: domain.auto_contribute,
            contribution_amount: domain.contribution_amount.map(decimal_to_db),
            contribution_frequency: domain
                .contribution_frequency
                .map(|f| f.as_str().to_string()),
            account_id: domain.account_id.filter(|a| !a.is_empty()),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn target(&self) -> Decimal {
        parse_decimal(&self.target_amount, "target_amount")
    }

    pub fn current(&self) -> Decimal {
        parse_decimal(&self.current_amount, "current_amount")
    }

    /// Sets the saved amount and re-derives completion.
    pub fn set_current(&mut self, amount: Decimal) {
        self.current_amount = decimal_to_db(amount);
        self.is_completed = amount >= self.target();
        self.updated_at = now();
    }

    pub fn apply(&mut self, update: GoalUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(target) = update.target_amount {
            self.target_amount = decimal_to_db(target);
        }
        if update.target_date.is_some() {
            self.target_date = update.target_date;
        }
        if update.color.is_some() {
            self.color = update.color;
        }
        if update.icon.is_some() {
            self.icon = update.icon;
        }
        if let Some(auto) = update.auto_contribute {
            self.auto_contribute = auto;
        }
        if let Some(amount) = update.contribution_amount {
            self.contribution_amount = Some(decimal_to_db(amount));
        }
        if let Some(frequency) = update.contribution_frequency {
            self.contribution_frequency = Some(frequency.as_str().to_string());
        }
        if let Some(account_id) = update.account_id {
            self.account_id = Some(account_id).filter(|a| !a.is_empty());
        }
        let current = self.current();
        self.set_current(current);
    }
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            target_amount: db.target(),
            current_amount: db.current(),
            contribution_amount: parse_optional_decimal(
                db.contribution_amount.as_deref(),
                "contribution_amount",
            ),
            contribution_frequency: db.contribution_frequency.as_deref().and_then(|f| f.parse().ok()),
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            target_date: db.target_date,
            color: db.color,
            icon: db.icon,
            is_completed: db.is_completed,
            auto_contribute: db.auto_contribute,
            account_id: db.account_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<GoalContributionDB> for GoalContribution {
    fn from(db: GoalContributionDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            id: db.id,
            goal_id: db.goal_id,
            user_id: db.user_id,
            date: db.date,
            note: db.note,
            created_at: db.created_at,
        }
    }
}
