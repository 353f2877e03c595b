use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketpilot_core::recurring::{NewRecurringTransaction, RecurringTransaction, RecurringUpdate};

use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_enum};

/// Row in `recurring_transactions`.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recurring_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct RecurringDB {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub description: String,
    pub merchant: Option<String>,
    pub amount: String,
    pub transaction_type: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_date: NaiveDate,
    pub is_active: bool,
    pub last_generated: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RecurringDB {
    /// The first occurrence is due on the start date.
    pub fn from_new(user_id: &str, domain: NewRecurringTransaction) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            account_id: domain.account_id,
            category_id: blank_to_none(domain.category_id),
            description: domain.description.trim().to_string(),
            merchant: blank_to_none(domain.merchant),
            amount: decimal_to_db(domain.amount),
            transaction_type: domain.transaction_type.as_str().to_string(),
            frequency: domain.frequency.as_str().to_string(),
            start_date: domain.start_date,
            end_date: domain.end_date,
            next_date: domain.start_date,
            is_active: true,
            last_generated: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn apply(&mut self, update: RecurringUpdate) {
        if let Some(account_id) = update.account_id {
            self.account_id = account_id;
        }
        if update.category_id.is_some() {
            self.category_id = blank_to_none(update.category_id);
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if update.merchant.is_some() {
            self.merchant = blank_to_none(update.merchant);
        }
        if let Some(amount) = update.amount {
            self.amount = decimal_to_db(amount);
        }
        if let Some(kind) = update.transaction_type {
            self.transaction_type = kind.as_str().to_string();
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency.as_str().to_string();
        }
        if let Some(next_date) = update.next_date {
            self.next_date = next_date;
        }
        if update.end_date.is_some() {
            self.end_date = update.end_date;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now();
    }
}

impl From<RecurringDB> for RecurringTransaction {
    fn from(db: RecurringDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            transaction_type: parse_enum(&db.transaction_type, "transaction_type"),
            frequency: parse_enum(&db.frequency, "frequency"),
            id: db.id,
            user_id: db.user_id,
            account_id: db.account_id,
            category_id: db.category_id,
            description: db.description,
            merchant: db.merchant,
            start_date: db.start_date,
            end_date: db.end_date,
            next_date: db.next_date,
            is_active: db.is_active,
            last_generated: db.last_generated,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
