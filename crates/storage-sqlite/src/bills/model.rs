use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketpilot_core::bills::{Bill, BillUpdate, NewBill, PaymentState};

use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::bills)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BillDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount: String,
    pub frequency: String,
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

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl BillDB {
    pub fn from_new(user_id: &str, domain: NewBill) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: domain.name.trim().to_string(),
            amount: decimal_to_db(domain.amount),
            frequency: domain.frequency.as_str().to_string(),
            next_due_date: domain.next_due_date,
            category_id: blank_to_none(domain.category_id),
            account_id: blank_to_none(domain.account_id),
            is_autopay: domain.is_autopay,
            reminder_days: domain.reminder_days,
            is_active: true,
            last_paid_date: None,
            current_streak: 0,
            longest_streak: 0,
            total_payments: 0,
            on_time_payments: 0,
            notes: blank_to_none(domain.notes),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Overlays the fields present in `update`; empty strings clear links and notes.
    pub fn apply(&mut self, update: BillUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(amount) = update.amount {
            self.amount = decimal_to_db(amount);
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency.as_str().to_string();
        }
        if let Some(next_due_date) = update.next_due_date {
            self.next_due_date = next_due_date;
        }
        if update.category_id.is_some() {
            self.category_id = blank_to_none(update.category_id);
        }
        if update.account_id.is_some() {
            self.account_id = blank_to_none(update.account_id);
        }
        if let Some(is_autopay) = update.is_autopay {
            self.is_autopay = is_autopay;
        }
        if let Some(reminder_days) = update.reminder_days {
            self.reminder_days = reminder_days;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if update.notes.is_some() {
            self.notes = blank_to_none(update.notes);
        }
        self.updated_at = now();
    }

    pub fn record(&mut self, state: PaymentState) {
        self.last_paid_date = Some(state.last_paid_date);
        self.next_due_date = state.next_due_date;
        self.current_streak = state.current_streak;
        self.longest_streak = state.longest_streak;
        self.total_payments = state.total_payments;
        self.on_time_payments = state.on_time_payments;
        self.updated_at = now();
    }
}

impl From<BillDB> for Bill {
    fn from(db: BillDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            frequency: parse_enum(&db.frequency, "frequency"),
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            next_due_date: db.next_due_date,
            category_id: db.category_id,
            account_id: db.account_id,
            is_autopay: db.is_autopay,
            reminder_days: db.reminder_days,
            is_active: db.is_active,
            last_paid_date: db.last_paid_date,
            current_streak: db.current_streak,
            longest_streak: db.longest_streak,
            total_payments: db.total_payments,
            on_time_payments: db.on_time_payments,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
