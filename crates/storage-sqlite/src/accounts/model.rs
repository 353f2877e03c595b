//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketpilot_core::accounts::{Account, AccountUpdate, NewAccount};

use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_enum};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: String,
    pub currency: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AccountDB {
    pub fn from_new(user_id: &str, domain: NewAccount) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: domain.name.trim().to_string(),
            account_type: domain.account_type.as_str().to_string(),
            balance: decimal_to_db(domain.balance),
            currency: domain.currency.to_uppercase(),
            color: domain.color,
            icon: domain.icon,
            is_archived: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Overlays the fields present in `update`.
    pub fn apply(&mut self, update: AccountUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(account_type) = update.account_type {
            self.account_type = account_type.as_str().to_string();
        }
        if let Some(balance) = update.balance {
            self.balance = decimal_to_db(balance);
        }
        if let Some(currency) = update.currency {
            self.currency = currency.to_uppercase();
        }
        if update.color.is_some() {
            self.color = update.color;
        }
        if update.icon.is_some() {
            self.icon = update.icon;
        }
        if let Some(archived) = update.is_archived {
            self.is_archived = archived;
        }
        self.updated_at = now();
    }
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            balance: parse_decimal(&db.balance, "balance"),
            account_type: parse_enum(&db.account_type, "account_type"),
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            currency: db.currency,
            color: db.color,
            icon: db.icon,
            is_archived: db.is_archived,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
