use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use pocketpilot_core::transactions::{NewTransaction, Transaction, TransactionType};

use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub amount: String,
    pub transaction_type: String,
    pub description: String,
    pub merchant: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub recurring_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn from_new(user_id: &str, domain: NewTransaction) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            account_id: domain.account_id,
            category_id: domain.category_id.filter(|c| !c.is_empty()),
            amount: decimal_to_db(domain.amount),
            transaction_type: domain.transaction_type.as_str().to_string(),
            description: domain.description.trim().to_string(),
            merchant: domain
                .merchant
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            date: domain.date,
            notes: domain.notes.filter(|n| !n.is_empty()),
            recurring_id: domain.recurring_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn amount(&self) -> Decimal {
        parse_decimal(&self.amount, "amount")
    }

    pub fn kind(&self) -> TransactionType {
        parse_enum(&self.transaction_type, "transaction_type")
    }

    /// Signed change this row applies to its account.
    pub fn balance_effect(&self) -> Decimal {
        self.kind().balance_effect(self.amount())
    }
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            amount: db.amount(),
            transaction_type: db.kind(),
            id: db.id,
            user_id: db.user_id,
            account_id: db.account_id,
            category_id: db.category_id,
            description: db.description,
            merchant: db.merchant,
            date: db.date,
            notes: db.notes,
            recurring_id: db.recurring_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
