use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketpilot_core::budgets::{
    Budget, BudgetTemplate, BudgetWithCategory, NewBudget, TemplateAllocation,
};
use pocketpilot_core::utils::time_utils::today;

use crate::errors::StorageError;
use crate::utils::{decimal_to_db, new_id, now, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: String,
    pub period: String,
    pub start_date: NaiveDate,
    pub alert_threshold: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetDB {
    pub fn from_new(user_id: &str, domain: NewBudget) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            category_id: domain.category_id,
            amount: decimal_to_db(domain.amount),
            period: domain.period.as_str().to_string(),
            start_date: domain.start_date.unwrap_or_else(today),
            alert_threshold: domain.alert_threshold,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn with_category(self, name: String, color: String) -> BudgetWithCategory {
        BudgetWithCategory {
            budget: self.into(),
            category_name: name,
            category_color: Some(color),
        }
    }
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            period: parse_enum(&db.period, "period"),
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            start_date: db.start_date,
            alert_threshold: db.alert_threshold,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Template row; `allocations` holds the JSON-encoded allocation list.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetTemplateDB {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub allocations: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<BudgetTemplateDB> for BudgetTemplate {
    type Error = StorageError;

    fn try_from(db: BudgetTemplateDB) -> Result<Self, Self::Error> {
        let allocations: Vec<TemplateAllocation> = serde_json::from_str(&db.allocations)?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            allocations,
            created_at: db.created_at,
        })
    }
}
