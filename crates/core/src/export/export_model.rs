use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::bills::Bill;
use crate::budgets::BudgetWithCategory;
use crate::categories::Category;
use crate::goals::Goal;
use crate::recurring::RecurringTransaction;
use crate::tags::Tag;
use crate::transactions::TransactionWithDetails;

/// Everything a user owns, as written by the JSON backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub exported_at: NaiveDateTime,
    pub version: String,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<TransactionWithDetails>,
    pub budgets: Vec<BudgetWithCategory>,
    pub bills: Vec<Bill>,
    pub goals: Vec<Goal>,
    pub recurring: Vec<RecurringTransaction>,
    pub tags: Vec<Tag>,
}
