use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::csv_writer::write_transactions_csv;
use super::export_model::FullExport;
use crate::accounts::AccountRepositoryTrait;
use crate::bills::BillRepositoryTrait;
use crate::budgets::BudgetRepositoryTrait;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::Result;
use crate::goals::GoalRepositoryTrait;
use crate::recurring::RecurringRepositoryTrait;
use crate::tags::TagRepositoryTrait;
use crate::transactions::{TransactionFilter, TransactionRepositoryTrait};

pub trait ExportServiceTrait: Send + Sync {
    /// CSV bytes for every transaction matching `filter` (paging is ignored).
    fn export_transactions_csv(&self, user_id: &str, filter: TransactionFilter) -> Result<Vec<u8>>;
    fn export_all_json(&self, user_id: &str) -> Result<FullExport>;
}

pub struct ExportService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    bills: Arc<dyn BillRepositoryTrait>,
    goals: Arc<dyn GoalRepositoryTrait>,
    recurring: Arc<dyn RecurringRepositoryTrait>,
    tags: Arc<dyn TagRepositoryTrait>,
}

impl ExportService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        bills: Arc<dyn BillRepositoryTrait>,
        goals: Arc<dyn GoalRepositoryTrait>,
        recurring: Arc<dyn RecurringRepositoryTrait>,
        tags: Arc<dyn TagRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            categories,
            transactions,
            budgets,
            bills,
            goals,
            recurring,
            tags,
        }
    }

    fn all_transactions(
        &self,
        user_id: &str,
        filter: TransactionFilter,
    ) -> Result<Vec<crate::transactions::TransactionWithDetails>> {
        let filter = filter.normalized()?.unpaged();
        let (rows, _) = self.transactions.search(user_id, &filter)?;
        Ok(rows)
    }
}

impl ExportServiceTrait for ExportService {
    fn export_transactions_csv(&self, user_id: &str, filter: TransactionFilter) -> Result<Vec<u8>> {
        let rows = self.all_transactions(user_id, filter)?;
        info!("Exporting {} transactions as CSV for {}", rows.len(), user_id);
        write_transactions_csv(&rows)
    }

    fn export_all_json(&self, user_id: &str) -> Result<FullExport> {
        let export = FullExport {
            exported_at: Utc::now().naive_utc(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            accounts: self.accounts.list(user_id, true)?,
            categories: self.categories.list(user_id, None)?,
            transactions: self.all_transactions(user_id, TransactionFilter::default())?,
            budgets: self.budgets.list(user_id)?,
            bills: self.bills.list(user_id, false)?,
            goals: self.goals.list(user_id)?,
            recurring: self.recurring.list(user_id)?,
            tags: self.tags.list(user_id)?,
        };
        info!(
            "Exported full backup for {}: {} accounts, {} transactions",
            user_id,
            export.accounts.len(),
            export.transactions.len()
        );
        Ok(export)
    }
}
