use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use super::detection::detect_recurring_patterns;
use super::recurring_model::{
    plan_generation, GenerateResult, NewRecurringTransaction, RecurringGeneration,
    RecurringSuggestion, RecurringTransaction, RecurringUpdate,
};
use super::recurring_traits::{RecurringRepositoryTrait, RecurringServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::errors::{Error, Result};
use crate::transactions::TransactionRepositoryTrait;
use crate::utils::text::{merchant_or_description, normalize_merchant};

/// Days of history scanned for repeating expenses.
const DETECTION_WINDOW_DAYS: i64 = 180;

pub struct RecurringService {
    repository: Arc<dyn RecurringRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
}

impl RecurringService {
    pub fn new(
        repository: Arc<dyn RecurringRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            accounts,
            transactions,
        }
    }
}

#[async_trait]
impl RecurringServiceTrait for RecurringService {
    fn list_recurring(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        self.repository.list(user_id)
    }

    fn get_recurring(&self, user_id: &str, recurring_id: &str) -> Result<RecurringTransaction> {
        self.repository.get_by_id(user_id, recurring_id)
    }

    async fn create_recurring(
        &self,
        user_id: &str,
        new_item: NewRecurringTransaction,
    ) -> Result<RecurringTransaction> {
        new_item.validate()?;
        self.accounts.get_by_id(user_id, &new_item.account_id)?;
        self.repository.create(user_id, new_item).await
    }

    async fn update_recurring(
        &self,
        user_id: &str,
        recurring_id: &str,
        update: RecurringUpdate,
    ) -> Result<RecurringTransaction> {
        update.validate()?;
        if let Some(account_id) = &update.account_id {
            self.accounts.get_by_id(user_id, account_id)?;
        }
        self.repository.update(user_id, recurring_id, update).await
    }

    async fn delete_recurring(&self, user_id: &str, recurring_id: &str) -> Result<()> {
        match self.repository.delete(user_id, recurring_id).await? {
            0 => Err(Error::not_found("Recurring transaction")),
            _ => Ok(()),
        }
    }

    async fn generate_due(&self, user_id: &str, today: NaiveDate) -> Result<GenerateResult> {
        let mut result = GenerateResult::default();
        for item in self.repository.list(user_id)? {
            let plan = plan_generation(&item, today);
            if plan.dates.is_empty() && !plan.deactivate {
                continue;
            }
            let generation = RecurringGeneration {
                recurring_id: item.id.clone(),
                transactions: plan
                    .dates
                    .iter()
                    .map(|date| item.to_new_transaction(*date))
                    .collect(),
                next_date: plan.next_date,
                last_generated: plan.dates.last().copied().or(item.last_generated),
                is_active: !plan.deactivate,
            };
            let created = self.repository.apply_generation(user_id, generation).await?;
            debug!(
                "Recurring '{}' generated {} transactions, next on {}",
                item.description,
                created.len(),
                plan.next_date
            );
            if plan.deactivate {
                result.deactivated += 1;
            }
            result.generated += created.len();
            result.transactions.extend(created);
        }
        if result.generated > 0 || result.deactivated > 0 {
            info!(
                "Generated {} recurring transactions ({} schedules ended) for user {}",
                result.generated, result.deactivated, user_id
            );
        }
        Ok(result)
    }

    fn detect_recurring(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<RecurringSuggestion>> {
        let start = today - Duration::days(DETECTION_WINDOW_DAYS);
        let history: Vec<_> = self
            .transactions
            .list_between(user_id, start, today)?
            .into_iter()
            .map(|t| t.transaction)
            .collect();
        let tracked: HashSet<String> = self
            .repository
            .list(user_id)?
            .iter()
            .filter(|r| r.is_active)
            .map(|r| normalize_merchant(merchant_or_description(r.merchant.as_deref(), &r.description)))
            .collect();
        Ok(detect_recurring_patterns(&history, &tracked))
    }
}
