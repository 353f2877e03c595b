use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use super::transactions_model::{
    NewTransaction, TransactionFilter, TransactionPage, TransactionUpdate,
    TransactionWithDetails,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::ai::LearningRuleServiceTrait;
use crate::errors::{Error, Result};
use crate::tags::TagServiceTrait;
use crate::utils::text::merchant_or_description;

const MAX_BULK_DELETE: usize = 500;

/// Service for recording and querying transactions.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    tag_service: Arc<dyn TagServiceTrait>,
    rule_service: Arc<dyn LearningRuleServiceTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        tag_service: Arc<dyn TagServiceTrait>,
        rule_service: Arc<dyn LearningRuleServiceTrait>,
    ) -> Self {
        Self {
            repository,
            tag_service,
            rule_service,
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn search_transactions(
        &self,
        user_id: &str,
        filter: TransactionFilter,
    ) -> Result<TransactionPage> {
        let filter = filter.normalized()?;
        let (items, total) = self.repository.search(user_id, &filter)?;
        Ok(TransactionPage::new(items, total, &filter))
    }

    fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<TransactionWithDetails> {
        self.repository.get_by_id(user_id, transaction_id)
    }

    fn list_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>> {
        if start > end {
            return Err(Error::invalid("Start date must be before end date"));
        }
        self.repository.list_between(user_id, start, end)
    }

    async fn create_transaction(
        &self,
        user_id: &str,
        mut new_transaction: NewTransaction,
    ) -> Result<TransactionWithDetails> {
        new_transaction.validate()?;
        new_transaction.description = new_transaction.description.trim().to_string();

        if new_transaction.category_id.is_none() {
            let text = merchant_or_description(
                new_transaction.merchant.as_deref(),
                &new_transaction.description,
            )
            .to_string();
            match self.rule_service.apply_rule(user_id, &text).await {
                Ok(found) => new_transaction.category_id = found,
                Err(e) => warn!("Category rule lookup failed for '{}': {}", text, e),
            }
        }

        let tag_ids = std::mem::take(&mut new_transaction.tag_ids);
        let created = self.repository.create(user_id, new_transaction).await?;
        debug!("Created transaction {} for user {}", created.id, user_id);

        if !tag_ids.is_empty() {
            // Tag links are secondary: the transaction stays even if they fail.
            if let Err(e) = self
                .tag_service
                .attach_tags(user_id, &created.id, tag_ids)
                .await
            {
                warn!("Failed to attach tags to transaction {}: {}", created.id, e);
            }
        }

        self.repository.get_by_id(user_id, &created.id)
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        mut update: TransactionUpdate,
    ) -> Result<TransactionWithDetails> {
        update.validate()?;
        let existing = self.repository.get_by_id(user_id, transaction_id)?.transaction;

        let tag_ids = update.tag_ids.take();
        let updated = self
            .repository
            .update(user_id, transaction_id, update)
            .await?;

        if updated.category_id.is_some() && updated.category_id != existing.category_id {
            if let (Some(merchant), Some(category_id)) =
                (updated.merchant.as_deref(), updated.category_id.as_deref())
            {
                if let Err(e) = self.rule_service.learn(user_id, merchant, category_id).await {
                    warn!("Failed to learn category rule for '{}': {}", merchant, e);
                }
            }
        }

        if let Some(tag_ids) = tag_ids {
            if let Err(e) = self
                .tag_service
                .set_tags(user_id, transaction_id, tag_ids)
                .await
            {
                warn!("Failed to update tags on transaction {}: {}", transaction_id, e);
            }
        }

        self.repository.get_by_id(user_id, transaction_id)
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        match self.repository.delete(user_id, transaction_id).await? {
            0 => Err(Error::not_found("Transaction")),
            _ => Ok(()),
        }
    }

    async fn bulk_delete(&self, user_id: &str, mut transaction_ids: Vec<String>) -> Result<usize> {
        transaction_ids.sort();
        transaction_ids.dedup();
        if transaction_ids.is_empty() {
            return Err(Error::invalid("At least one transaction id is required"));
        }
        if transaction_ids.len() > MAX_BULK_DELETE {
            return Err(Error::invalid(format!(
                "Cannot delete more than {} transactions at once",
                MAX_BULK_DELETE
            )));
        }
        let deleted = self.repository.bulk_delete(user_id, transaction_ids).await?;
        debug!("Bulk-deleted {} transactions for user {}", deleted, user_id);
        Ok(deleted)
    }
}
