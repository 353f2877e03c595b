use async_trait::async_trait;
use chrono::NaiveDate;

use super::recurring_model::{
    GenerateResult, NewRecurringTransaction, RecurringGeneration, RecurringSuggestion,
    RecurringTransaction, RecurringUpdate,
};
use crate::errors::Result;
use crate::transactions::Transaction;

#[async_trait]
pub trait RecurringRepositoryTrait: Send + Sync {
    /// Items ordered by next date.
    fn list(&self, user_id: &str) -> Result<Vec<RecurringTransaction>>;
    fn get_by_id(&self, user_id: &str, recurring_id: &str) -> Result<RecurringTransaction>;
    async fn create(
        &self,
        user_id: &str,
        new_item: NewRecurringTransaction,
    ) -> Result<RecurringTransaction>;
    async fn update(
        &self,
        user_id: &str,
        recurring_id: &str,
        update: RecurringUpdate,
    ) -> Result<RecurringTransaction>;
    async fn delete(&self, user_id: &str, recurring_id: &str) -> Result<usize>;
    /// Inserts the generated transactions (with balance effects) and advances the
    /// schedule together.
    async fn apply_generation(
        &self,
        user_id: &str,
        generation: RecurringGeneration,
    ) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait RecurringServiceTrait: Send + Sync {
    fn list_recurring(&self, user_id: &str) -> Result<Vec<RecurringTransaction>>;
    fn get_recurring(&self, user_id: &str, recurring_id: &str) -> Result<RecurringTransaction>;
    async fn create_recurring(
        &self,
        user_id: &str,
        new_item: NewRecurringTransaction,
    ) -> Result<RecurringTransaction>;
    async fn update_recurring(
        &self,
        user_id: &str,
        recurring_id: &str,
        update: RecurringUpdate,
    ) -> Result<RecurringTransaction>;
    async fn delete_recurring(&self, user_id: &str, recurring_id: &str) -> Result<()>;
    async fn generate_due(&self, user_id: &str, today: NaiveDate) -> Result<GenerateResult>;
    fn detect_recurring(&self, user_id: &str, today: NaiveDate)
        -> Result<Vec<RecurringSuggestion>>;
}
