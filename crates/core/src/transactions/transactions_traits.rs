use async_trait::async_trait;
use chrono::NaiveDate;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionFilter, TransactionPage, TransactionType,
    TransactionUpdate, TransactionWithDetails,
};
use crate::errors::Result;

/// Persistence contract for transactions.
///
/// Every write keeps the owning account's balance in step with the ledger inside
/// the same database transaction.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// One page of matches plus the total match count.
    fn search(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<(Vec<TransactionWithDetails>, i64)>;

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<TransactionWithDetails>;

    /// All transactions dated within `[start, end]`, oldest first.
    fn list_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>>;

    /// Most recent transactions of one type, newest first.
    fn list_recent(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        limit: i64,
    ) -> Result<Vec<Transaction>>;

    /// Fails with not-found when the account does not belong to the user.
    async fn create(&self, user_id: &str, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn update(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize>;

    async fn bulk_delete(&self, user_id: &str, transaction_ids: Vec<String>) -> Result<usize>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn search_transactions(
        &self,
        user_id: &str,
        filter: TransactionFilter,
    ) -> Result<TransactionPage>;

    fn get_transaction(&self, user_id: &str, transaction_id: &str)
        -> Result<TransactionWithDetails>;

    fn list_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>>;

    async fn create_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<TransactionWithDetails>;

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionWithDetails>;

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()>;

    async fn bulk_delete(&self, user_id: &str, transaction_ids: Vec<String>) -> Result<usize>;
}
