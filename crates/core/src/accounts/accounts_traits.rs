//! Account repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, AccountUpdate, NetWorth, NewAccount};
use crate::errors::Result;

/// Persistence contract for accounts. Every call is scoped by `user_id`.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str, include_archived: bool) -> Result<Vec<Account>>;

    fn get_by_id(&self, user_id: &str, account_id: &str) -> Result<Account>;

    async fn create(&self, user_id: &str, new_account: NewAccount) -> Result<Account>;

    async fn update(
        &self,
        user_id: &str,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account>;

    /// Soft-deletes the account by setting `is_archived`.
    async fn archive(&self, user_id: &str, account_id: &str) -> Result<Account>;

    /// Adds `delta` to the stored balance.
    async fn adjust_balance(&self, user_id: &str, account_id: &str, delta: Decimal)
        -> Result<()>;
}

#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    fn list_accounts(&self, user_id: &str, include_archived: bool) -> Result<Vec<Account>>;

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account>;

    async fn create_account(&self, user_id: &str, new_account: NewAccount) -> Result<Account>;

    async fn update_account(
        &self,
        user_id: &str,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account>;

    async fn archive_account(&self, user_id: &str, account_id: &str) -> Result<Account>;

    fn get_net_worth(&self, user_id: &str) -> Result<NetWorth>;
}
