use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NetWorth, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;

/// Service for managing accounts.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    fn list_accounts(&self, user_id: &str, include_archived: bool) -> Result<Vec<Account>> {
        self.repository.list(user_id, include_archived)
    }

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(user_id, account_id)
    }

    async fn create_account(&self, user_id: &str, mut new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        new_account.name = new_account.name.trim().to_string();
        new_account.currency = new_account.currency.to_uppercase();
        debug!("Creating account '{}' for user {}", new_account.name, user_id);
        self.repository.create(user_id, new_account).await
    }

    async fn update_account(
        &self,
        user_id: &str,
        account_id: &str,
        mut update: AccountUpdate,
    ) -> Result<Account> {
        update.validate()?;
        update.name = update.name.map(|n| n.trim().to_string());
        update.currency = update.currency.map(|c| c.to_uppercase());
        self.repository.update(user_id, account_id, update).await
    }

    async fn archive_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        debug!("Archiving account {} for user {}", account_id, user_id);
        self.repository.archive(user_id, account_id).await
    }

    fn get_net_worth(&self, user_id: &str) -> Result<NetWorth> {
        let accounts = self.repository.list(user_id, false)?;
        Ok(NetWorth::from_accounts(&accounts))
    }
}
