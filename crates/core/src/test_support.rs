//! In-memory fakes shared by service tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::accounts::{Account, AccountRepositoryTrait, AccountType, AccountUpdate, NewAccount};
use crate::categories::{Category, CategoryServiceTrait, CategoryType, CategoryUpdate, NewCategory};
use crate::errors::{Error, Result};
use crate::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionPage, TransactionRepositoryTrait,
    TransactionServiceTrait, TransactionType, TransactionUpdate, TransactionWithDetails,
};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn txn(
    date: NaiveDate,
    amount: Decimal,
    transaction_type: TransactionType,
    category_id: Option<&str>,
    merchant: Option<&str>,
) -> TransactionWithDetails {
    TransactionWithDetails {
        transaction: Transaction {
            id: format!("{}-{}-{}", date, amount, merchant.unwrap_or("")),
            user_id: "u1".to_string(),
            account_id: "acc1".to_string(),
            category_id: category_id.map(str::to_string),
            amount,
            transaction_type,
            description: merchant.unwrap_or("Transaction").to_string(),
            merchant: merchant.map(str::to_string),
            date,
            notes: None,
            recurring_id: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        },
        account_name: "Checking".to_string(),
        category_name: category_id.map(str::to_string),
        category_color: None,
        tags: vec![],
    }
}

#[derive(Default)]
pub struct InMemoryTransactions {
    pub rows: Mutex<Vec<TransactionWithDetails>>,
}

impl InMemoryTransactions {
    pub fn with(rows: Vec<TransactionWithDetails>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactions {
    fn search(
        &self,
        _user_id: &str,
        _filter: &TransactionFilter,
    ) -> Result<(Vec<TransactionWithDetails>, i64)> {
        let rows = self.rows.lock().unwrap().clone();
        let total = rows.len() as i64;
        Ok((rows, total))
    }

    fn get_by_id(&self, _user_id: &str, transaction_id: &str) -> Result<TransactionWithDetails> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.transaction.id == transaction_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Transaction"))
    }

    fn list_between(
        &self,
        _user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.transaction.date >= start && t.transaction.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.transaction.date);
        Ok(rows)
    }

    fn list_recent(
        &self,
        _user_id: &str,
        transaction_type: TransactionType,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.transaction.transaction_type == transaction_type)
            .map(|t| t.transaction.clone())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn create(&self, user_id: &str, n: NewTransaction) -> Result<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let transaction = Transaction {
            id: format!("t{}", rows.len() + 1),
            user_id: user_id.to_string(),
            account_id: n.account_id,
            category_id: n.category_id,
            amount: n.amount,
            transaction_type: n.transaction_type,
            description: n.description,
            merchant: n.merchant,
            date: n.date,
            notes: n.notes,
            recurring_id: n.recurring_id,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        rows.push(TransactionWithDetails {
            transaction: transaction.clone(),
            account_name: "Checking".to_string(),
            category_name: None,
            category_color: None,
            tags: vec![],
        });
        Ok(transaction)
    }

    async fn update(&self, _: &str, _: &str, _: TransactionUpdate) -> Result<Transaction> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }

    async fn bulk_delete(&self, _: &str, _: Vec<String>) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
pub struct InMemoryCategories {
    pub rows: Mutex<Vec<Category>>,
}

impl InMemoryCategories {
    pub fn with_names(names: &[(&str, CategoryType)]) -> Self {
        let rows = names
            .iter()
            .map(|(name, category_type)| Category {
                id: name.to_lowercase(),
                user_id: "u1".to_string(),
                name: name.to_string(),
                category_type: *category_type,
                color: "#64748b".to_string(),
                icon: None,
                parent_id: None,
                created_at: NaiveDateTime::default(),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for InMemoryCategories {
    fn list_categories(
        &self,
        _user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| category_type.map_or(true, |t| t == c.category_type))
            .cloned()
            .collect())
    }

    fn get_category(&self, _user_id: &str, category_id: &str) -> Result<Category> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Category"))
    }

    async fn create_category(&self, _: &str, _: NewCategory) -> Result<Category> {
        unimplemented!()
    }

    async fn update_category(&self, _: &str, _: &str, _: CategoryUpdate) -> Result<Category> {
        unimplemented!()
    }

    async fn delete_category(&self, _: &str, _: &str) -> Result<()> {
        unimplemented!()
    }

    async fn seed_default_categories(&self, _: &str) -> Result<usize> {
        Ok(0)
    }

    async fn resolve_or_create(&self, user_id: &str, name: &str) -> Result<Category> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(found) = rows.iter().find(|c| c.name.eq_ignore_ascii_case(name)) {
            return Ok(found.clone());
        }
        let category = Category {
            id: name.to_lowercase(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            category_type: CategoryType::Expense,
            color: "#64748b".to_string(),
            icon: None,
            parent_id: None,
            created_at: NaiveDateTime::default(),
        };
        rows.push(category.clone());
        Ok(category)
    }
}

#[derive(Default)]
pub struct InMemoryAccounts {
    pub rows: Mutex<Vec<Account>>,
}

impl InMemoryAccounts {
    pub fn with(accounts: &[(&str, AccountType, Decimal)]) -> Self {
        let rows = accounts
            .iter()
            .map(|(id, account_type, balance)| Account {
                id: id.to_string(),
                user_id: "u1".to_string(),
                name: id.to_string(),
                account_type: *account_type,
                balance: *balance,
                currency: "USD".to_string(),
                color: None,
                icon: None,
                is_archived: false,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryAccounts {
    fn list(&self, user_id: &str, include_archived: bool) -> Result<Vec<Account>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && (include_archived || !a.is_archived))
            .cloned()
            .collect())
    }

    fn get_by_id(&self, user_id: &str, account_id: &str) -> Result<Account> {
        self.list(user_id, true)?
            .into_iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| Error::not_found("Account"))
    }

    async fn create(&self, _: &str, _: NewAccount) -> Result<Account> {
        unimplemented!()
    }

    async fn update(&self, _: &str, _: &str, _: AccountUpdate) -> Result<Account> {
        unimplemented!()
    }

    async fn archive(&self, _: &str, _: &str) -> Result<Account> {
        unimplemented!()
    }

    async fn adjust_balance(&self, user_id: &str, account_id: &str, delta: Decimal) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.user_id == user_id && a.id == account_id)
            .ok_or_else(|| Error::not_found("Account"))?;
        account.balance += delta;
        Ok(())
    }
}

/// Transaction service that writes straight into an [`InMemoryTransactions`] store.
#[derive(Default)]
pub struct RecordingTransactions {
    pub store: std::sync::Arc<InMemoryTransactions>,
}

#[async_trait]
impl TransactionServiceTrait for RecordingTransactions {
    fn search_transactions(&self, user_id: &str, filter: TransactionFilter) -> Result<TransactionPage> {
        let (items, total) = self.store.search(user_id, &filter)?;
        Ok(TransactionPage::new(items, total, &filter))
    }

    fn get_transaction(&self, user_id: &str, id: &str) -> Result<TransactionWithDetails> {
        self.store.get_by_id(user_id, id)
    }

    fn list_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>> {
        self.store.list_between(user_id, start, end)
    }

    async fn create_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<TransactionWithDetails> {
        let created = self.store.create(user_id, new_transaction).await?;
        self.store.get_by_id(user_id, &created.id)
    }

    async fn update_transaction(
        &self,
        _: &str,
        _: &str,
        _: TransactionUpdate,
    ) -> Result<TransactionWithDetails> {
        unimplemented!()
    }

    async fn delete_transaction(&self, _: &str, _: &str) -> Result<()> {
        unimplemented!()
    }

    async fn bulk_delete(&self, _: &str, _: Vec<String>) -> Result<usize> {
        unimplemented!()
    }
}
