use crate::ai::{AiLearningRule, CategorySuggestion, LearningRuleServiceTrait};
use crate::errors::{Error, Result};
use crate::tags::{NewTag, Tag, TagServiceTrait, TagUpdate};
use crate::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait,
    TransactionService, TransactionServiceTrait, TransactionType, TransactionUpdate,
    TransactionWithDetails,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockTransactionRepository {
    rows: Mutex<Vec<Transaction>>,
    balance: Mutex<Decimal>,
}

impl MockTransactionRepository {
    fn details(t: Transaction) -> TransactionWithDetails {
        TransactionWithDetails {
            transaction: t,
            account_name: "Checking".to_string(),
            category_name: None,
            category_color: None,
            tags: vec![],
        }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for MockTransactionRepository {
    fn search(
        &self,
        _user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<(Vec<TransactionWithDetails>, i64)> {
        let rows = self.rows.lock().unwrap();
        let items: Vec<_> = rows
            .iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .cloned()
            .map(Self::details)
            .collect();
        Ok((items, rows.len() as i64))
    }

    fn get_by_id(&self, _user_id: &str, id: &str) -> Result<TransactionWithDetails> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .map(Self::details)
            .ok_or_else(|| Error::not_found("Transaction"))
    }

    fn list_between(
        &self,
        _: &str,
        _: NaiveDate,
        _: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>> {
        unimplemented!()
    }

    fn list_recent(&self, _: &str, _: TransactionType, _: i64) -> Result<Vec<Transaction>> {
        unimplemented!()
    }

    async fn create(&self, user_id: &str, n: NewTransaction) -> Result<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let t = Transaction {
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
        *self.balance.lock().unwrap() += t.transaction_type.balance_effect(t.amount);
        rows.push(t.clone());
        Ok(t)
    }

    async fn update(&self, _: &str, id: &str, u: TransactionUpdate) -> Result<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let t = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found("Transaction"))?;
        let mut balance = self.balance.lock().unwrap();
        *balance -= t.transaction_type.balance_effect(t.amount);
        if let Some(amount) = u.amount {
            t.amount = amount;
        }
        if u.category_id.is_some() {
            t.category_id = u.category_id;
        }
        if u.merchant.is_some() {
            t.merchant = u.merchant;
        }
        *balance += t.transaction_type.balance_effect(t.amount);
        Ok(t.clone())
    }

    async fn delete(&self, _: &str, id: &str) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        Ok(before - rows.len())
    }

    async fn bulk_delete(&self, _: &str, ids: Vec<String>) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| !ids.contains(&t.id));
        Ok(before - rows.len())
    }
}

struct FailingTagService;

#[async_trait]
impl TagServiceTrait for FailingTagService {
    fn list_tags(&self, _: &str) -> Result<Vec<Tag>> {
        Ok(vec![])
    }
    async fn create_tag(&self, _: &str, _: NewTag) -> Result<Tag> {
        unimplemented!()
    }
    async fn update_tag(&self, _: &str, _: &str, _: TagUpdate) -> Result<Tag> {
        unimplemented!()
    }
    async fn delete_tag(&self, _: &str, _: &str) -> Result<()> {
        unimplemented!()
    }
    async fn attach_tags(&self, _: &str, _: &str, _: Vec<String>) -> Result<usize> {
        Err(Error::Unexpected("tag store unavailable".to_string()))
    }
    async fn set_tags(&self, _: &str, _: &str, _: Vec<String>) -> Result<usize> {
        Err(Error::Unexpected("tag store unavailable".to_string()))
    }
}

#[derive(Default)]
struct MockRuleService {
    learned: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl LearningRuleServiceTrait for MockRuleService {
    fn list_rules(&self, _: &str) -> Result<Vec<AiLearningRule>> {
        Ok(vec![])
    }
    async fn delete_rule(&self, _: &str, _: &str) -> Result<()> {
        Ok(())
    }
    fn suggest_category(&self, _: &str, _: &str) -> Result<Option<CategorySuggestion>> {
        Ok(None)
    }
    async fn apply_rule(&self, _: &str, text: &str) -> Result<Option<String>> {
        Ok(text
            .to_lowercase()
            .contains("starbucks")
            .then(|| "coffee".to_string()))
    }
    async fn learn(&self, _: &str, merchant: &str, category_id: &str) -> Result<()> {
        self.learned
            .lock()
            .unwrap()
            .push((merchant.to_string(), category_id.to_string()));
        Ok(())
    }
}

fn new_expense(amount: Decimal, merchant: Option<&str>) -> NewTransaction {
    NewTransaction {
        account_id: "acc1".to_string(),
        category_id: None,
        amount,
        transaction_type: TransactionType::Expense,
        description: "Purchase".to_string(),
        merchant: merchant.map(str::to_string),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        notes: None,
        tag_ids: vec![],
        recurring_id: None,
    }
}

fn service() -> (
    TransactionService,
    Arc<MockTransactionRepository>,
    Arc<MockRuleService>,
) {
    let repo = Arc::new(MockTransactionRepository::default());
    let rules = Arc::new(MockRuleService::default());
    (
        TransactionService::new(repo.clone(), Arc::new(FailingTagService), rules.clone()),
        repo,
        rules,
    )
}

#[tokio::test]
async fn test_create_applies_learned_rule_when_uncategorised() {
    let (service, _, _) = service();
    let created = service
        .create_transaction("u1", new_expense(dec!(5.25), Some("STARBUCKS #42")))
        .await
        .unwrap();
    assert_eq!(created.transaction.category_id.as_deref(), Some("coffee"));

    let mut explicit = new_expense(dec!(5.25), Some("Starbucks"));
    explicit.category_id = Some("treats".to_string());
    let created = service.create_transaction("u1", explicit).await.unwrap();
    assert_eq!(created.transaction.category_id.as_deref(), Some("treats"));
}

#[tokio::test]
async fn test_tag_failure_does_not_fail_create() {
    let (service, repo, _) = service();
    let mut input = new_expense(dec!(20), None);
    input.tag_ids = vec!["tag1".to_string()];
    let created = service.create_transaction("u1", input).await.unwrap();
    assert_eq!(created.transaction.amount, dec!(20));
    assert_eq!(*repo.balance.lock().unwrap(), dec!(-20));
}

#[tokio::test]
async fn test_create_rejects_non_positive_amount() {
    let (service, repo, _) = service();
    let err = service
        .create_transaction("u1", new_expense(Decimal::ZERO, None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(repo.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_recategorising_learns_merchant_rule() {
    let (service, repo, rules) = service();
    let created = service
        .create_transaction("u1", new_expense(dec!(60), Some("Shell Oil 123")))
        .await
        .unwrap();

    service
        .update_transaction(
            "u1",
            &created.transaction.id,
            TransactionUpdate {
                category_id: Some("fuel".to_string()),
                amount: Some(dec!(65)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        rules.learned.lock().unwrap().as_slice(),
        &[("Shell Oil 123".to_string(), "fuel".to_string())]
    );
    assert_eq!(*repo.balance.lock().unwrap(), dec!(-65));
}

#[tokio::test]
async fn test_search_clamps_page_size() {
    let (service, _, _) = service();
    for _ in 0..3 {
        service
            .create_transaction("u1", new_expense(dec!(1), None))
            .await
            .unwrap();
    }
    let page = service
        .search_transactions(
            "u1",
            TransactionFilter {
                page_size: 10_000,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(page.page_size, 200);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_bulk_delete_requires_ids() {
    let (service, _, _) = service();
    assert!(service.bulk_delete("u1", vec![]).await.is_err());
    let created = service
        .create_transaction("u1", new_expense(dec!(1), None))
        .await
        .unwrap();
    let deleted = service
        .bulk_delete(
            "u1",
            vec![created.transaction.id.clone(), created.transaction.id],
        )
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

#[test]
fn test_balance_effect_by_type() {
    assert_eq!(TransactionType::Income.balance_effect(dec!(10)), dec!(10));
    assert_eq!(TransactionType::Expense.balance_effect(dec!(10)), dec!(-10));
    assert_eq!(TransactionType::Transfer.balance_effect(dec!(10)), dec!(-10));
}
