use crate::ai::{
    AiLearningRule, AiLearningRuleRepositoryTrait, AiMemory, AiMemoryRepositoryTrait, AiSummary,
    AiSummaryRepositoryTrait, LearningRuleService, LearningRuleServiceTrait, SummaryService,
    SummaryServiceTrait, TemplateSummaryWriter,
};
use crate::categories::{Category, CategoryRepositoryTrait, CategoryType, CategoryUpdate, NewCategory};
use crate::errors::{Error, Result};
use crate::reports::ReportService;
use crate::test_support::{d, txn, InMemoryCategories, InMemoryTransactions};
use crate::transactions::TransactionType;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockRules {
    rules: Mutex<Vec<AiLearningRule>>,
}

#[async_trait]
impl AiLearningRuleRepositoryTrait for MockRules {
    fn list(&self, _: &str) -> Result<Vec<AiLearningRule>> {
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn upsert(&self, user_id: &str, pattern: &str, category_id: &str) -> Result<AiLearningRule> {
        let mut rules = self.rules.lock().unwrap();
        if let Some(rule) = rules.iter_mut().find(|r| r.pattern == pattern) {
            rule.category_id = category_id.to_string();
            return Ok(rule.clone());
        }
        let rule = AiLearningRule {
            id: format!("r{}", rules.len() + 1),
            user_id: user_id.to_string(),
            pattern: pattern.to_string(),
            category_id: category_id.to_string(),
            usage_count: 0,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        rules.push(rule.clone());
        Ok(rule)
    }

    async fn increment_usage(&self, _: &str, rule_id: &str) -> Result<()> {
        let mut rules = self.rules.lock().unwrap();
        if let Some(rule) = rules.iter_mut().find(|r| r.id == rule_id) {
            rule.usage_count += 1;
        }
        Ok(())
    }

    async fn delete(&self, _: &str, rule_id: &str) -> Result<usize> {
        let mut rules = self.rules.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| r.id != rule_id);
        Ok(before - rules.len())
    }
}

struct CategoryLookup;

#[async_trait]
impl CategoryRepositoryTrait for CategoryLookup {
    fn list(&self, _: &str, _: Option<CategoryType>) -> Result<Vec<Category>> {
        Ok(vec![])
    }

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category> {
        if category_id != "dining" {
            return Err(Error::not_found("Category"));
        }
        Ok(Category {
            id: "dining".to_string(),
            user_id: user_id.to_string(),
            name: "Dining Out".to_string(),
            category_type: CategoryType::Expense,
            color: "#f97316".to_string(),
            icon: None,
            parent_id: None,
            created_at: NaiveDateTime::default(),
        })
    }

    fn find_by_name(&self, _: &str, _: &str, _: CategoryType) -> Result<Option<Category>> {
        Ok(None)
    }

    async fn create(&self, _: &str, _: NewCategory) -> Result<Category> {
        unimplemented!()
    }

    async fn create_many(&self, _: &str, _: Vec<NewCategory>) -> Result<usize> {
        unimplemented!()
    }

    async fn update(&self, _: &str, _: &str, _: CategoryUpdate) -> Result<Category> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }
}

#[tokio::test]
async fn test_learned_rule_suggests_and_applies() {
    let rules = Arc::new(MockRules::default());
    let service = LearningRuleService::new(rules.clone(), Arc::new(CategoryLookup));

    service.learn("u1", "BLUE BOTTLE #42", "dining").await.unwrap();
    assert_eq!(rules.list("u1").unwrap()[0].pattern, "blue bottle");

    let suggestion = service
        .suggest_category("u1", "Blue Bottle Coffee SF")
        .unwrap()
        .unwrap();
    assert_eq!(suggestion.category_name, "Dining Out");

    let applied = service.apply_rule("u1", "blue bottle oakland").await.unwrap();
    assert_eq!(applied.as_deref(), Some("dining"));
    assert_eq!(rules.list("u1").unwrap()[0].usage_count, 1);

    assert!(service.apply_rule("u1", "Shell").await.unwrap().is_none());
}

#[tokio::test]
async fn test_learn_requires_existing_category() {
    let service = LearningRuleService::new(Arc::new(MockRules::default()), Arc::new(CategoryLookup));
    assert!(service
        .learn("u1", "Shell", "missing")
        .await
        .unwrap_err()
        .is_not_found());
    // Nothing to learn from a merchant made of digits and symbols.
    service.learn("u1", "#1234", "missing").await.unwrap();
}

#[derive(Default)]
struct MockSummaries {
    saved: Mutex<Vec<AiSummary>>,
}

#[async_trait]
impl AiSummaryRepositoryTrait for MockSummaries {
    fn get(&self, _: &str, period: &str) -> Result<Option<AiSummary>> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.period == period)
            .cloned())
    }

    async fn save(&self, user_id: &str, period: &str, content: &str) -> Result<AiSummary> {
        let mut saved = self.saved.lock().unwrap();
        let summary = AiSummary {
            id: format!("s{}", saved.len() + 1),
            user_id: user_id.to_string(),
            period: period.to_string(),
            content: content.to_string(),
            created_at: NaiveDateTime::default(),
        };
        saved.push(summary.clone());
        Ok(summary)
    }
}

struct NoMemories;

#[async_trait]
impl AiMemoryRepositoryTrait for NoMemories {
    fn list(&self, _: &str) -> Result<Vec<AiMemory>> {
        Ok(vec![])
    }

    async fn upsert(&self, _: &str, _: &str, _: &str) -> Result<AiMemory> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_summary_is_cached_per_period() {
    let ledger = Arc::new(InMemoryTransactions::with(vec![
        txn(d(2024, 3, 1), dec!(3000), TransactionType::Income, None, Some("Acme")),
        txn(d(2024, 3, 5), dec!(600), TransactionType::Expense, Some("Groceries"), Some("Costco")),
    ]));
    let reports = Arc::new(ReportService::new(
        ledger.clone(),
        Arc::new(InMemoryCategories::default()),
    ));
    let summaries = Arc::new(MockSummaries::default());
    let service = SummaryService::new(
        summaries.clone(),
        Arc::new(NoMemories),
        reports,
        Arc::new(TemplateSummaryWriter),
    );

    let first = service.get_or_generate_summary("u1", "2024-03", false).await.unwrap();
    assert!(first.content.contains("Groceries"));
    assert!(first.content.contains("3000"));

    ledger.rows.lock().unwrap().push(txn(
        d(2024, 3, 20),
        dec!(400),
        TransactionType::Expense,
        Some("Dining"),
        Some("Nopa"),
    ));
    let cached = service.get_or_generate_summary("u1", "2024-03", false).await.unwrap();
    assert_eq!(cached.id, first.id);

    let refreshed = service.get_or_generate_summary("u1", "2024-03", true).await.unwrap();
    assert_ne!(refreshed.id, first.id);
    assert!(refreshed.content.contains("1000"));
    assert_eq!(summaries.saved.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_summary_rejects_bad_period() {
    let service = SummaryService::new(
        Arc::new(MockSummaries::default()),
        Arc::new(NoMemories),
        Arc::new(ReportService::new(
            Arc::new(InMemoryTransactions::default()),
            Arc::new(InMemoryCategories::default()),
        )),
        Arc::new(TemplateSummaryWriter),
    );
    assert!(service
        .get_or_generate_summary("u1", "March", false)
        .await
        .is_err());
}
