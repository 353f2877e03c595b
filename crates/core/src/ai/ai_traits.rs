use async_trait::async_trait;

use super::ai_model::{AiLearningRule, AiMemory, AiSummary, CategorySuggestion, MemoryUpsert};
use crate::errors::Result;
use crate::reports::MonthlyReport;

#[async_trait]
pub trait AiMemoryRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str) -> Result<Vec<AiMemory>>;
    /// Inserts or replaces the value stored under `key`.
    async fn upsert(&self, user_id: &str, key: &str, value: &str) -> Result<AiMemory>;
    async fn delete(&self, user_id: &str, key: &str) -> Result<usize>;
}

#[async_trait]
pub trait AiLearningRuleRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str) -> Result<Vec<AiLearningRule>>;
    /// Creates the rule or points an existing pattern at a new category.
    async fn upsert(&self, user_id: &str, pattern: &str, category_id: &str)
        -> Result<AiLearningRule>;
    async fn increment_usage(&self, user_id: &str, rule_id: &str) -> Result<()>;
    async fn delete(&self, user_id: &str, rule_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait AiSummaryRepositoryTrait: Send + Sync {
    fn get(&self, user_id: &str, period: &str) -> Result<Option<AiSummary>>;
    async fn save(&self, user_id: &str, period: &str, content: &str) -> Result<AiSummary>;
}

/// Turns a month's aggregated figures into prose.
#[async_trait]
pub trait SummaryWriterTrait: Send + Sync {
    async fn write_summary(&self, report: &MonthlyReport, memories: &[AiMemory])
        -> Result<String>;
}

#[async_trait]
pub trait AiMemoryServiceTrait: Send + Sync {
    fn list_memories(&self, user_id: &str) -> Result<Vec<AiMemory>>;
    async fn upsert_memory(&self, user_id: &str, input: MemoryUpsert) -> Result<AiMemory>;
    async fn delete_memory(&self, user_id: &str, key: &str) -> Result<()>;
}

#[async_trait]
pub trait LearningRuleServiceTrait: Send + Sync {
    fn list_rules(&self, user_id: &str) -> Result<Vec<AiLearningRule>>;
    async fn delete_rule(&self, user_id: &str, rule_id: &str) -> Result<()>;
    fn suggest_category(&self, user_id: &str, text: &str) -> Result<Option<CategorySuggestion>>;
    /// Looks up a rule for `text`, bumping its usage count when one applies.
    async fn apply_rule(&self, user_id: &str, text: &str) -> Result<Option<String>>;
    /// Records that transactions from `merchant` belong in `category_id`.
    async fn learn(&self, user_id: &str, merchant: &str, category_id: &str) -> Result<()>;
}

#[async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    /// Returns the cached summary for `period` (`YYYY-MM`), generating it on a miss
    /// or when `refresh` is set.
    async fn get_or_generate_summary(
        &self,
        user_id: &str,
        period: &str,
        refresh: bool,
    ) -> Result<AiSummary>;
}
