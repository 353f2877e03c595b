use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

use super::ai_model::{AiLearningRule, AiMemory, AiSummary, CategorySuggestion, MemoryUpsert};
use super::ai_traits::{
    AiLearningRuleRepositoryTrait, AiMemoryRepositoryTrait, AiMemoryServiceTrait,
    AiSummaryRepositoryTrait, LearningRuleServiceTrait, SummaryServiceTrait,
    SummaryWriterTrait,
};
use super::learning::find_matching_rule;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::reports::ReportServiceTrait;
use crate::utils::text::normalize_merchant;
use crate::utils::time_utils::parse_month_key;

pub struct AiMemoryService {
    repository: Arc<dyn AiMemoryRepositoryTrait>,
}

impl AiMemoryService {
    pub fn new(repository: Arc<dyn AiMemoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AiMemoryServiceTrait for AiMemoryService {
    fn list_memories(&self, user_id: &str) -> Result<Vec<AiMemory>> {
        self.repository.list(user_id)
    }

    async fn upsert_memory(&self, user_id: &str, input: MemoryUpsert) -> Result<AiMemory> {
        input.validate()?;
        self.repository
            .upsert(user_id, input.key.trim(), input.value.trim())
            .await
    }

    async fn delete_memory(&self, user_id: &str, key: &str) -> Result<()> {
        match self.repository.delete(user_id, key).await? {
            0 => Err(Error::not_found("Memory")),
            _ => Ok(()),
        }
    }
}

pub struct LearningRuleService {
    repository: Arc<dyn AiLearningRuleRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
}

impl LearningRuleService {
    pub fn new(
        repository: Arc<dyn AiLearningRuleRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            categories,
        }
    }

    fn matching_rule(&self, user_id: &str, text: &str) -> Result<Option<AiLearningRule>> {
        let rules = self.repository.list(user_id)?;
        Ok(find_matching_rule(&rules, text).cloned())
    }
}

#[async_trait]
impl LearningRuleServiceTrait for LearningRuleService {
    fn list_rules(&self, user_id: &str) -> Result<Vec<AiLearningRule>> {
        self.repository.list(user_id)
    }

    async fn delete_rule(&self, user_id: &str, rule_id: &str) -> Result<()> {
        match self.repository.delete(user_id, rule_id).await? {
            0 => Err(Error::not_found("Rule")),
            _ => Ok(()),
        }
    }

    fn suggest_category(&self, user_id: &str, text: &str) -> Result<Option<CategorySuggestion>> {
        let Some(rule) = self.matching_rule(user_id, text)? else {
            return Ok(None);
        };
        match self.categories.get_by_id(user_id, &rule.category_id) {
            Ok(category) => Ok(Some(CategorySuggestion {
                category_id: category.id,
                category_name: category.name,
                matched_pattern: rule.pattern,
            })),
            // Category was deleted after the rule was learned.
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn apply_rule(&self, user_id: &str, text: &str) -> Result<Option<String>> {
        let Some(rule) = self.matching_rule(user_id, text)? else {
            return Ok(None);
        };
        if let Err(e) = self.repository.increment_usage(user_id, &rule.id).await {
            warn!("Failed to bump usage for rule {}: {}", rule.id, e);
        }
        debug!("Rule '{}' matched '{}'", rule.pattern, text);
        Ok(Some(rule.category_id))
    }

    async fn learn(&self, user_id: &str, merchant: &str, category_id: &str) -> Result<()> {
        let pattern = normalize_merchant(merchant);
        if pattern.is_empty() {
            return Ok(());
        }
        self.categories.get_by_id(user_id, category_id)?;
        self.repository.upsert(user_id, &pattern, category_id).await?;
        debug!("Learned rule '{}' -> {}", pattern, category_id);
        Ok(())
    }
}

pub struct SummaryService {
    repository: Arc<dyn AiSummaryRepositoryTrait>,
    memories: Arc<dyn AiMemoryRepositoryTrait>,
    reports: Arc<dyn ReportServiceTrait>,
    writer: Arc<dyn SummaryWriterTrait>,
}

impl SummaryService {
    pub fn new(
        repository: Arc<dyn AiSummaryRepositoryTrait>,
        memories: Arc<dyn AiMemoryRepositoryTrait>,
        reports: Arc<dyn ReportServiceTrait>,
        writer: Arc<dyn SummaryWriterTrait>,
    ) -> Self {
        Self {
            repository,
            memories,
            reports,
            writer,
        }
    }
}

#[async_trait]
impl SummaryServiceTrait for SummaryService {
    async fn get_or_generate_summary(
        &self,
        user_id: &str,
        period: &str,
        refresh: bool,
    ) -> Result<AiSummary> {
        let (year, month) = parse_month_key(period)
            .ok_or_else(|| Error::invalid("Period must be formatted as YYYY-MM"))?;

        if !refresh {
            if let Some(cached) = self.repository.get(user_id, period)? {
                return Ok(cached);
            }
        }

        let report = self.reports.monthly_report(user_id, year, month)?;
        let memories = self.memories.list(user_id)?;
        let content = self.writer.write_summary(&report, &memories).await?;
        debug!("Generated summary for {} ({})", user_id, period);
        self.repository.save(user_id, period, &content).await
    }
}
