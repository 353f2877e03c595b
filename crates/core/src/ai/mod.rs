//! Assistant support data: remembered facts, learned categorisation rules and
//! cached monthly summaries. The LLM orchestration itself lives in `pocketpilot-ai`.

mod ai_model;
mod ai_service;
mod ai_traits;
mod learning;
mod summary_writer;

#[cfg(test)]
mod ai_service_tests;

pub use ai_model::{AiLearningRule, AiMemory, AiSummary, CategorySuggestion, MemoryUpsert};
pub use ai_service::{AiMemoryService, LearningRuleService, SummaryService};
pub use ai_traits::{
    AiLearningRuleRepositoryTrait, AiMemoryRepositoryTrait, AiMemoryServiceTrait,
    AiSummaryRepositoryTrait, LearningRuleServiceTrait, SummaryServiceTrait,
    SummaryWriterTrait,
};
pub use learning::find_matching_rule;
pub use summary_writer::TemplateSummaryWriter;
