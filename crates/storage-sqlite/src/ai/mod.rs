//! Repositories for assistant memory, learned categorisation rules and cached
//! monthly summaries.

mod model;
mod repository;

pub use model::{AiLearningRuleDB, AiMemoryDB, AiSummaryDB};
pub use repository::{AiLearningRuleRepository, AiMemoryRepository, AiSummaryRepository};
