//! Server-side implementation of `AiEnvironment`.

use std::sync::Arc;

use pocketpilot_ai::{AiEnvironment, LlmConfig};
use pocketpilot_core::{
    accounts::AccountServiceTrait, ai::AiMemoryServiceTrait, bills::BillServiceTrait,
    budgets::BudgetServiceTrait, categories::CategoryServiceTrait, goals::GoalServiceTrait,
    insights::InsightsServiceTrait, transactions::TransactionServiceTrait,
};

/// Hands the assistant the same service instances the HTTP handlers use.
pub struct ServerAiEnvironment {
    pub llm: LlmConfig,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub category_service: Arc<dyn CategoryServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub bill_service: Arc<dyn BillServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub insights_service: Arc<dyn InsightsServiceTrait>,
    pub memory_service: Arc<dyn AiMemoryServiceTrait>,
}

impl AiEnvironment for ServerAiEnvironment {
    fn llm_config(&self) -> LlmConfig {
        self.llm.clone()
    }

    fn account_service(&self) -> Arc<dyn AccountServiceTrait> {
        self.account_service.clone()
    }

    fn category_service(&self) -> Arc<dyn CategoryServiceTrait> {
        self.category_service.clone()
    }

    fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait> {
        self.transaction_service.clone()
    }

    fn bill_service(&self) -> Arc<dyn BillServiceTrait> {
        self.bill_service.clone()
    }

    fn budget_service(&self) -> Arc<dyn BudgetServiceTrait> {
        self.budget_service.clone()
    }

    fn goal_service(&self) -> Arc<dyn GoalServiceTrait> {
        self.goal_service.clone()
    }

    fn insights_service(&self) -> Arc<dyn InsightsServiceTrait> {
        self.insights_service.clone()
    }

    fn memory_service(&self) -> Arc<dyn AiMemoryServiceTrait> {
        self.memory_service.clone()
    }
}
