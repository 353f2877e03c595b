use async_trait::async_trait;
use chrono::NaiveDate;

use super::budgets_model::{
    ApplyTemplateRequest, ApplyTemplateResult, Budget, BudgetStatus, BudgetTemplate,
    BudgetUpdate, BudgetWithCategory, NewBudget, NewBudgetTemplate,
};
use crate::errors::Result;

#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str) -> Result<Vec<BudgetWithCategory>>;
    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<BudgetWithCategory>;
    async fn create(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget>;
    async fn update(&self, user_id: &str, budget_id: &str, update: BudgetUpdate)
        -> Result<Budget>;
    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<usize>;
    /// Inserts `budgets` in one database transaction, first deleting every budget
    /// the user has when `delete_existing` is set.
    async fn insert_batch(
        &self,
        user_id: &str,
        delete_existing: bool,
        budgets: Vec<NewBudget>,
    ) -> Result<Vec<Budget>>;
}

#[async_trait]
pub trait BudgetTemplateRepositoryTrait: Send + Sync {
    /// Built-in templates followed by the user's own.
    fn list(&self, user_id: &str) -> Result<Vec<BudgetTemplate>>;
    fn get_by_id(&self, user_id: &str, template_id: &str) -> Result<BudgetTemplate>;
    async fn create(&self, user_id: &str, template: NewBudgetTemplate) -> Result<BudgetTemplate>;
    /// Only the user's own templates can be deleted.
    async fn delete(&self, user_id: &str, template_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<BudgetWithCategory>>;
    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()>;
    fn get_budget_status(&self, user_id: &str, today: NaiveDate) -> Result<Vec<BudgetStatus>>;

    fn list_templates(&self, user_id: &str) -> Result<Vec<BudgetTemplate>>;
    async fn create_template(
        &self,
        user_id: &str,
        template: NewBudgetTemplate,
    ) -> Result<BudgetTemplate>;
    async fn delete_template(&self, user_id: &str, template_id: &str) -> Result<()>;
    async fn apply_template(
        &self,
        user_id: &str,
        request: ApplyTemplateRequest,
        today: NaiveDate,
    ) -> Result<ApplyTemplateResult>;
}
