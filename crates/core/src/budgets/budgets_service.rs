use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

use super::budget_status::compute_budget_status;
use super::budgets_model::{
    ApplyTemplateRequest, ApplyTemplateResult, Budget, BudgetPeriod, BudgetStatus,
    BudgetTemplate, BudgetUpdate, BudgetWithCategory, NewBudget, NewBudgetTemplate,
};
use super::budgets_traits::{
    BudgetRepositoryTrait, BudgetServiceTrait, BudgetTemplateRepositoryTrait,
};
use crate::categories::{CategoryServiceTrait, CategoryType};
use crate::errors::{Error, FieldErrors, Result};
use crate::transactions::TransactionRepositoryTrait;
use crate::utils::money::round_money;

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    template_repository: Arc<dyn BudgetTemplateRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    categories: Arc<dyn CategoryServiceTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        template_repository: Arc<dyn BudgetTemplateRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        categories: Arc<dyn CategoryServiceTrait>,
    ) -> Self {
        Self {
            repository,
            template_repository,
            transactions,
            categories,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<BudgetWithCategory>> {
        self.repository.list(user_id)
    }

    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
        new_budget.validate()?;
        let category = self.categories.get_category(user_id, &new_budget.category_id)?;
        if category.category_type != CategoryType::Expense {
            let mut errors = FieldErrors::new();
            errors.add("categoryId", "Budgets can only track expense categories");
            errors.into_result()?;
        }
        self.repository.create(user_id, new_budget).await
    }

    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        update.validate()?;
        self.repository.update(user_id, budget_id, update).await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        match self.repository.delete(user_id, budget_id).await? {
            0 => Err(Error::not_found("Budget")),
            _ => Ok(()),
        }
    }

    fn get_budget_status(&self, user_id: &str, today: NaiveDate) -> Result<Vec<BudgetStatus>> {
        let budgets = self.repository.list(user_id)?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }
        let windows: Vec<_> = budgets
            .iter()
            .map(|b| b.budget.period.window(today))
            .collect();
        let start = windows.iter().map(|w| w.0).min().unwrap_or(today);
        let end = windows.iter().map(|w| w.1).max().unwrap_or(today);
        let transactions = self.transactions.list_between(user_id, start, end)?;

        Ok(budgets
            .iter()
            .map(|b| compute_budget_status(b, &transactions, today))
            .collect())
    }

    fn list_templates(&self, user_id: &str) -> Result<Vec<BudgetTemplate>> {
        self.template_repository.list(user_id)
    }

    async fn create_template(
        &self,
        user_id: &str,
        template: NewBudgetTemplate,
    ) -> Result<BudgetTemplate> {
        template.validate()?;
        self.template_repository.create(user_id, template).await
    }

    async fn delete_template(&self, user_id: &str, template_id: &str) -> Result<()> {
        let template = self.template_repository.get_by_id(user_id, template_id)?;
        if template.is_builtin() {
            return Err(Error::invalid("Built-in templates cannot be deleted"));
        }
        match self.template_repository.delete(user_id, template_id).await? {
            0 => Err(Error::not_found("Budget template")),
            _ => Ok(()),
        }
    }

    async fn apply_template(
        &self,
        user_id: &str,
        request: ApplyTemplateRequest,
        today: NaiveDate,
    ) -> Result<ApplyTemplateResult> {
        let template = self
            .template_repository
            .get_by_id(user_id, &request.template_id)?;

        let needs_income = template.allocations.iter().any(|a| a.is_percentage());
        match request.monthly_income {
            None if needs_income => {
                let mut errors = FieldErrors::new();
                errors.add(
                    "monthlyIncome",
                    "Monthly income is required for percentage-based templates",
                );
                errors.into_result()?;
            }
            Some(income) if income <= Decimal::ZERO => {
                let mut errors = FieldErrors::new();
                errors.add("monthlyIncome", "Monthly income must be greater than zero");
                errors.into_result()?;
            }
            _ => {}
        }
        let income = request.monthly_income.unwrap_or(Decimal::ZERO);

        let mut taken: HashSet<(String, BudgetPeriod)> = HashSet::new();
        if !request.replace_existing {
            for existing in self.repository.list(user_id)? {
                taken.insert((existing.budget.category_id, existing.budget.period));
            }
        }

        let mut to_create = Vec::new();
        let mut skipped = Vec::new();
        for allocation in &template.allocations {
            let category = self
                .categories
                .resolve_or_create(user_id, &allocation.category_name)
                .await?;
            if !taken.insert((category.id.clone(), allocation.period)) {
                skipped.push(allocation.category_name.clone());
                continue;
            }
            let amount = match (allocation.percentage, allocation.amount) {
                (Some(pct), _) => round_money(income * pct / Decimal::ONE_HUNDRED),
                (None, Some(amount)) => amount,
                (None, None) => continue,
            };
            to_create.push(NewBudget {
                category_id: category.id,
                amount,
                period: allocation.period,
                start_date: Some(today),
                alert_threshold: crate::constants::DEFAULT_ALERT_THRESHOLD,
            });
        }

        if request.replace_existing {
            info!(
                "Replacing all budgets for user {} with template '{}'",
                user_id, template.name
            );
        }
        let created = self
            .repository
            .insert_batch(user_id, request.replace_existing, to_create)
            .await?;
        debug!(
            "Template '{}' created {} budgets, skipped {}",
            template.name,
            created.len(),
            skipped.len()
        );
        Ok(ApplyTemplateResult { created, skipped })
    }
}
