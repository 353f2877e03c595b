//! Budgets module - per-category spending limits, status, and templates.

mod budget_status;
mod budgets_model;
mod budgets_service;
mod budgets_traits;


pub use budget_status::compute_budget_status;
pub use budgets_model::{
    ApplyTemplateRequest, ApplyTemplateResult, Budget, BudgetPeriod, BudgetStatus,
    BudgetTemplate, BudgetUpdate, BudgetWithCategory, NewBudget, NewBudgetTemplate,
    TemplateAllocation,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{
    BudgetRepositoryTrait, BudgetServiceTrait, BudgetTemplateRepositoryTrait,
};
