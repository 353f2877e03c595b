//! SQLite storage implementation for budgets and budget templates.

mod model;
mod repository;
mod template_repository;

pub use model::{BudgetDB, BudgetTemplateDB};
pub use repository::BudgetRepository;
pub use template_repository::BudgetTemplateRepository;
