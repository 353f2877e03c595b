//! Recurring transactions - schedules that generate ledger entries, plus detection
//! of unscheduled repeating expenses.

mod detection;
mod recurring_model;
mod recurring_service;
mod recurring_traits;


pub use detection::detect_recurring_patterns;
pub use recurring_model::{
    plan_generation, GenerateResult, GenerationPlan, NewRecurringTransaction,
    RecurringFrequency, RecurringGeneration, RecurringSuggestion, RecurringTransaction,
    RecurringUpdate,
};
pub use recurring_service::RecurringService;
pub use recurring_traits::{RecurringRepositoryTrait, RecurringServiceTrait};
