//! Pocket Pilot Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules for Pocket Pilot: accounts, the
//! transaction ledger, budgets, bills, goals, recurring schedules, reports and
//! the heuristics behind insights. It is database-agnostic and defines
//! repository traits that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod ai;
pub mod bills;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod export;
pub mod goals;
pub mod insights;
pub mod recurring;
pub mod reports;
pub mod tags;
pub mod transactions;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
