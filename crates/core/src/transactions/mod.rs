//! Transactions module - ledger entries, search, and balance bookkeeping.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

#[cfg(test)]
mod transactions_service_tests;

pub use transactions_model::{
    NewTransaction, TagRef, Transaction, TransactionFilter, TransactionPage, TransactionType,
    TransactionUpdate, TransactionWithDetails,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
