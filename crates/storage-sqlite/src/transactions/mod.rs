//! SQLite storage implementation for transactions.
//!
//! Every write that creates, changes or removes a transaction also moves the
//! owning account's balance inside the same writer transaction.

mod model;
mod repository;

pub use model::TransactionDB;
pub use repository::TransactionRepository;
pub(crate) use repository::insert_transaction;
