//! SQLite storage for Pocket Pilot.
//!
//! Implements the repository traits declared in `pocketpilot-core` with Diesel
//! on top of a single SQLite file:
//! - connection pooling and the single-writer actor
//! - embedded migrations
//! - one repository per domain area, each with its Diesel row types
//!
//! No other crate depends on Diesel.
//!
//! ```text
//!   core (domain + traits)
//!           │
//!           ▼
//!   storage-sqlite (this crate)
//!           │
//!           ▼
//!       SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod ai;
pub mod bills;
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod recurring;
pub mod tags;
pub mod transactions;
pub mod users;

#[cfg(test)]
mod test_support;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use pocketpilot_core::errors::{DatabaseError, Error, Result};
