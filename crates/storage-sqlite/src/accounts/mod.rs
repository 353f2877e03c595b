//! SQLite storage implementation for accounts.

mod model;
mod repository;

pub use model::AccountDB;
pub use repository::AccountRepository;
pub(crate) use repository::{apply_balance_delta, load_account};
