//! SQLite storage implementation for tags and transaction tag links.

mod model;
mod repository;

pub use model::{TagDB, TransactionTagDB};
pub use repository::TagRepository;
pub(crate) use repository::load_tag_refs;
