//! Users module - registered accounts used for authentication.

mod users_model;
mod users_traits;

pub use users_model::{normalize_email, NewUser, User};
pub use users_traits::UserRepositoryTrait;
