//! SQLite storage implementation for savings goals and their contributions.

mod model;
mod repository;

pub use model::{GoalContributionDB, GoalDB};
pub use repository::GoalRepository;
