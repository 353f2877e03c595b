mod model;
mod repository;

pub use model::RecurringDB;
pub use repository::RecurringRepository;
