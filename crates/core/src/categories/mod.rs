//! Categories module - income/expense categories and the default seed set.

mod categories_constants;
mod categories_model;
mod categories_service;
mod categories_traits;


pub use categories_constants::*;
pub use categories_model::{Category, CategoryType, CategoryUpdate, NewCategory};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
