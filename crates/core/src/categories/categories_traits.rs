use async_trait::async_trait;

use super::categories_model::{Category, CategoryType, CategoryUpdate, NewCategory};
use crate::errors::Result;

#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list(&self, user_id: &str, category_type: Option<CategoryType>) -> Result<Vec<Category>>;
    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category>;
    /// Case-insensitive lookup by name within a type.
    fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Option<Category>>;
    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;
    /// Inserts many categories, skipping names that already exist.
    async fn create_many(&self, user_id: &str, categories: Vec<NewCategory>) -> Result<usize>;
    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;
    /// Deletes the category; transactions referencing it keep a NULL category.
    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn list_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>>;
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;
    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category>;
    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()>;
    async fn seed_default_categories(&self, user_id: &str) -> Result<usize>;
    /// Returns the category with this name, creating an expense category when missing.
    async fn resolve_or_create(&self, user_id: &str, name: &str) -> Result<Category>;
}
