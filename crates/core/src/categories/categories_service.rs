use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::categories_constants::{
    DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES, FALLBACK_CATEGORY_COLOR,
};
use super::categories_model::{Category, CategoryType, CategoryUpdate, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn default_set() -> Vec<NewCategory> {
        let expense = DEFAULT_EXPENSE_CATEGORIES
            .iter()
            .map(|(name, color, icon)| (CategoryType::Expense, name, color, icon));
        let income = DEFAULT_INCOME_CATEGORIES
            .iter()
            .map(|(name, color, icon)| (CategoryType::Income, name, color, icon));
        expense
            .chain(income)
            .map(|(category_type, name, color, icon)| NewCategory {
                name: name.to_string(),
                category_type,
                color: Some(color.to_string()),
                icon: Some(icon.to_string()),
                parent_id: None,
            })
            .collect()
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn list_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>> {
        self.repository.list(user_id, category_type)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.repository.get_by_id(user_id, category_id)
    }

    async fn create_category(&self, user_id: &str, mut new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        new_category.name = new_category.name.trim().to_string();
        if let Some(parent_id) = &new_category.parent_id {
            let parent = self.repository.get_by_id(user_id, parent_id)?;
            if parent.category_type != new_category.category_type {
                return Err(Error::invalid(
                    "Parent category must have the same type",
                ));
            }
        }
        self.repository.create(user_id, new_category).await
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        mut update: CategoryUpdate,
    ) -> Result<Category> {
        update.validate()?;
        if update.parent_id.as_deref() == Some(category_id) {
            return Err(Error::invalid("A category cannot be its own parent"));
        }
        update.name = update.name.map(|n| n.trim().to_string());
        self.repository.update(user_id, category_id, update).await
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, category_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Category"));
        }
        debug!("Deleted category {} for user {}", category_id, user_id);
        Ok(())
    }

    async fn seed_default_categories(&self, user_id: &str) -> Result<usize> {
        let inserted = self
            .repository
            .create_many(user_id, Self::default_set())
            .await?;
        info!("Seeded {} default categories for user {}", inserted, user_id);
        Ok(inserted)
    }

    async fn resolve_or_create(&self, user_id: &str, name: &str) -> Result<Category> {
        let name = name.trim();
        if let Some(existing) =
            self.repository
                .find_by_name(user_id, name, CategoryType::Expense)?
        {
            return Ok(existing);
        }
        debug!("Creating missing expense category '{}' for user {}", name, user_id);
        self.create_category(
            user_id,
            NewCategory {
                name: name.to_string(),
                category_type: CategoryType::Expense,
                color: Some(FALLBACK_CATEGORY_COLOR.to_string()),
                icon: None,
                parent_id: None,
            },
        )
        .await
    }
}
