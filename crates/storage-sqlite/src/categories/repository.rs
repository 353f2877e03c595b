use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use pocketpilot_core::categories::{
    Category, CategoryRepositoryTrait, CategoryType, CategoryUpdate, NewCategory,
};
use pocketpilot_core::{Error, Result};

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::categories;
use crate::utils::lower;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_category(
    conn: &mut SqliteConnection,
    user_id: &str,
    category_id: &str,
) -> Result<CategoryDB> {
    categories::table
        .filter(categories::id.eq(category_id))
        .filter(categories::user_id.eq(user_id))
        .select(CategoryDB::as_select())
        .first(conn)
        .or_not_found("Category")
}

fn find_named(
    conn: &mut SqliteConnection,
    user_id: &str,
    name: &str,
    category_type: &str,
) -> Result<Option<CategoryDB>> {
    categories::table
        .filter(categories::user_id.eq(user_id))
        .filter(categories::category_type.eq(category_type))
        .filter(lower(categories::name).eq(name.trim().to_lowercase()))
        .select(CategoryDB::as_select())
        .first(conn)
        .optional()
        .into_core()
}

/// A parent must belong to the same user and may not be the category itself.
fn check_parent(
    conn: &mut SqliteConnection,
    user_id: &str,
    category_id: &str,
    parent_id: &str,
) -> Result<()> {
    if parent_id == category_id {
        return Err(Error::invalid("A category cannot be its own parent"));
    }
    load_category(conn, user_id, parent_id).map(|_| ())
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list(&self, user_id: &str, category_type: Option<CategoryType>) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table
            .filter(categories::user_id.eq(user_id))
            .into_boxed();
        if let Some(category_type) = category_type {
            query = query.filter(categories::category_type.eq(category_type.as_str()));
        }
        let rows = query
            .order((categories::category_type.asc(), categories::name.asc()))
            .select(CategoryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn get_by_id(&self, user_id: &str, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        load_category(&mut conn, user_id, category_id).map(Category::from)
    }

    fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let row = find_named(&mut conn, user_id, name, category_type.as_str())?;
        Ok(row.map(Category::from))
    }

    async fn create(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        let row = CategoryDB::from_new(user_id, new_category);
        self.writer
            .exec(move |conn| -> Result<Category> {
                if let Some(parent_id) = row.parent_id.as_deref() {
                    check_parent(conn, &row.user_id, &row.id, parent_id)?;
                }
                let saved = diesel::insert_into(categories::table)
                    .values(&row)
                    .returning(CategoryDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(saved.into())
            })
            .await
    }

    async fn create_many(&self, user_id: &str, new_categories: Vec<NewCategory>) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                let mut inserted = 0;
                for new_category in new_categories {
                    let row = CategoryDB::from_new(&user_id, new_category);
                    if find_named(conn, &user_id, &row.name, &row.category_type)?.is_some() {
                        continue;
                    }
                    inserted += diesel::insert_into(categories::table)
                        .values(&row)
                        .execute(conn)
                        .into_core()?;
                }
                debug!("Inserted {} categories for user {}", inserted, user_id);
                Ok(inserted)
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<Category> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Category> {
                let mut row = load_category(conn, &user_id, &category_id)?;
                if let Some(name) = update.name {
                    row.name = name.trim().to_string();
                }
                if let Some(color) = update.color {
                    row.color = color;
                }
                if update.icon.is_some() {
                    row.icon = update.icon;
                }
                // An empty parent id moves the category back to the top level.
                match update.parent_id.as_deref() {
                    Some("") => row.parent_id = None,
                    Some(parent_id) => {
                        check_parent(conn, &user_id, &row.id, parent_id)?;
                        row.parent_id = Some(parent_id.to_string());
                    }
                    None => {}
                }
                diesel::update(categories::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    categories::table
                        .filter(categories::id.eq(&category_id))
                        .filter(categories::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
