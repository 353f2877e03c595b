use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketpilot_core::categories::{Category, NewCategory, FALLBACK_CATEGORY_COLOR};

use crate::utils::{new_id, now, parse_enum};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub color: String,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl CategoryDB {
    pub fn from_new(user_id: &str, domain: NewCategory) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: domain.name.trim().to_string(),
            category_type: domain.category_type.as_str().to_string(),
            color: domain
                .color
                .unwrap_or_else(|| FALLBACK_CATEGORY_COLOR.to_string()),
            icon: domain.icon,
            parent_id: domain.parent_id,
            created_at: now(),
        }
    }
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            category_type: parse_enum(&db.category_type, "category_type"),
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            color: db.color,
            icon: db.icon,
            parent_id: db.parent_id,
            created_at: db.created_at,
        }
    }
}
