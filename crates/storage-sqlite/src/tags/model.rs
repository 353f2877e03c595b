use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketpilot_core::tags::{NewTag, Tag};
use pocketpilot_core::transactions::TagRef;

use crate::utils::{new_id, now};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transaction_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionTagDB {
    pub transaction_id: String,
    pub tag_id: String,
}

impl TagDB {
    pub fn from_new(user_id: &str, domain: NewTag) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: domain.name,
            color: domain.color,
            usage_count: 0,
            created_at: now(),
        }
    }
}

impl From<TagDB> for Tag {
    fn from(db: TagDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            color: db.color,
            usage_count: db.usage_count,
            created_at: db.created_at,
        }
    }
}

impl From<TagDB> for TagRef {
    fn from(db: TagDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            color: db.color,
        }
    }
}
