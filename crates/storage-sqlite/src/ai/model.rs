use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketpilot_core::ai::{AiLearningRule, AiMemory, AiSummary};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ai_memory)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AiMemoryDB {
    pub id: String,
    pub user_id: String,
    pub key: String,
    pub value: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ai_learning_rules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AiLearningRuleDB {
    pub id: String,
    pub user_id: String,
    pub pattern: String,
    pub category_id: String,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ai_summaries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AiSummaryDB {
    pub id: String,
    pub user_id: String,
    pub period: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<AiMemoryDB> for AiMemory {
    fn from(db: AiMemoryDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            key: db.key,
            value: db.value,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<AiLearningRuleDB> for AiLearningRule {
    fn from(db: AiLearningRuleDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            pattern: db.pattern,
            category_id: db.category_id,
            usage_count: db.usage_count,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<AiSummaryDB> for AiSummary {
    fn from(db: AiSummaryDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            period: db.period,
            content: db.content,
            created_at: db.created_at,
        }
    }
}
