use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::sync::Arc;

use pocketpilot_core::ai::{
    AiLearningRule, AiLearningRuleRepositoryTrait, AiMemory, AiMemoryRepositoryTrait, AiSummary,
    AiSummaryRepositoryTrait,
};
use pocketpilot_core::Result;

use super::model::{AiLearningRuleDB, AiMemoryDB, AiSummaryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{ai_learning_rules, ai_memory, ai_summaries, categories};
use crate::utils::{new_id, now};

pub struct AiMemoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AiMemoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AiMemoryRepositoryTrait for AiMemoryRepository {
    fn list(&self, user_id: &str) -> Result<Vec<AiMemory>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ai_memory::table
            .filter(ai_memory::user_id.eq(user_id))
            .order(ai_memory::key.asc())
            .select(AiMemoryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(AiMemory::from).collect())
    }

    async fn upsert(&self, user_id: &str, key: &str, value: &str) -> Result<AiMemory> {
        let timestamp = now();
        let row = AiMemoryDB {
            id: new_id(),
            user_id: user_id.to_string(),
            key: key.trim().to_string(),
            value: value.to_string(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.writer
            .exec(move |conn| -> Result<AiMemory> {
                diesel::insert_into(ai_memory::table)
                    .values(&row)
                    .on_conflict((ai_memory::user_id, ai_memory::key))
                    .do_update()
                    .set((
                        ai_memory::value.eq(excluded(ai_memory::value)),
                        ai_memory::updated_at.eq(excluded(ai_memory::updated_at)),
                    ))
                    .returning(AiMemoryDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(AiMemory::from)
            })
            .await
    }

    async fn delete(&self, user_id: &str, key: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let key = key.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    ai_memory::table
                        .filter(ai_memory::user_id.eq(&user_id))
                        .filter(ai_memory::key.eq(&key)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}

pub struct AiLearningRuleRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AiLearningRuleRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AiLearningRuleRepositoryTrait for AiLearningRuleRepository {
    /// Most used rules first.
    fn list(&self, user_id: &str) -> Result<Vec<AiLearningRule>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ai_learning_rules::table
            .filter(ai_learning_rules::user_id.eq(user_id))
            .order((
                ai_learning_rules::usage_count.desc(),
                ai_learning_rules::pattern.asc(),
            ))
            .select(AiLearningRuleDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(AiLearningRule::from).collect())
    }

    async fn upsert(
        &self,
        user_id: &str,
        pattern: &str,
        category_id: &str,
    ) -> Result<AiLearningRule> {
        let timestamp = now();
        let row = AiLearningRuleDB {
            id: new_id(),
            user_id: user_id.to_string(),
            pattern: pattern.trim().to_lowercase(),
            category_id: category_id.to_string(),
            usage_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.writer
            .exec(move |conn| -> Result<AiLearningRule> {
                categories::table
                    .filter(categories::id.eq(&row.category_id))
                    .filter(categories::user_id.eq(&row.user_id))
                    .select(categories::id)
                    .first::<String>(conn)
                    .or_not_found("Category")?;

                diesel::insert_into(ai_learning_rules::table)
                    .values(&row)
                    .on_conflict((ai_learning_rules::user_id, ai_learning_rules::pattern))
                    .do_update()
                    .set((
                        ai_learning_rules::category_id.eq(excluded(ai_learning_rules::category_id)),
                        ai_learning_rules::updated_at.eq(excluded(ai_learning_rules::updated_at)),
                    ))
                    .returning(AiLearningRuleDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(AiLearningRule::from)
            })
            .await
    }

    async fn increment_usage(&self, user_id: &str, rule_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let rule_id = rule_id.to_string();
        self.writer
            .exec(move |conn| -> Result<()> {
                let updated = diesel::update(
                    ai_learning_rules::table
                        .filter(ai_learning_rules::id.eq(&rule_id))
                        .filter(ai_learning_rules::user_id.eq(&user_id)),
                )
                .set((
                    ai_learning_rules::usage_count.eq(ai_learning_rules::usage_count + 1),
                    ai_learning_rules::updated_at.eq(now()),
                ))
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(pocketpilot_core::Error::not_found("Learning rule"));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, user_id: &str, rule_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let rule_id = rule_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    ai_learning_rules::table
                        .filter(ai_learning_rules::id.eq(&rule_id))
                        .filter(ai_learning_rules::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}

pub struct AiSummaryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AiSummaryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AiSummaryRepositoryTrait for AiSummaryRepository {
    fn get(&self, user_id: &str, period: &str) -> Result<Option<AiSummary>> {
        let mut conn = get_connection(&self.pool)?;
        let row = ai_summaries::table
            .filter(ai_summaries::user_id.eq(user_id))
            .filter(ai_summaries::period.eq(period))
            .select(AiSummaryDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(AiSummary::from))
    }

    /// Replaces any summary already cached for the period.
    async fn save(&self, user_id: &str, period: &str, content: &str) -> Result<AiSummary> {
        let row = AiSummaryDB {
            id: new_id(),
            user_id: user_id.to_string(),
            period: period.to_string(),
            content: content.to_string(),
            created_at: now(),
        };
        self.writer
            .exec(move |conn| -> Result<AiSummary> {
                diesel::insert_into(ai_summaries::table)
                    .values(&row)
                    .on_conflict((ai_summaries::user_id, ai_summaries::period))
                    .do_update()
                    .set((
                        ai_summaries::content.eq(excluded(ai_summaries::content)),
                        ai_summaries::created_at.eq(excluded(ai_summaries::created_at)),
                    ))
                    .returning(AiSummaryDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(AiSummary::from)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;

    #[tokio::test]
    async fn test_memory_upsert_replaces_value() {
        let db = setup();
        db.insert_user("u1");
        let repo = AiMemoryRepository::new(db.pool.clone(), db.writer.clone());

        let first = repo.upsert("u1", "payday", "15th").await.unwrap();
        let second = repo.upsert("u1", "payday", "last friday").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "last friday");
        assert_eq!(repo.list("u1").unwrap().len(), 1);

        assert_eq!(repo.delete("u1", "payday").await.unwrap(), 1);
        assert_eq!(repo.delete("u1", "payday").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_learning_rule_upsert_and_usage() {
        let db = setup();
        db.insert_user("u1");
        db.insert_category("u1", "food", "Food", "expense");
        db.insert_category("u1", "coffee", "Coffee", "expense");
        let repo = AiLearningRuleRepository::new(db.pool.clone(), db.writer.clone());

        let rule = repo.upsert("u1", "  Starbucks ", "food").await.unwrap();
        assert_eq!(rule.pattern, "starbucks");
        let moved = repo.upsert("u1", "starbucks", "coffee").await.unwrap();
        assert_eq!(moved.id, rule.id);
        assert_eq!(moved.category_id, "coffee");

        repo.increment_usage("u1", &rule.id).await.unwrap();
        repo.increment_usage("u1", &rule.id).await.unwrap();
        assert_eq!(repo.list("u1").unwrap()[0].usage_count, 2);
        assert!(repo
            .increment_usage("u2", &rule.id)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_learning_rule_requires_own_category() {
        let db = setup();
        db.insert_user("u1");
        db.insert_user("u2");
        db.insert_category("u2", "food", "Food", "expense");
        let repo = AiLearningRuleRepository::new(db.pool.clone(), db.writer.clone());

        assert!(repo
            .upsert("u1", "tesco", "food")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_summary_cache_per_period() {
        let db = setup();
        db.insert_user("u1");
        let repo = AiSummaryRepository::new(db.pool.clone(), db.writer.clone());

        assert!(repo.get("u1", "2024-05").unwrap().is_none());
        repo.save("u1", "2024-05", "Quiet month.").await.unwrap();
        repo.save("u1", "2024-05", "Busy month.").await.unwrap();
        repo.save("u1", "2024-06", "June.").await.unwrap();

        let may = repo.get("u1", "2024-05").unwrap().unwrap();
        assert_eq!(may.content, "Busy month.");
        assert!(repo.get("u2", "2024-05").unwrap().is_none());
    }
}
