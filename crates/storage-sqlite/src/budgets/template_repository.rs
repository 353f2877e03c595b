use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use pocketpilot_core::budgets::{BudgetTemplate, BudgetTemplateRepositoryTrait, NewBudgetTemplate};
use pocketpilot_core::Result;

use super::model::BudgetTemplateDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::budget_templates;
use crate::utils::{new_id, now};

pub struct BudgetTemplateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetTemplateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetTemplateRepositoryTrait for BudgetTemplateRepository {
    fn list(&self, user_id: &str) -> Result<Vec<BudgetTemplate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_templates::table
            .filter(
                budget_templates::user_id
                    .is_null()
                    .or(budget_templates::user_id.eq(user_id)),
            )
            // Built-ins (NULL owner) sort first.
            .order((
                budget_templates::user_id.is_not_null().asc(),
                budget_templates::name.asc(),
            ))
            .select(BudgetTemplateDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| BudgetTemplate::try_from(row).into_core())
            .collect()
    }

    fn get_by_id(&self, user_id: &str, template_id: &str) -> Result<BudgetTemplate> {
        let mut conn = get_connection(&self.pool)?;
        let row = budget_templates::table
            .filter(budget_templates::id.eq(template_id))
            .filter(
                budget_templates::user_id
                    .is_null()
                    .or(budget_templates::user_id.eq(user_id)),
            )
            .select(BudgetTemplateDB::as_select())
            .first(&mut conn)
            .or_not_found("Budget template")?;
        BudgetTemplate::try_from(row).into_core()
    }

    async fn create(&self, user_id: &str, template: NewBudgetTemplate) -> Result<BudgetTemplate> {
        let row = BudgetTemplateDB {
            id: new_id(),
            user_id: Some(user_id.to_string()),
            name: template.name.trim().to_string(),
            description: template.description,
            allocations: serde_json::to_string(&template.allocations)?,
            created_at: now(),
        };
        self.writer
            .exec(move |conn| -> Result<BudgetTemplate> {
                let saved = diesel::insert_into(budget_templates::table)
                    .values(&row)
                    .returning(BudgetTemplateDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                BudgetTemplate::try_from(saved).into_core()
            })
            .await
    }

    async fn delete(&self, user_id: &str, template_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let template_id = template_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    budget_templates::table
                        .filter(budget_templates::id.eq(&template_id))
                        .filter(budget_templates::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use pocketpilot_core::budgets::{BudgetPeriod, TemplateAllocation};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_builtins_are_seeded_and_listed_first() {
        let db = setup();
        db.insert_user("u1");
        let repo = BudgetTemplateRepository::new(db.pool.clone(), db.writer.clone());

        let own = repo
            .create(
                "u1",
                NewBudgetTemplate {
                    name: "A mine".to_string(),
                    description: None,
                    allocations: vec![TemplateAllocation {
                        category_name: "Pets".to_string(),
                        percentage: None,
                        amount: Some(dec!(40)),
                        period: BudgetPeriod::Monthly,
                    }],
                },
            )
            .await
            .unwrap();

        let listed = repo.list("u1").unwrap();
        assert_eq!(listed.len(), 4);
        assert!(listed[..3].iter().all(|t| t.is_builtin()));
        assert_eq!(listed[3].id, own.id);

        let rule = repo.get_by_id("u1", "builtin-50-30-20").unwrap();
        assert!(rule.allocations.iter().all(|a| a.percentage.is_some()));
        assert_eq!(
            repo.get_by_id("u1", &own.id).unwrap().allocations[0].amount,
            Some(dec!(40))
        );
    }

    #[tokio::test]
    async fn test_delete_only_touches_own_templates() {
        let db = setup();
        db.insert_user("u1");
        db.insert_user("u2");
        let repo = BudgetTemplateRepository::new(db.pool.clone(), db.writer.clone());
        let own = repo
            .create(
                "u1",
                NewBudgetTemplate {
                    name: "Mine".to_string(),
                    description: None,
                    allocations: Vec::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(repo.delete("u1", "builtin-student").await.unwrap(), 0);
        assert!(repo.get_by_id("u2", &own.id).unwrap_err().is_not_found());
        assert_eq!(repo.delete("u2", &own.id).await.unwrap(), 0);
        assert_eq!(repo.delete("u1", &own.id).await.unwrap(), 1);
    }
}
