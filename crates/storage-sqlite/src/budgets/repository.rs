use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::info;
use std::sync::Arc;

use pocketpilot_core::budgets::{
    Budget, BudgetRepositoryTrait, BudgetUpdate, BudgetWithCategory, NewBudget,
};
use pocketpilot_core::Result;

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{budgets, categories};
use crate::utils::{decimal_to_db, now};

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_budget(conn: &mut SqliteConnection, user_id: &str, budget_id: &str) -> Result<BudgetDB> {
    budgets::table
        .filter(budgets::id.eq(budget_id))
        .filter(budgets::user_id.eq(user_id))
        .select(BudgetDB::as_select())
        .first(conn)
        .or_not_found("Budget")
}

fn insert_budget(conn: &mut SqliteConnection, user_id: &str, new_budget: NewBudget) -> Result<BudgetDB> {
    categories::table
        .filter(categories::id.eq(&new_budget.category_id))
        .filter(categories::user_id.eq(user_id))
        .select(categories::id)
        .first::<String>(conn)
        .or_not_found("Category")?;

    diesel::insert_into(budgets::table)
        .values(&BudgetDB::from_new(user_id, new_budget))
        .returning(BudgetDB::as_returning())
        .get_result(conn)
        .into_core()
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn list(&self, user_id: &str) -> Result<Vec<BudgetWithCategory>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(BudgetDB, String, String)> = budgets::table
            .inner_join(categories::table)
            .filter(budgets::user_id.eq(user_id))
            .order((categories::name.asc(), budgets::period.asc()))
            .select((BudgetDB::as_select(), categories::name, categories::color))
            .load(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(|(budget, name, color)| budget.with_category(name, color))
            .collect())
    }

    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<BudgetWithCategory> {
        let mut conn = get_connection(&self.pool)?;
        let (budget, name, color) = budgets::table
            .inner_join(categories::table)
            .filter(budgets::id.eq(budget_id))
            .filter(budgets::user_id.eq(user_id))
            .select((BudgetDB::as_select(), categories::name, categories::color))
            .first::<(BudgetDB, String, String)>(&mut conn)
            .or_not_found("Budget")?;
        Ok(budget.with_category(name, color))
    }

    async fn create(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| insert_budget(conn, &user_id, new_budget).map(Budget::from))
            .await
    }

    async fn update(&self, user_id: &str, budget_id: &str, update: BudgetUpdate) -> Result<Budget> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Budget> {
                let mut row = load_budget(conn, &user_id, &budget_id)?;
                if let Some(amount) = update.amount {
                    row.amount = decimal_to_db(amount);
                }
                if let Some(period) = update.period {
                    row.period = period.as_str().to_string();
                }
                if let Some(start_date) = update.start_date {
                    row.start_date = start_date;
                }
                if let Some(threshold) = update.alert_threshold {
                    row.alert_threshold = threshold;
                }
                row.updated_at = now();
                diesel::update(budgets::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    budgets::table
                        .filter(budgets::id.eq(&budget_id))
                        .filter(budgets::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn insert_batch(
        &self,
        user_id: &str,
        delete_existing: bool,
        new_budgets: Vec<NewBudget>,
    ) -> Result<Vec<Budget>> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Vec<Budget>> {
                if delete_existing {
                    let removed = diesel::delete(budgets::table.filter(budgets::user_id.eq(&user_id)))
                        .execute(conn)
                        .into_core()?;
                    info!("Replaced {} existing budgets for user {}", removed, user_id);
                }
                new_budgets
                    .into_iter()
                    .map(|b| insert_budget(conn, &user_id, b).map(Budget::from))
                    .collect()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup, TestDb};
    use pocketpilot_core::budgets::BudgetPeriod;
    use rust_decimal_macros::dec;

    fn monthly(category_id: &str) -> NewBudget {
        NewBudget {
            category_id: category_id.to_string(),
            amount: dec!(300),
            period: BudgetPeriod::Monthly,
            start_date: None,
            alert_threshold: 80,
        }
    }

    fn fixture() -> (TestDb, BudgetRepository) {
        let db = setup();
        db.insert_user("u1");
        db.insert_category("u1", "c1", "Groceries", "expense");
        db.insert_category("u1", "c2", "Travel", "expense");
        let repo = BudgetRepository::new(db.pool.clone(), db.writer.clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_list_joins_category() {
        let (_db, repo) = fixture();
        let budget = repo.create("u1", monthly("c1")).await.unwrap();
        assert_eq!(budget.amount, dec!(300));

        let listed = repo.list("u1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category_name, "Groceries");
        assert_eq!(repo.get_by_id("u1", &budget.id).unwrap().budget.id, budget.id);
    }

    #[tokio::test]
    async fn test_same_category_and_period_conflicts() {
        let (_db, repo) = fixture();
        repo.create("u1", monthly("c1")).await.unwrap();
        assert!(repo.create("u1", monthly("c1")).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_insert_batch_replaces_existing_atomically() {
        let (_db, repo) = fixture();
        repo.create("u1", monthly("c1")).await.unwrap();

        let created = repo
            .insert_batch("u1", true, vec![monthly("c1"), monthly("c2")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(repo.list("u1").unwrap().len(), 2);

        // A failing entry rolls back the delete as well.
        let err = repo
            .insert_batch("u1", true, vec![monthly("c1"), monthly("missing")])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.list("u1").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_changes_fields() {
        let (_db, repo) = fixture();
        let budget = repo.create("u1", monthly("c1")).await.unwrap();
        let updated = repo
            .update(
                "u1",
                &budget.id,
                BudgetUpdate {
                    amount: Some(dec!(450)),
                    alert_threshold: Some(90),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, dec!(450));
        assert_eq!(updated.alert_threshold, 90);
        assert_eq!(repo.delete("u1", &budget.id).await.unwrap(), 1);
    }
}
