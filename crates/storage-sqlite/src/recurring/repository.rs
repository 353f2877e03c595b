use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use pocketpilot_core::recurring::{
    NewRecurringTransaction, RecurringGeneration, RecurringRepositoryTrait, RecurringTransaction,
    RecurringUpdate,
};
use pocketpilot_core::transactions::Transaction;
use pocketpilot_core::Result;

use super::model::RecurringDB;
use crate::accounts::load_account;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{categories, recurring_transactions};
use crate::transactions::insert_transaction;
use crate::utils::now;

pub struct RecurringRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecurringRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_recurring(
    conn: &mut SqliteConnection,
    user_id: &str,
    recurring_id: &str,
) -> Result<RecurringDB> {
    recurring_transactions::table
        .filter(recurring_transactions::id.eq(recurring_id))
        .filter(recurring_transactions::user_id.eq(user_id))
        .select(RecurringDB::as_select())
        .first(conn)
        .or_not_found("Recurring transaction")
}

/// Account and category must belong to the row's owner.
fn check_links(conn: &mut SqliteConnection, row: &RecurringDB) -> Result<()> {
    load_account(conn, &row.user_id, &row.account_id)?;
    if let Some(category_id) = &row.category_id {
        categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::user_id.eq(&row.user_id))
            .select(categories::id)
            .first::<String>(conn)
            .or_not_found("Category")?;
    }
    Ok(())
}

#[async_trait]
impl RecurringRepositoryTrait for RecurringRepository {
    fn list(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recurring_transactions::table
            .filter(recurring_transactions::user_id.eq(user_id))
            .order((
                recurring_transactions::next_date.asc(),
                recurring_transactions::description.asc(),
            ))
            .select(RecurringDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(RecurringTransaction::from).collect())
    }

    fn get_by_id(&self, user_id: &str, recurring_id: &str) -> Result<RecurringTransaction> {
        let mut conn = get_connection(&self.pool)?;
        load_recurring(&mut conn, user_id, recurring_id).map(RecurringTransaction::from)
    }

    async fn create(
        &self,
        user_id: &str,
        new_item: NewRecurringTransaction,
    ) -> Result<RecurringTransaction> {
        let row = RecurringDB::from_new(user_id, new_item);
        self.writer
            .exec(move |conn| -> Result<RecurringTransaction> {
                check_links(conn, &row)?;
                diesel::insert_into(recurring_transactions::table)
                    .values(&row)
                    .returning(RecurringDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(RecurringTransaction::from)
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        recurring_id: &str,
        update: RecurringUpdate,
    ) -> Result<RecurringTransaction> {
        let user_id = user_id.to_string();
        let recurring_id = recurring_id.to_string();
        self.writer
            .exec(move |conn| -> Result<RecurringTransaction> {
                let mut row = load_recurring(conn, &user_id, &recurring_id)?;
                row.apply(update);
                check_links(conn, &row)?;
                diesel::update(recurring_transactions::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, recurring_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let recurring_id = recurring_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    recurring_transactions::table
                        .filter(recurring_transactions::id.eq(&recurring_id))
                        .filter(recurring_transactions::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn apply_generation(
        &self,
        user_id: &str,
        generation: RecurringGeneration,
    ) -> Result<Vec<Transaction>> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Vec<Transaction>> {
                let row = load_recurring(conn, &user_id, &generation.recurring_id)?;

                let mut created = Vec::with_capacity(generation.transactions.len());
                for new_transaction in generation.transactions {
                    let saved = insert_transaction(conn, &user_id, new_transaction)?;
                    created.push(Transaction::from(saved));
                }

                diesel::update(recurring_transactions::table.find(&row.id))
                    .set((
                        recurring_transactions::next_date.eq(generation.next_date),
                        recurring_transactions::last_generated.eq(generation.last_generated),
                        recurring_transactions::is_active.eq(generation.is_active),
                        recurring_transactions::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .into_core()?;

                debug!(
                    "Generated {} transaction(s) for recurring item {}",
                    created.len(),
                    row.id
                );
                Ok(created)
            })
            .await
    }
}
