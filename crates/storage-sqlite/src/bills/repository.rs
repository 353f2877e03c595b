use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use pocketpilot_core::bills::{Bill, BillRepositoryTrait, BillUpdate, NewBill, PaymentState};
use pocketpilot_core::Result;

use super::model::BillDB;
use crate::accounts::load_account;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::bills;

pub struct BillRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BillRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_bill(conn: &mut SqliteConnection, user_id: &str, bill_id: &str) -> Result<BillDB> {
    bills::table
        .filter(bills::id.eq(bill_id))
        .filter(bills::user_id.eq(user_id))
        .select(BillDB::as_select())
        .first(conn)
        .or_not_found("Bill")
}

/// The linked account, when present, must be the user's own.
fn check_links(conn: &mut SqliteConnection, row: &BillDB) -> Result<()> {
    if let Some(account_id) = &row.account_id {
        load_account(conn, &row.user_id, account_id)?;
    }
    Ok(())
}

fn save(conn: &mut SqliteConnection, row: BillDB) -> Result<Bill> {
    diesel::update(bills::table.find(&row.id))
        .set(&row)
        .execute(conn)
        .into_core()?;
    Ok(row.into())
}

#[async_trait]
impl BillRepositoryTrait for BillRepository {
    fn list(&self, user_id: &str, active_only: bool) -> Result<Vec<Bill>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = bills::table.filter(bills::user_id.eq(user_id)).into_boxed();
        if active_only {
            query = query.filter(bills::is_active.eq(true));
        }
        let rows = query
            .order((bills::next_due_date.asc(), bills::name.asc()))
            .select(BillDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Bill::from).collect())
    }

    fn get_by_id(&self, user_id: &str, bill_id: &str) -> Result<Bill> {
        let mut conn = get_connection(&self.pool)?;
        load_bill(&mut conn, user_id, bill_id).map(Bill::from)
    }

    async fn create(&self, user_id: &str, new_bill: NewBill) -> Result<Bill> {
        let row = BillDB::from_new(user_id, new_bill);
        self.writer
            .exec(move |conn| -> Result<Bill> {
                check_links(conn, &row)?;
                diesel::insert_into(bills::table)
                    .values(&row)
                    .returning(BillDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Bill::from)
            })
            .await
    }

    async fn update(&self, user_id: &str, bill_id: &str, update: BillUpdate) -> Result<Bill> {
        let user_id = user_id.to_string();
        let bill_id = bill_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Bill> {
                let mut row = load_bill(conn, &user_id, &bill_id)?;
                row.apply(update);
                check_links(conn, &row)?;
                save(conn, row)
            })
            .await
    }

    async fn delete(&self, user_id: &str, bill_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let bill_id = bill_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    bills::table
                        .filter(bills::id.eq(&bill_id))
                        .filter(bills::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn record_payment(
        &self,
        user_id: &str,
        bill_id: &str,
        state: PaymentState,
    ) -> Result<Bill> {
        let user_id = user_id.to_string();
        let bill_id = bill_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Bill> {
                let mut row = load_bill(conn, &user_id, &bill_id)?;
                row.record(state);
                save(conn, row)
            })
            .await
    }
}
