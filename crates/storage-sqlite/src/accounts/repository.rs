use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use pocketpilot_core::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use pocketpilot_core::Result;

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::accounts;
use crate::utils::{decimal_to_db, now, parse_decimal};

pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

pub(crate) fn load_account(
    conn: &mut SqliteConnection,
    user_id: &str,
    account_id: &str,
) -> Result<AccountDB> {
    accounts::table
        .filter(accounts::id.eq(account_id))
        .filter(accounts::user_id.eq(user_id))
        .select(AccountDB::as_select())
        .first(conn)
        .or_not_found("Account")
}

/// Adds `delta` to an account balance on the caller's connection.
///
/// Used inside writer jobs so balance changes commit with the rows that caused them.
pub(crate) fn apply_balance_delta(
    conn: &mut SqliteConnection,
    user_id: &str,
    account_id: &str,
    delta: Decimal,
) -> Result<()> {
    if delta.is_zero() {
        return Ok(());
    }
    let account = load_account(conn, user_id, account_id)?;
    let balance = parse_decimal(&account.balance, "balance") + delta;
    diesel::update(accounts::table.find(&account.id))
        .set((
            accounts::balance.eq(decimal_to_db(balance)),
            accounts::updated_at.eq(now()),
        ))
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    fn list(&self, user_id: &str, include_archived: bool) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = accounts::table
            .filter(accounts::user_id.eq(user_id))
            .into_boxed();
        if !include_archived {
            query = query.filter(accounts::is_archived.eq(false));
        }
        let rows = query
            .order((accounts::is_archived.asc(), accounts::name.asc()))
            .select(AccountDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    fn get_by_id(&self, user_id: &str, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        load_account(&mut conn, user_id, account_id).map(Account::from)
    }

    async fn create(&self, user_id: &str, new_account: NewAccount) -> Result<Account> {
        let row = AccountDB::from_new(user_id, new_account);
        self.writer
            .exec(move |conn| -> Result<Account> {
                let saved = diesel::insert_into(accounts::table)
                    .values(&row)
                    .returning(AccountDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(saved.into())
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account> {
        let user_id = user_id.to_string();
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Account> {
                let mut row = load_account(conn, &user_id, &account_id)?;
                row.apply(update);
                diesel::update(accounts::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn archive(&self, user_id: &str, account_id: &str) -> Result<Account> {
        let user_id = user_id.to_string();
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Account> {
                let mut row = load_account(conn, &user_id, &account_id)?;
                row.is_archived = true;
                row.updated_at = now();
                diesel::update(accounts::table.find(&row.id))
                    .set((
                        accounts::is_archived.eq(true),
                        accounts::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn adjust_balance(
        &self,
        user_id: &str,
        account_id: &str,
        delta: Decimal,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| apply_balance_delta(conn, &user_id, &account_id, delta))
            .await
    }
}
