use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use pocketpilot_core::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionRepositoryTrait, TransactionType,
    TransactionUpdate, TransactionWithDetails,
};
use pocketpilot_core::Result;

use super::model::TransactionDB;
use crate::accounts::{apply_balance_delta, load_account};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{accounts, categories, transaction_tags, transactions};
use crate::tags::load_tag_refs;
use crate::utils::{chunk_for_sqlite, decimal_to_db, like_pattern, now};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Transactions of one user narrowed by every criterion in `filter` except paging.
fn filtered<'a>(user_id: &'a str, filter: &'a TransactionFilter) -> transactions::BoxedQuery<'a, Sqlite> {
    let mut query = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .into_boxed();

    if let Some(account_id) = &filter.account_id {
        query = query.filter(transactions::account_id.eq(account_id));
    }
    if let Some(category_id) = &filter.category_id {
        query = query.filter(transactions::category_id.eq(category_id));
    }
    if let Some(transaction_type) = filter.transaction_type {
        query = query.filter(transactions::transaction_type.eq(transaction_type.as_str()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(transactions::date.ge(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(transactions::date.le(end));
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        query = query.filter(
            transactions::description
                .like(pattern.clone())
                .escape('\\')
                .or(transactions::merchant.like(pattern).escape('\\')),
        );
    }
    if let Some(tag_id) = &filter.tag_id {
        query = query.filter(
            transactions::id.eq_any(
                transaction_tags::table
                    .filter(transaction_tags::tag_id.eq(tag_id))
                    .select(transaction_tags::transaction_id),
            ),
        );
    }
    query
}

/// Joins account names, category names/colours and tags onto `rows`, keeping their order.
fn with_details(
    conn: &mut SqliteConnection,
    rows: Vec<TransactionDB>,
) -> Result<Vec<TransactionWithDetails>> {
    let mut account_ids: Vec<String> = rows.iter().map(|r| r.account_id.clone()).collect();
    account_ids.sort();
    account_ids.dedup();
    let mut category_ids: Vec<String> = rows.iter().filter_map(|r| r.category_id.clone()).collect();
    category_ids.sort();
    category_ids.dedup();
    let transaction_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

    let mut account_names: HashMap<String, String> = HashMap::new();
    for chunk in chunk_for_sqlite(&account_ids) {
        let found: Vec<(String, String)> = accounts::table
            .filter(accounts::id.eq_any(chunk))
            .select((accounts::id, accounts::name))
            .load(conn)
            .into_core()?;
        account_names.extend(found);
    }

    let mut category_info: HashMap<String, (String, String)> = HashMap::new();
    for chunk in chunk_for_sqlite(&category_ids) {
        let found: Vec<(String, String, String)> = categories::table
            .filter(categories::id.eq_any(chunk))
            .select((categories::id, categories::name, categories::color))
            .load(conn)
            .into_core()?;
        category_info.extend(found.into_iter().map(|(id, name, color)| (id, (name, color))));
    }

    let mut tags = load_tag_refs(conn, &transaction_ids)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let account_name = account_names.get(&row.account_id).cloned().unwrap_or_default();
            let category = row
                .category_id
                .as_ref()
                .and_then(|id| category_info.get(id))
                .cloned();
            let tags = tags.remove(&row.id).unwrap_or_default();
            TransactionWithDetails {
                transaction: row.into(),
                account_name,
                category_name: category.as_ref().map(|(name, _)| name.clone()),
                category_color: category.map(|(_, color)| color),
                tags,
            }
        })
        .collect())
}

fn load_row(
    conn: &mut SqliteConnection,
    user_id: &str,
    transaction_id: &str,
) -> Result<TransactionDB> {
    transactions::table
        .filter(transactions::id.eq(transaction_id))
        .filter(transactions::user_id.eq(user_id))
        .select(TransactionDB::as_select())
        .first(conn)
        .or_not_found("Transaction")
}

fn ensure_category(conn: &mut SqliteConnection, user_id: &str, category_id: &str) -> Result<()> {
    categories::table
        .filter(categories::id.eq(category_id))
        .filter(categories::user_id.eq(user_id))
        .select(categories::id)
        .first::<String>(conn)
        .or_not_found("Category")
        .map(|_| ())
}

/// Inserts a transaction and applies its balance effect on the caller's connection.
pub(crate) fn insert_transaction(
    conn: &mut SqliteConnection,
    user_id: &str,
    new_transaction: NewTransaction,
) -> Result<TransactionDB> {
    let row = TransactionDB::from_new(user_id, new_transaction);
    load_account(conn, user_id, &row.account_id)?;
    if let Some(category_id) = &row.category_id {
        ensure_category(conn, user_id, category_id)?;
    }

    let saved = diesel::insert_into(transactions::table)
        .values(&row)
        .returning(TransactionDB::as_returning())
        .get_result(conn)
        .into_core()?;
    apply_balance_delta(conn, user_id, &saved.account_id, saved.balance_effect())?;
    Ok(saved)
}

/// Reverses the row's balance effect and deletes it.
fn remove_row(conn: &mut SqliteConnection, user_id: &str, row: &TransactionDB) -> Result<usize> {
    apply_balance_delta(conn, user_id, &row.account_id, -row.balance_effect())?;
    diesel::delete(transactions::table.find(&row.id))
        .execute(conn)
        .into_core()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn search(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<(Vec<TransactionWithDetails>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = filtered(user_id, filter)
            .count()
            .get_result(&mut conn)
            .into_core()?;

        let rows = filtered(user_id, filter)
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .limit(filter.page_size)
            .offset(filter.offset())
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;

        Ok((with_details(&mut conn, rows)?, total))
    }

    fn get_by_id(&self, user_id: &str, transaction_id: &str) -> Result<TransactionWithDetails> {
        let mut conn = get_connection(&self.pool)?;
        let row = load_row(&mut conn, user_id, transaction_id)?;
        with_details(&mut conn, vec![row])?
            .pop()
            .ok_or_else(|| pocketpilot_core::Error::not_found("Transaction"))
    }

    fn list_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWithDetails>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::date.between(start, end))
            .order((transactions::date.asc(), transactions::created_at.asc()))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        with_details(&mut conn, rows)
    }

    fn list_recent(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::transaction_type.eq(transaction_type.as_str()))
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .limit(limit)
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn create(&self, user_id: &str, new_transaction: NewTransaction) -> Result<Transaction> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Transaction> {
                insert_transaction(conn, &user_id, new_transaction).map(Transaction::from)
            })
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Transaction> {
                let mut row = load_row(conn, &user_id, &transaction_id)?;
                apply_balance_delta(conn, &user_id, &row.account_id, -row.balance_effect())?;

                if let Some(account_id) = update.account_id {
                    load_account(conn, &user_id, &account_id)?;
                    row.account_id = account_id;
                }
                // Empty strings clear the optional text fields.
                if let Some(category_id) = update.category_id {
                    row.category_id = non_empty(category_id);
                    if let Some(category_id) = &row.category_id {
                        ensure_category(conn, &user_id, category_id)?;
                    }
                }
                if let Some(amount) = update.amount {
                    row.amount = decimal_to_db(amount);
                }
                if let Some(transaction_type) = update.transaction_type {
                    row.transaction_type = transaction_type.as_str().to_string();
                }
                if let Some(description) = update.description {
                    row.description = description.trim().to_string();
                }
                if let Some(merchant) = update.merchant {
                    row.merchant = non_empty(merchant);
                }
                if let Some(date) = update.date {
                    row.date = date;
                }
                if let Some(notes) = update.notes {
                    row.notes = non_empty(notes);
                }
                row.updated_at = now();

                apply_balance_delta(conn, &user_id, &row.account_id, row.balance_effect())?;
                diesel::update(transactions::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                let row = transactions::table
                    .filter(transactions::id.eq(&transaction_id))
                    .filter(transactions::user_id.eq(&user_id))
                    .select(TransactionDB::as_select())
                    .first(conn)
                    .optional()
                    .into_core()?;
                match row {
                    Some(row) => remove_row(conn, &user_id, &row),
                    None => Ok(0),
                }
            })
            .await
    }

    async fn bulk_delete(&self, user_id: &str, transaction_ids: Vec<String>) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&transaction_ids) {
                    let rows = transactions::table
                        .filter(transactions::user_id.eq(&user_id))
                        .filter(transactions::id.eq_any(chunk))
                        .select(TransactionDB::as_select())
                        .load(conn)
                        .into_core()?;
                    for row in &rows {
                        deleted += remove_row(conn, &user_id, row)?;
                    }
                }
                debug!("Removed {} of {} requested transactions", deleted, transaction_ids.len());
                Ok(deleted)
            })
            .await
    }
}
