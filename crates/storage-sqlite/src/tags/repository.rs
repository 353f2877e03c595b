use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;

use pocketpilot_core::tags::{NewTag, Tag, TagRepositoryTrait, TagUpdate};
use pocketpilot_core::transactions::TagRef;
use pocketpilot_core::Result;

use super::model::{TagDB, TransactionTagDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{tags, transaction_tags, transactions};
use crate::utils::chunk_for_sqlite;

pub struct TagRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TagRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_tag(conn: &mut SqliteConnection, user_id: &str, tag_id: &str) -> Result<TagDB> {
    tags::table
        .filter(tags::id.eq(tag_id))
        .filter(tags::user_id.eq(user_id))
        .select(TagDB::as_select())
        .first(conn)
        .or_not_found("Tag")
}

fn ensure_transaction(conn: &mut SqliteConnection, user_id: &str, transaction_id: &str) -> Result<()> {
    transactions::table
        .filter(transactions::id.eq(transaction_id))
        .filter(transactions::user_id.eq(user_id))
        .select(transactions::id)
        .first::<String>(conn)
        .or_not_found("Transaction")
        .map(|_| ())
}

/// Tags for each of `transaction_ids`, keyed by transaction id and sorted by name.
pub(crate) fn load_tag_refs(
    conn: &mut SqliteConnection,
    transaction_ids: &[String],
) -> Result<HashMap<String, Vec<TagRef>>> {
    let mut by_transaction: HashMap<String, Vec<TagRef>> = HashMap::new();
    for chunk in chunk_for_sqlite(transaction_ids) {
        let rows: Vec<(String, TagDB)> = transaction_tags::table
            .inner_join(tags::table)
            .filter(transaction_tags::transaction_id.eq_any(chunk))
            .order(tags::name.asc())
            .select((transaction_tags::transaction_id, TagDB::as_select()))
            .load(conn)
            .into_core()?;
        for (transaction_id, tag) in rows {
            by_transaction
                .entry(transaction_id)
                .or_default()
                .push(tag.into());
        }
    }
    Ok(by_transaction)
}

#[async_trait]
impl TagRepositoryTrait for TagRepository {
    fn list(&self, user_id: &str) -> Result<Vec<Tag>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tags::table
            .filter(tags::user_id.eq(user_id))
            .order((tags::usage_count.desc(), tags::name.asc()))
            .select(TagDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn create(&self, user_id: &str, new_tag: NewTag) -> Result<Tag> {
        let row = TagDB::from_new(user_id, new_tag);
        self.writer
            .exec(move |conn| -> Result<Tag> {
                diesel::insert_into(tags::table)
                    .values(&row)
                    .returning(TagDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Tag::from)
            })
            .await
    }

    async fn update(&self, user_id: &str, tag_id: &str, update: TagUpdate) -> Result<Tag> {
        let user_id = user_id.to_string();
        let tag_id = tag_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Tag> {
                let mut row = load_tag(conn, &user_id, &tag_id)?;
                if let Some(name) = update.name {
                    row.name = name;
                }
                if update.color.is_some() {
                    row.color = update.color;
                }
                diesel::update(tags::table.find(&row.id))
                    .set((tags::name.eq(&row.name), tags::color.eq(&row.color)))
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, user_id: &str, tag_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let tag_id = tag_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(
                    tags::table
                        .filter(tags::id.eq(&tag_id))
                        .filter(tags::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn attach(
        &self,
        user_id: &str,
        transaction_id: &str,
        tag_ids: Vec<String>,
    ) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                ensure_transaction(conn, &user_id, &transaction_id)?;

                let owned: Vec<String> = tags::table
                    .filter(tags::user_id.eq(&user_id))
                    .filter(tags::id.eq_any(&tag_ids))
                    .select(tags::id)
                    .load(conn)
                    .into_core()?;

                let mut linked = 0;
                for tag_id in owned {
                    let inserted = diesel::insert_or_ignore_into(transaction_tags::table)
                        .values(&TransactionTagDB {
                            transaction_id: transaction_id.clone(),
                            tag_id: tag_id.clone(),
                        })
                        .execute(conn)
                        .into_core()?;
                    if inserted > 0 {
                        diesel::update(tags::table.find(&tag_id))
                            .set(tags::usage_count.eq(tags::usage_count + 1))
                            .execute(conn)
                            .into_core()?;
                        linked += inserted;
                    }
                }
                Ok(linked)
            })
            .await
    }

    async fn detach_all(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                ensure_transaction(conn, &user_id, &transaction_id)?;

                let linked: Vec<String> = transaction_tags::table
                    .filter(transaction_tags::transaction_id.eq(&transaction_id))
                    .select(transaction_tags::tag_id)
                    .load(conn)
                    .into_core()?;
                diesel::update(
                    tags::table
                        .filter(tags::id.eq_any(&linked))
                        .filter(tags::usage_count.gt(0)),
                )
                .set(tags::usage_count.eq(tags::usage_count - 1))
                .execute(conn)
                .into_core()?;
                diesel::delete(
                    transaction_tags::table
                        .filter(transaction_tags::transaction_id.eq(&transaction_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
