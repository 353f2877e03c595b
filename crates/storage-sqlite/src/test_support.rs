//! Temp-file database used by the repository tests.

use std::sync::Arc;

use diesel::prelude::*;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::{accounts, categories, users};
use crate::utils::now;

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.db");
    let pool = create_pool(&path.to_string_lossy()).expect("pool");
    run_migrations(&pool).expect("migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

impl TestDb {
    pub fn insert_user(&self, id: &str) {
        let mut conn = get_connection(&self.pool).unwrap();
        diesel::insert_into(users::table)
            .values((
                users::id.eq(id),
                users::email.eq(format!("{}@example.com", id)),
                users::password_hash.eq("hash"),
                users::created_at.eq(now()),
                users::updated_at.eq(now()),
            ))
            .execute(&mut conn)
            .unwrap();
    }

    pub fn insert_account(&self, user_id: &str, id: &str, balance: &str) {
        let mut conn = get_connection(&self.pool).unwrap();
        diesel::insert_into(accounts::table)
            .values((
                accounts::id.eq(id),
                accounts::user_id.eq(user_id),
                accounts::name.eq(format!("Account {}", id)),
                accounts::account_type.eq("checking"),
                accounts::balance.eq(balance),
                accounts::currency.eq("USD"),
                accounts::is_archived.eq(false),
                accounts::created_at.eq(now()),
                accounts::updated_at.eq(now()),
            ))
            .execute(&mut conn)
            .unwrap();
    }

    pub fn insert_category(&self, user_id: &str, id: &str, name: &str, category_type: &str) {
        let mut conn = get_connection(&self.pool).unwrap();
        diesel::insert_into(categories::table)
            .values((
                categories::id.eq(id),
                categories::user_id.eq(user_id),
                categories::name.eq(name),
                categories::category_type.eq(category_type),
                categories::color.eq("#64748b"),
                categories::created_at.eq(now()),
            ))
            .execute(&mut conn)
            .unwrap();
    }

    pub fn account_balance(&self, account_id: &str) -> String {
        let mut conn = get_connection(&self.pool).unwrap();
        accounts::table
            .find(account_id)
            .select(accounts::balance)
            .first(&mut conn)
            .unwrap()
    }
}
