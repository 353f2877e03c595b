use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use pocketpilot_core::users::{normalize_email, NewUser, User, UserRepositoryTrait};
use pocketpilot_core::{Error, Result};

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::users;
use crate::utils::{new_id, now};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let email = normalize_email(&new_user.email);
                let taken = users::table
                    .filter(users::email.eq(&email))
                    .count()
                    .get_result::<i64>(conn)
                    .into_core()?;
                if taken > 0 {
                    return Err(Error::ConstraintViolation(
                        "Email is already registered".to_string(),
                    ));
                }

                let timestamp = now();
                let row = UserDB {
                    id: new_id(),
                    email,
                    name: new_user.name,
                    password_hash: new_user.password_hash,
                    created_at: timestamp,
                    updated_at: timestamp,
                };
                let saved = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(saved.into())
            })
            .await
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .filter(users::email.eq(normalize_email(email)))
            .select(UserDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(User::from))
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first(&mut conn)
            .or_not_found("User")
            .map(User::from)
    }
}
