use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Fails with a conflict when the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User>;
    fn get_by_email(&self, email: &str) -> Result<Option<User>>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
}
