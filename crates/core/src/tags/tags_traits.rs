use async_trait::async_trait;

use super::tags_model::{NewTag, Tag, TagUpdate};
use crate::errors::Result;

#[async_trait]
pub trait TagRepositoryTrait: Send + Sync {
    /// Tags ordered by `usage_count` descending, then name.
    fn list(&self, user_id: &str) -> Result<Vec<Tag>>;
    async fn create(&self, user_id: &str, new_tag: NewTag) -> Result<Tag>;
    async fn update(&self, user_id: &str, tag_id: &str, update: TagUpdate) -> Result<Tag>;
    async fn delete(&self, user_id: &str, tag_id: &str) -> Result<usize>;
    /// Links the user's tags to a transaction and bumps their usage counts.
    /// Ids not owned by the user are ignored. Returns the number of links created.
    async fn attach(&self, user_id: &str, transaction_id: &str, tag_ids: Vec<String>)
        -> Result<usize>;
    /// Removes every tag link from a transaction.
    async fn detach_all(&self, user_id: &str, transaction_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait TagServiceTrait: Send + Sync {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>>;
    async fn create_tag(&self, user_id: &str, new_tag: NewTag) -> Result<Tag>;
    async fn update_tag(&self, user_id: &str, tag_id: &str, update: TagUpdate) -> Result<Tag>;
    async fn delete_tag(&self, user_id: &str, tag_id: &str) -> Result<()>;
    async fn attach_tags(
        &self,
        user_id: &str,
        transaction_id: &str,
        tag_ids: Vec<String>,
    ) -> Result<usize>;
    /// Replaces the transaction's tags with `tag_ids`.
    async fn set_tags(
        &self,
        user_id: &str,
        transaction_id: &str,
        tag_ids: Vec<String>,
    ) -> Result<usize>;
}
