use async_trait::async_trait;
use std::sync::Arc;

use super::tags_model::{NewTag, Tag, TagUpdate};
use super::tags_traits::{TagRepositoryTrait, TagServiceTrait};
use crate::errors::{Error, Result};

pub struct TagService {
    repository: Arc<dyn TagRepositoryTrait>,
}

impl TagService {
    pub fn new(repository: Arc<dyn TagRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TagServiceTrait for TagService {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        self.repository.list(user_id)
    }

    async fn create_tag(&self, user_id: &str, mut new_tag: NewTag) -> Result<Tag> {
        new_tag.validate()?;
        new_tag.name = new_tag.name.trim().to_string();
        self.repository.create(user_id, new_tag).await
    }

    async fn update_tag(&self, user_id: &str, tag_id: &str, mut update: TagUpdate) -> Result<Tag> {
        update.validate()?;
        update.name = update.name.map(|n| n.trim().to_string());
        self.repository.update(user_id, tag_id, update).await
    }

    async fn delete_tag(&self, user_id: &str, tag_id: &str) -> Result<()> {
        match self.repository.delete(user_id, tag_id).await? {
            0 => Err(Error::not_found("Tag")),
            _ => Ok(()),
        }
    }

    async fn attach_tags(
        &self,
        user_id: &str,
        transaction_id: &str,
        mut tag_ids: Vec<String>,
    ) -> Result<usize> {
        tag_ids.sort();
        tag_ids.dedup();
        if tag_ids.is_empty() {
            return Ok(0);
        }
        self.repository.attach(user_id, transaction_id, tag_ids).await
    }

    async fn set_tags(
        &self,
        user_id: &str,
        transaction_id: &str,
        tag_ids: Vec<String>,
    ) -> Result<usize> {
        self.repository.detach_all(user_id, transaction_id).await?;
        self.attach_tags(user_id, transaction_id, tag_ids).await
    }
}
