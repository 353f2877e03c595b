use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

impl NewTag {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.name.trim().is_empty(), "name", "Name is required");
        errors.check(self.name.len() > 30, "name", "Name is too long");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TagUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(name.trim().is_empty(), "name", "Name cannot be empty");
            errors.check(name.len() > 30, "name", "Name is too long");
        }
        errors.into_result()
    }
}
