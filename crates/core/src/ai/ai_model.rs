use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};

/// A remembered key/value fact about the user, injected into the chat preamble.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiMemory {
    pub id: String,
    pub user_id: String,
    pub key: String,
    pub value: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUpsert {
    pub key: String,
    pub value: String,
}

impl MemoryUpsert {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(self.key.trim().is_empty(), "key", "Key is required");
        errors.check(self.key.len() > 100, "key", "Key is too long");
        errors.check(self.value.trim().is_empty(), "value", "Value is required");
        errors.check(self.value.len() > 1000, "value", "Value is too long");
        errors.into_result()
    }
}

/// Normalised merchant pattern mapped to a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiLearningRule {
    pub id: String,
    pub user_id: String,
    pub pattern: String,
    pub category_id: String,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub id: String,
    pub user_id: String,
    /// `YYYY-MM`
    pub period: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestion {
    pub category_id: String,
    pub category_name: String,
    pub matched_pattern: String,
}
