use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::errors::{FieldErrors, Result};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// A user about to be stored. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            !EMAIL_REGEX.is_match(&self.email),
            "email",
            "A valid email address is required",
        );
        errors.check(
            self.password_hash.is_empty(),
            "password",
            "Password is required",
        );
        if let Some(name) = &self.name {
            errors.check(name.chars().count() > 100, "name", "Name is too long");
        }
        errors.into_result()
    }
}

/// Emails are compared trimmed and lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
