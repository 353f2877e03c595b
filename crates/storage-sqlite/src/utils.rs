//! Helpers shared by the repositories: TEXT-encoded money, enum columns and
//! SQLite parameter limits.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// SQLite caps bound parameters per statement; `IN (...)` lists are split at this size.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Parses a money column, accepting float notation written by older rows.
/// Unparseable values are logged and read as zero.
pub fn parse_decimal(value: &str, field: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(d) => d,
        Err(decimal_err) => match f64::from_str(value).ok().and_then(Decimal::from_f64) {
            Some(d) => d,
            None => {
                log::error!(
                    "Failed to parse {} '{}' as decimal ({}); using zero",
                    field,
                    value,
                    decimal_err
                );
                Decimal::ZERO
            }
        },
    }
}

pub fn parse_optional_decimal(value: Option<&str>, field: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal(v, field))
}

/// Canonical TEXT form of a decimal column.
pub fn decimal_to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parses an enum column, falling back to the type's default for unknown values.
pub fn parse_enum<T>(value: &str, field: &str) -> T
where
    T: FromStr + Default,
    T::Err: Display,
{
    T::from_str(value).unwrap_or_else(|e| {
        log::warn!("Unknown {} '{}' in database: {}", field, value, e);
        T::default()
    })
}

diesel::define_sql_function! {
    /// SQLite `lower()`, for case-insensitive name matches.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern and wraps it in wildcards.
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
