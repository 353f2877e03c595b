//! Limits that keep tool outputs small enough for the model's context.

/// Maximum number of spending categories returned by the summary tool.
pub const MAX_CATEGORIES: usize = 20;

/// Default look-ahead window for upcoming bills.
pub const DEFAULT_BILL_DAYS: i64 = 30;

/// Longest look-ahead accepted for upcoming bills.
pub const MAX_BILL_DAYS: i64 = 365;

/// Maximum number of bills returned per tool call.
pub const MAX_BILLS: usize = 50;

/// Maximum number of goals returned per tool call.
pub const MAX_GOALS: usize = 50;
