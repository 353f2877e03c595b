/// Decimal precision for money values shown to users
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Days before a due date at which a bill counts as "due soon"
pub const DUE_SOON_DAYS: i64 = 3;

/// Maximum number of income transactions inspected by payday detection
pub const PAYDAY_SAMPLE_LIMIT: usize = 50;

/// Balance left after a payment below which a payment is suggested to be delayed
pub const LOW_BALANCE_THRESHOLD: i64 = 500;

/// Maximum number of days a payment may be delayed for a low balance
pub const MAX_PAYMENT_DELAY_DAYS: i64 = 7;

/// Default budget alert threshold in percent
pub const DEFAULT_ALERT_THRESHOLD: i32 = 80;

/// Largest page size accepted by transaction search
pub const MAX_PAGE_SIZE: i64 = 200;

/// Default page size for transaction search
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Upper bound on occurrences generated for one recurring item in a single run
pub const MAX_RECURRING_CATCH_UP: usize = 366;

/// Days ahead covered by payment-schedule suggestions
pub const SCHEDULE_HORIZON_DAYS: i64 = 30;

/// Calendar years accepted from user input (report years, `YYYY-MM` keys)
pub const MIN_SUPPORTED_YEAR: i32 = 1900;
pub const MAX_SUPPORTED_YEAR: i32 = 9999;
