use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expected income on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaydayPrediction {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub expected_amount: Decimal,
    /// Past income transactions supporting this prediction.
    pub occurrences: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentAction {
    PayNow,
    NoAction,
    Delay,
    Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuggestion {
    pub bill_id: String,
    pub bill_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub action: PaymentAction,
    pub suggested_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSchedule {
    pub available_balance: Decimal,
    pub total_due: Decimal,
    pub suggestions: Vec<PaymentSuggestion>,
}

/// Month-to-date figures and a linear projection to month end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub month: String,
    pub days_elapsed: u32,
    pub days_in_month: u32,
    pub spent_so_far: Decimal,
    pub income_so_far: Decimal,
    pub daily_average: Decimal,
    pub projected_spending: Decimal,
    pub remaining_bills: Decimal,
    pub projected_net: Decimal,
    pub total_budget: Decimal,
    /// Budget left after projected spending; `None` without budgets.
    pub budget_variance: Option<Decimal>,
}
