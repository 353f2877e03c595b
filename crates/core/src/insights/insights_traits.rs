use chrono::NaiveDate;

use super::insights_model::{Forecast, PaydayPrediction, PaymentSchedule};
use crate::errors::Result;

pub trait InsightsServiceTrait: Send + Sync {
    fn get_payday_pattern(&self, user_id: &str, today: NaiveDate) -> Result<Vec<PaydayPrediction>>;
    fn get_payment_schedule(&self, user_id: &str, today: NaiveDate) -> Result<PaymentSchedule>;
    fn get_forecast(&self, user_id: &str, today: NaiveDate) -> Result<Forecast>;
}
