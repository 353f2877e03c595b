//! Insights module - payday prediction, bill payment timing and month-end forecasts.

mod forecast;
mod insights_model;
mod insights_service;
mod insights_traits;
mod payday;
mod payment_schedule;

#[cfg(test)]
mod insights_service_tests;

pub use forecast::forecast;
pub use insights_model::{
    Forecast, PaydayPrediction, PaymentAction, PaymentSchedule, PaymentSuggestion,
};
pub use insights_service::InsightsService;
pub use insights_traits::InsightsServiceTrait;
pub use payday::detect_payday_pattern;
pub use payment_schedule::optimal_payment_schedule;
