use super::reports_model::{MonthlyReport, Report, ReportRequest};
use crate::errors::Result;

pub trait ReportServiceTrait: Send + Sync {
    fn generate(&self, user_id: &str, request: ReportRequest) -> Result<Report>;
    fn monthly_report(&self, user_id: &str, year: i32, month: u32) -> Result<MonthlyReport>;
}
