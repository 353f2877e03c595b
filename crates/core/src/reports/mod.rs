//! Reports module - stateless aggregations over a bounded window of transactions.

mod aggregation;
mod reports_model;
mod reports_service;
mod reports_traits;

#[cfg(test)]
mod reports_service_tests;

pub use aggregation::{category_totals, find_anomalies, merchant_totals, Totals};
pub use reports_model::{
    Anomaly, CategoryReport, CategoryTotal, DailyTotal, DateRangeReport, MerchantReport,
    MerchantTotal, MonthComparison, MonthTotal, MonthlyReport, Report, ReportRequest, ReportType,
    SavingsMonth, SavingsRateReport, TaxReport, YearOverYearReport, TAX_DEDUCTIBLE_KEYWORDS,
};
pub use reports_service::ReportService;
pub use reports_traits::ReportServiceTrait;
