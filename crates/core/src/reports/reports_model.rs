use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category-name fragments treated as potentially tax deductible.
pub const TAX_DEDUCTIBLE_KEYWORDS: &[&str] = &[
    "health",
    "medical",
    "education",
    "tuition",
    "donation",
    "charity",
    "business",
    "office",
    "childcare",
    "insurance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    DateRange,
    YearOverYear,
    Merchant,
    Category,
    Monthly,
    Tax,
    SavingsRate,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::DateRange => "date-range",
            ReportType::YearOverYear => "year-over-year",
            ReportType::Merchant => "merchant",
            ReportType::Category => "category",
            ReportType::Monthly => "monthly",
            ReportType::Tax => "tax",
            ReportType::SavingsRate => "savings-rate",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "date-range" => Ok(ReportType::DateRange),
            "year-over-year" => Ok(ReportType::YearOverYear),
            "merchant" => Ok(ReportType::Merchant),
            "category" => Ok(ReportType::Category),
            "monthly" => Ok(ReportType::Monthly),
            "tax" => Ok(ReportType::Tax),
            "savings-rate" => Ok(ReportType::SavingsRate),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

/// Query accepted by the report endpoint. Which fields are required depends on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category_id: Option<String>,
    pub limit: Option<usize>,
}

impl ReportRequest {
    pub fn of(report_type: ReportType) -> Self {
        Self {
            report_type,
            start_date: None,
            end_date: None,
            year: None,
            month: None,
            category_id: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: Option<String>,
    pub category_name: String,
    pub color: Option<String>,
    pub total: Decimal,
    pub count: usize,
    /// Share of all expenses in the window.
    pub percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub last_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    pub month: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub merchant: Option<String>,
    pub amount: Decimal,
    /// Standard deviations above the category mean.
    pub deviation: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub transaction_count: usize,
    pub categories: Vec<CategoryTotal>,
    pub daily: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub month: u32,
    pub current_income: Decimal,
    pub current_expenses: Decimal,
    pub previous_income: Decimal,
    pub previous_expenses: Decimal,
    pub expense_change_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearOverYearReport {
    pub year: i32,
    pub previous_year: i32,
    pub current_income: Decimal,
    pub current_expenses: Decimal,
    pub previous_income: Decimal,
    pub previous_expenses: Decimal,
    pub expense_change_percent: Option<Decimal>,
    pub months: Vec<MonthComparison>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerchantReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: Decimal,
    pub merchants: Vec<MerchantTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub category_id: String,
    pub category_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
    pub mean: Decimal,
    pub std_dev: Decimal,
    /// Amounts above this are reported as anomalies.
    pub anomaly_threshold: Decimal,
    pub monthly: Vec<MonthTotal>,
    pub top_merchants: Vec<MerchantTotal>,
    pub anomalies: Vec<Anomaly>,
}

/// One calendar month of income and spending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub transaction_count: usize,
    pub categories: Vec<CategoryTotal>,
    pub top_merchants: Vec<MerchantTotal>,
    pub previous_expenses: Decimal,
    /// `None` when nothing was spent the month before.
    pub expense_change_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    pub year: i32,
    pub total_income: Decimal,
    pub deductible_total: Decimal,
    pub deductible_count: usize,
    pub categories: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsMonth {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub saved: Decimal,
    pub savings_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRateReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub savings_rate: Decimal,
    pub average_monthly_rate: Decimal,
    pub months: Vec<SavingsMonth>,
}

/// A generated report, tagged with its type when serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Report {
    DateRange(DateRangeReport),
    YearOverYear(YearOverYearReport),
    Merchant(MerchantReport),
    Category(CategoryReport),
    Monthly(MonthlyReport),
    Tax(TaxReport),
    SavingsRate(SavingsRateReport),
}
