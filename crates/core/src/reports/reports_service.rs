use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::aggregation::{
    category_totals, daily_totals, find_anomalies, merchant_totals, monthly_expense_totals, Totals,
};
use super::reports_model::{
    CategoryReport, DateRangeReport, MerchantReport, MonthComparison, MonthlyReport, Report,
    ReportRequest, ReportType, SavingsMonth, SavingsRateReport, TaxReport, YearOverYearReport,
    TAX_DEDUCTIBLE_KEYWORDS,
};
use super::reports_traits::ReportServiceTrait;
use crate::categories::CategoryServiceTrait;
use crate::errors::{Error, FieldErrors, Result, ValidationError};
use crate::transactions::{TransactionRepositoryTrait, TransactionType, TransactionWithDetails};
use crate::utils::money::{percent_of, round_money};
use crate::constants::{MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use crate::utils::time_utils::{add_months, is_supported_year, month_bounds, month_key, year_bounds};

/// Longest window a single report may cover.
const MAX_REPORT_RANGE_DAYS: i64 = 3 * 366;
const DEFAULT_MERCHANT_LIMIT: usize = 10;
const MAX_MERCHANT_LIMIT: usize = 100;
const MONTHLY_TOP_MERCHANTS: usize = 5;

pub struct ReportService {
    transactions: Arc<dyn TransactionRepositoryTrait>,
    categories: Arc<dyn CategoryServiceTrait>,
}

impl ReportService {
    pub fn new(
        transactions: Arc<dyn TransactionRepositoryTrait>,
        categories: Arc<dyn CategoryServiceTrait>,
    ) -> Self {
        Self {
            transactions,
            categories,
        }
    }

    fn load(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<TransactionWithDetails>> {
        let rows = self.transactions.list_between(user_id, start, end)?;
        debug!(
            "Report window {}..{} for {}: {} transactions",
            start,
            end,
            user_id,
            rows.len()
        );
        Ok(rows)
    }

    fn date_range(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<DateRangeReport> {
        let rows = self.load(user_id, start, end)?;
        let totals = Totals::of(&rows);
        Ok(DateRangeReport {
            start_date: start,
            end_date: end,
            total_income: totals.income,
            total_expenses: totals.expenses,
            net: totals.net(),
            transaction_count: totals.count,
            categories: category_totals(&rows),
            daily: daily_totals(&rows),
        })
    }

    fn year_over_year(&self, user_id: &str, year: i32) -> Result<YearOverYearReport> {
        let (start, _) = year_window(year.checked_sub(1).ok_or_else(year_error)?)?;
        let (_, end) = year_window(year)?;
        let rows = self.load(user_id, start, end)?;

        let slice = |y: i32, m: u32| {
            Totals::of(
                rows.iter()
                    .filter(move |r| r.transaction.date.year() == y && r.transaction.date.month() == m),
            )
        };
        let months: Vec<MonthComparison> = (1..=12)
            .map(|m| {
                let current = slice(year, m);
                let previous = slice(year - 1, m);
                MonthComparison {
                    month: m,
                    current_income: current.income,
                    current_expenses: current.expenses,
                    previous_income: previous.income,
                    previous_expenses: previous.expenses,
                    expense_change_percent: change_percent(current.expenses, previous.expenses),
                }
            })
            .collect();

        let current = Totals::of(rows.iter().filter(|r| r.transaction.date.year() == year));
        let previous = Totals::of(rows.iter().filter(|r| r.transaction.date.year() == year - 1));
        Ok(YearOverYearReport {
            year,
            previous_year: year - 1,
            current_income: current.income,
            current_expenses: current.expenses,
            previous_income: previous.income,
            previous_expenses: previous.expenses,
            expense_change_percent: change_percent(current.expenses, previous.expenses),
            months,
        })
    }

    fn merchant(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> Result<MerchantReport> {
        let rows = self.load(user_id, start, end)?;
        Ok(MerchantReport {
            start_date: start,
            end_date: end,
            total: Totals::of(&rows).expenses,
            merchants: merchant_totals(&rows, limit),
        })
    }

    fn category(
        &self,
        user_id: &str,
        category_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CategoryReport> {
        let category = self.categories.get_category(user_id, category_id)?;
        let mut ids: HashSet<String> = self
            .categories
            .list_categories(user_id, Some(category.category_type))?
            .into_iter()
            .filter(|c| c.parent_id.as_deref() == Some(category_id))
            .map(|c| c.id)
            .collect();
        ids.insert(category.id.clone());

        let rows: Vec<TransactionWithDetails> = self
            .load(user_id, start, end)?
            .into_iter()
            .filter(|r| {
                r.transaction.transaction_type == TransactionType::Expense
                    && r.transaction
                        .category_id
                        .as_ref()
                        .is_some_and(|id| ids.contains(id))
            })
            .collect();

        let (mean, std_dev, anomaly_threshold, anomalies) = find_anomalies(&rows);
        let totals = Totals::of(&rows);
        Ok(CategoryReport {
            category_id: category.id,
            category_name: category.name,
            start_date: start,
            end_date: end,
            total: totals.expenses,
            count: totals.count,
            mean,
            std_dev,
            anomaly_threshold,
            monthly: monthly_expense_totals(&rows),
            top_merchants: merchant_totals(&rows, DEFAULT_MERCHANT_LIMIT),
            anomalies,
        })
    }

    fn tax(&self, user_id: &str, year: i32) -> Result<TaxReport> {
        let (start, end) = year_window(year)?;
        let rows = self.load(user_id, start, end)?;
        let deductible: Vec<TransactionWithDetails> = rows
            .iter()
            .filter(|r| {
                r.transaction.transaction_type == TransactionType::Expense
                    && r.category_name.as_deref().is_some_and(is_deductible)
            })
            .cloned()
            .collect();
        let totals = Totals::of(&deductible);
        Ok(TaxReport {
            year,
            total_income: Totals::of(&rows).income,
            deductible_total: totals.expenses,
            deductible_count: totals.count,
            categories: category_totals(&deductible),
        })
    }

    fn savings_rate(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<SavingsRateReport> {
        let rows = self.load(user_id, start, end)?;
        let mut by_month: BTreeMap<String, Vec<&TransactionWithDetails>> = BTreeMap::new();
        for row in &rows {
            by_month
                .entry(month_key(row.transaction.date))
                .or_default()
                .push(row);
        }

        let months: Vec<SavingsMonth> = by_month
            .into_iter()
            .map(|(month, rows)| {
                let totals = Totals::of(rows);
                SavingsMonth {
                    month,
                    income: totals.income,
                    expenses: totals.expenses,
                    saved: totals.net(),
                    savings_rate: totals.savings_rate(),
                }
            })
            .collect();

        let average_monthly_rate = if months.is_empty() {
            Decimal::ZERO
        } else {
            round_money(
                months.iter().map(|m| m.savings_rate).sum::<Decimal>()
                    / Decimal::from(months.len()),
            )
        };
        let totals = Totals::of(&rows);
        Ok(SavingsRateReport {
            start_date: start,
            end_date: end,
            total_income: totals.income,
            total_expenses: totals.expenses,
            savings_rate: totals.savings_rate(),
            average_monthly_rate,
            months,
        })
    }
}

impl ReportServiceTrait for ReportService {
    fn generate(&self, user_id: &str, request: ReportRequest) -> Result<Report> {
        match request.report_type {
            ReportType::DateRange => {
                let (start, end) = required_range(&request)?;
                self.date_range(user_id, start, end).map(Report::DateRange)
            }
            ReportType::YearOverYear => {
                let year = required_year(&request)?;
                self.year_over_year(user_id, year).map(Report::YearOverYear)
            }
            ReportType::Merchant => {
                let (start, end) = required_range(&request)?;
                let limit = request
                    .limit
                    .unwrap_or(DEFAULT_MERCHANT_LIMIT)
                    .clamp(1, MAX_MERCHANT_LIMIT);
                self.merchant(user_id, start, end, limit).map(Report::Merchant)
            }
            ReportType::Category => {
                let category_id = request
                    .category_id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| missing("categoryId"))?;
                let (start, end) = required_range(&request)?;
                self.category(user_id, category_id, start, end)
                    .map(Report::Category)
            }
            ReportType::Monthly => {
                let year = required_year(&request)?;
                let month = request.month.ok_or_else(|| missing("month"))?;
                self.monthly_report(user_id, year, month).map(Report::Monthly)
            }
            ReportType::Tax => {
                let year = required_year(&request)?;
                self.tax(user_id, year).map(Report::Tax)
            }
            ReportType::SavingsRate => {
                let (start, end) = required_range(&request)?;
                self.savings_rate(user_id, start, end).map(Report::SavingsRate)
            }
        }
    }

    fn monthly_report(&self, user_id: &str, year: i32, month: u32) -> Result<MonthlyReport> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid("Month must be between 1 and 12"));
        }
        check_year(year)?;
        let (start, end) = month_bounds(year, month).ok_or_else(year_error)?;
        let previous_start = add_months(start, -1);
        let rows = self.load(user_id, previous_start, end)?;
        let (current, previous): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|r| r.transaction.date >= start);

        let totals = Totals::of(&current);
        let previous_expenses = Totals::of(&previous).expenses;
        Ok(MonthlyReport {
            year,
            month,
            total_income: totals.income,
            total_expenses: totals.expenses,
            net: totals.net(),
            savings_rate: totals.savings_rate(),
            transaction_count: totals.count,
            categories: category_totals(&current),
            top_merchants: merchant_totals(&current, MONTHLY_TOP_MERCHANTS),
            previous_expenses,
            expense_change_percent: change_percent(totals.expenses, previous_expenses),
        })
    }
}

fn is_deductible(category_name: &str) -> bool {
    let name = category_name.to_lowercase();
    TAX_DEDUCTIBLE_KEYWORDS.iter().any(|k| name.contains(k))
}

fn change_percent(current: Decimal, previous: Decimal) -> Option<Decimal> {
    (!previous.is_zero()).then(|| percent_of(current - previous, previous))
}

fn missing(field: &str) -> Error {
    let mut errors = FieldErrors::new();
    errors.add(field, "Required for this report type");
    Error::Validation(ValidationError::Fields(errors))
}

fn year_error() -> Error {
    let mut errors = FieldErrors::new();
    errors.add(
        "year",
        format!(
            "Year must be between {} and {}",
            MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
        ),
    );
    Error::Validation(ValidationError::Fields(errors))
}

fn check_year(year: i32) -> Result<()> {
    if is_supported_year(year) {
        Ok(())
    } else {
        Err(year_error())
    }
}

fn year_window(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    year_bounds(year).ok_or_else(year_error)
}

fn required_year(request: &ReportRequest) -> Result<i32> {
    let year = request.year.ok_or_else(|| missing("year"))?;
    check_year(year)?;
    Ok(year)
}

fn required_range(request: &ReportRequest) -> Result<(NaiveDate, NaiveDate)> {
    let mut errors = FieldErrors::new();
    errors.check(request.start_date.is_none(), "startDate", "Required for this report type");
    errors.check(request.end_date.is_none(), "endDate", "Required for this report type");
    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        errors.check(end < start, "endDate", "End date must be on or after the start date");
        errors.check(
            (end - start).num_days() > MAX_REPORT_RANGE_DAYS,
            "endDate",
            "Report range cannot exceed three years",
        );
        errors.into_result()?;
        return Ok((start, end));
    }
    errors.into_result()?;
    Err(Error::invalid("Start and end dates are required"))
}
