use crate::categories::{Category, CategoryType};
use crate::errors::{Error, ValidationError};
use crate::reports::{Report, ReportRequest, ReportService, ReportServiceTrait, ReportType};
use crate::test_support::{d, txn, InMemoryCategories, InMemoryTransactions};
use crate::transactions::{TransactionType, TransactionWithDetails};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn expense(date: NaiveDate, amount: Decimal, category: &str, merchant: &str) -> TransactionWithDetails {
    txn(date, amount, TransactionType::Expense, Some(category), Some(merchant))
}

fn income(date: NaiveDate, amount: Decimal) -> TransactionWithDetails {
    txn(date, amount, TransactionType::Income, Some("salary"), Some("Acme"))
}

fn service(rows: Vec<TransactionWithDetails>) -> ReportService {
    let categories = InMemoryCategories::with_names(&[
        ("Dining", CategoryType::Expense),
        ("Healthcare", CategoryType::Expense),
        ("Groceries", CategoryType::Expense),
        ("Salary", CategoryType::Income),
    ]);
    categories.rows.lock().unwrap().push(Category {
        id: "coffee".to_string(),
        user_id: "u1".to_string(),
        name: "Coffee".to_string(),
        category_type: CategoryType::Expense,
        color: "#000000".to_string(),
        icon: None,
        parent_id: Some("dining".to_string()),
        created_at: NaiveDateTime::default(),
    });
    ReportService::new(
        Arc::new(InMemoryTransactions::with(rows)),
        Arc::new(categories),
    )
}

fn range(report_type: ReportType, start: NaiveDate, end: NaiveDate) -> ReportRequest {
    ReportRequest {
        start_date: Some(start),
        end_date: Some(end),
        ..ReportRequest::of(report_type)
    }
}

#[test]
fn test_monthly_report_compares_with_previous_month() {
    let rows = vec![
        expense(d(2024, 2, 10), dec!(400), "groceries", "Trader Joe's"),
        income(d(2024, 3, 1), dec!(3000)),
        expense(d(2024, 3, 4), dec!(300), "groceries", "Trader Joe's"),
        expense(d(2024, 3, 9), dec!(200), "dining", "Nopa"),
        expense(d(2024, 4, 2), dec!(999), "dining", "Nopa"),
    ];
    let report = service(rows).monthly_report("u1", 2024, 3).unwrap();

    assert_eq!(report.total_income, dec!(3000));
    assert_eq!(report.total_expenses, dec!(500));
    assert_eq!(report.net, dec!(2500));
    assert_eq!(report.savings_rate, dec!(83.33));
    assert_eq!(report.transaction_count, 3);
    assert_eq!(report.categories[0].category_name, "groceries");
    assert_eq!(report.categories[0].percent, dec!(60));
    assert_eq!(report.previous_expenses, dec!(400));
    assert_eq!(report.expense_change_percent, Some(dec!(25)));
    assert_eq!(report.top_merchants[0].merchant, "Trader Joe's");
}

#[test]
fn test_monthly_report_rejects_bad_month() {
    assert!(matches!(
        service(vec![]).monthly_report("u1", 2024, 13),
        Err(Error::Validation(_))
    ));
}

fn year_request(report_type: ReportType, year: i32) -> ReportRequest {
    ReportRequest {
        year: Some(year),
        ..ReportRequest::of(report_type)
    }
}

fn assert_year_field_error(result: crate::errors::Result<Report>) {
    match result {
        Err(Error::Validation(ValidationError::Fields(fields))) => {
            assert!(fields.get("year").is_some())
        }
        other => panic!("expected a year validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_reports_reject_years_outside_supported_range() {
    // The epoch row must never be picked up by an unrepresentable year window
    let service = service(vec![income(d(1970, 1, 1), dec!(5))]);

    assert_year_field_error(service.generate("u1", year_request(ReportType::Tax, 999_999)));
    assert_year_field_error(service.generate("u1", year_request(ReportType::YearOverYear, i32::MIN)));
    assert_year_field_error(service.generate("u1", year_request(ReportType::YearOverYear, 1899)));
    assert!(matches!(
        service.monthly_report("u1", 10_000, 1),
        Err(Error::Validation(_))
    ));

    let Report::Tax(report) = service
        .generate("u1", year_request(ReportType::Tax, 1970))
        .unwrap()
    else {
        panic!("expected a tax report");
    };
    assert_eq!(report.year, 1970);
}

#[test]
fn test_category_report_flags_anomalies_and_includes_subcategories() {
    let mut rows: Vec<_> = (1..=5)
        .map(|day| expense(d(2024, 5, day), dec!(10), "dining", "Cafe"))
        .collect();
    rows.push(expense(d(2024, 5, 12), dec!(100), "coffee", "Fancy Roaster"));
    rows.push(expense(d(2024, 5, 13), dec!(500), "groceries", "Costco"));

    let request = ReportRequest {
        category_id: Some("dining".to_string()),
        ..range(ReportType::Category, d(2024, 5, 1), d(2024, 5, 31))
    };
    let Report::Category(report) = service(rows).generate("u1", request).unwrap() else {
        panic!("expected a category report");
    };

    assert_eq!(report.category_name, "Dining");
    assert_eq!(report.count, 6);
    assert_eq!(report.total, dec!(150));
    assert_eq!(report.mean, dec!(25));
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.anomalies[0].amount, dec!(100));
    assert_eq!(report.monthly.len(), 1);
}

#[test]
fn test_unknown_category_is_not_found() {
    let request = ReportRequest {
        category_id: Some("nope".to_string()),
        ..range(ReportType::Category, d(2024, 5, 1), d(2024, 5, 31))
    };
    assert!(service(vec![]).generate("u1", request).unwrap_err().is_not_found());
}

#[test]
fn test_year_over_year() {
    let rows = vec![
        expense(d(2023, 1, 15), dec!(100), "dining", "Nopa"),
        expense(d(2024, 1, 15), dec!(150), "dining", "Nopa"),
        expense(d(2024, 7, 15), dec!(50), "dining", "Nopa"),
    ];
    let request = ReportRequest {
        year: Some(2024),
        ..ReportRequest::of(ReportType::YearOverYear)
    };
    let Report::YearOverYear(report) = service(rows).generate("u1", request).unwrap() else {
        panic!("expected a year-over-year report");
    };
    assert_eq!(report.current_expenses, dec!(200));
    assert_eq!(report.previous_expenses, dec!(100));
    assert_eq!(report.expense_change_percent, Some(dec!(100)));
    assert_eq!(report.months.len(), 12);
    assert_eq!(report.months[0].expense_change_percent, Some(dec!(50)));
    assert_eq!(report.months[6].expense_change_percent, None);
}

#[test]
fn test_tax_report_keeps_deductible_categories() {
    let rows = vec![
        expense(d(2024, 2, 1), dec!(250), "healthcare", "Clinic"),
        expense(d(2024, 3, 1), dec!(80), "dining", "Nopa"),
        income(d(2024, 1, 31), dec!(5000)),
    ];
    let request = ReportRequest {
        year: Some(2024),
        ..ReportRequest::of(ReportType::Tax)
    };
    let Report::Tax(report) = service(rows).generate("u1", request).unwrap() else {
        panic!("expected a tax report");
    };
    assert_eq!(report.deductible_total, dec!(250));
    assert_eq!(report.deductible_count, 1);
    assert_eq!(report.total_income, dec!(5000));
    assert_eq!(report.categories.len(), 1);
}

#[test]
fn test_savings_rate_by_month() {
    let rows = vec![
        income(d(2024, 1, 1), dec!(1000)),
        expense(d(2024, 1, 5), dec!(800), "groceries", "Costco"),
        income(d(2024, 2, 1), dec!(1000)),
        expense(d(2024, 2, 5), dec!(400), "groceries", "Costco"),
    ];
    let Report::SavingsRate(report) = service(rows)
        .generate("u1", range(ReportType::SavingsRate, d(2024, 1, 1), d(2024, 2, 29)))
        .unwrap()
    else {
        panic!("expected a savings-rate report");
    };
    assert_eq!(report.months.len(), 2);
    assert_eq!(report.months[0].savings_rate, dec!(20));
    assert_eq!(report.months[1].savings_rate, dec!(60));
    assert_eq!(report.savings_rate, dec!(40));
    assert_eq!(report.average_monthly_rate, dec!(40));
}

#[test]
fn test_merchant_and_date_range_reports() {
    let rows = vec![
        expense(d(2024, 4, 1), dec!(30), "dining", "Nopa"),
        expense(d(2024, 4, 2), dec!(20), "dining", "Nopa"),
        expense(d(2024, 4, 2), dec!(60), "groceries", "Costco"),
        income(d(2024, 4, 3), dec!(900)),
    ];
    let svc = service(rows);

    let request = ReportRequest {
        limit: Some(1),
        ..range(ReportType::Merchant, d(2024, 4, 1), d(2024, 4, 30))
    };
    let Report::Merchant(merchants) = svc.generate("u1", request).unwrap() else {
        panic!("expected a merchant report");
    };
    assert_eq!(merchants.total, dec!(110));
    assert_eq!(merchants.merchants.len(), 1);
    assert_eq!(merchants.merchants[0].merchant, "Costco");

    let Report::DateRange(summary) = svc
        .generate("u1", range(ReportType::DateRange, d(2024, 4, 1), d(2024, 4, 30)))
        .unwrap()
    else {
        panic!("expected a date-range report");
    };
    assert_eq!(summary.net, dec!(790));
    assert_eq!(summary.daily.len(), 3);
    assert_eq!(summary.daily[1].expenses, dec!(80));
}

#[test]
fn test_missing_parameters_are_field_errors() {
    let err = service(vec![])
        .generate("u1", ReportRequest::of(ReportType::DateRange))
        .unwrap_err();
    let Error::Validation(ValidationError::Fields(fields)) = err else {
        panic!("expected field errors");
    };
    assert!(fields.get("startDate").is_some());
    assert!(fields.get("endDate").is_some());

    let too_long = range(ReportType::DateRange, d(2020, 1, 1), d(2024, 1, 1));
    assert!(service(vec![]).generate("u1", too_long).is_err());
}

#[test]
fn test_report_serializes_with_type_tag() {
    let report = service(vec![]).monthly_report("u1", 2024, 1).unwrap();
    let json = serde_json::to_value(Report::Monthly(report)).unwrap();
    assert_eq!(json["type"], "monthly");
    assert_eq!(json["data"]["month"], 1);
}
