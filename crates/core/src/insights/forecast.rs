use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::insights_model::Forecast;
use crate::bills::bill_rules::occurrences_between;
use crate::bills::Bill;
use crate::budgets::{BudgetPeriod, BudgetWithCategory};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::money::round_money;
use crate::utils::time_utils::{days_in_month, month_bounds_of, month_key};

/// Projects month-end spending linearly from the daily average so far.
///
/// `transactions` should hold this month's entries up to `today`; anything outside
/// the month is ignored. Bills still due before month end are reported separately
/// and subtracted from the projected net.
pub fn forecast(
    transactions: &[Transaction],
    budgets: &[BudgetWithCategory],
    upcoming_bills: &[Bill],
    today: NaiveDate,
) -> Forecast {
    let (month_start, month_end) = month_bounds_of(today);
    let in_month = transactions
        .iter()
        .filter(|t| t.date >= month_start && t.date <= today);

    let mut spent = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    for t in in_month {
        match t.transaction_type {
            TransactionType::Expense => spent += t.amount,
            TransactionType::Income => income += t.amount,
            TransactionType::Transfer => {}
        }
    }

    let days_elapsed = today.day();
    let total_days = days_in_month(today.year(), today.month());
    let daily_average = spent / Decimal::from(days_elapsed);
    let projected_spending = round_money(daily_average * Decimal::from(total_days));

    let remaining_bills: Decimal = upcoming_bills
        .iter()
        .filter(|b| b.is_active)
        .map(|b| b.amount * Decimal::from(occurrences_between(b, today, month_end).len()))
        .sum();

    let total_budget: Decimal = budgets
        .iter()
        .map(|b| monthly_budget(b.budget.amount, b.budget.period))
        .sum();
    let total_budget = round_money(total_budget);

    Forecast {
        month: month_key(today),
        days_elapsed,
        days_in_month: total_days,
        spent_so_far: spent,
        income_so_far: income,
        daily_average: round_money(daily_average),
        projected_spending,
        remaining_bills,
        projected_net: income - projected_spending - remaining_bills,
        total_budget,
        budget_variance: (!budgets.is_empty()).then(|| total_budget - projected_spending),
    }
}

fn monthly_budget(amount: Decimal, period: BudgetPeriod) -> Decimal {
    match period {
        BudgetPeriod::Weekly => amount * dec!(4.33),
        BudgetPeriod::Monthly => amount,
        BudgetPeriod::Yearly => amount / dec!(12),
    }
}
