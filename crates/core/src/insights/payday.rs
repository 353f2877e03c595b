use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};

use super::insights_model::PaydayPrediction;
use crate::constants::PAYDAY_SAMPLE_LIMIT;
use crate::transactions::{Transaction, TransactionType};
use crate::utils::money::{round_money, round_to_nearest};
use crate::utils::time_utils::{add_months, days_in_month, month_bounds_of};

/// Income groups whose dates spread over more days than this are not paydays.
const MAX_DISTINCT_PAY_DAYS: usize = 2;

/// Predicts upcoming paydays from recent income.
///
/// Income is grouped by amount rounded to the nearest 100. A group paid on at most
/// two distinct days of the month is treated as a salary; each of its days yields
/// the next occurrence on or after `today`. Predictions falling on the same date
/// are merged.
pub fn detect_payday_pattern(income: &[Transaction], today: NaiveDate) -> Vec<PaydayPrediction> {
    let sample: Vec<&Transaction> = income
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Income)
        .take(PAYDAY_SAMPLE_LIMIT)
        .collect();
    if sample.len() < 2 {
        return Vec::new();
    }

    let mut groups: BTreeMap<Decimal, Vec<&Transaction>> = BTreeMap::new();
    for t in sample {
        groups
            .entry(round_to_nearest(t.amount, dec!(100)))
            .or_default()
            .push(t);
    }

    // date -> (amount sum, count)
    let mut by_date: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for members in groups.values() {
        let days: BTreeSet<u32> = members.iter().map(|t| t.date.day()).collect();
        if days.len() > MAX_DISTINCT_PAY_DAYS {
            continue;
        }
        let total: Decimal = members.iter().map(|t| t.amount).sum();
        for day in days {
            let entry = by_date.entry(next_occurrence(day, today)).or_default();
            entry.0 += total;
            entry.1 += members.len();
        }
    }

    by_date
        .into_iter()
        .map(|(date, (sum, count))| PaydayPrediction {
            date,
            day_of_month: date.day(),
            expected_amount: round_money(sum / Decimal::from(count)),
            occurrences: count,
        })
        .collect()
}

/// `day` of this month, or of next month when it has already passed.
fn next_occurrence(day: u32, today: NaiveDate) -> NaiveDate {
    let (month_start, _) = month_bounds_of(today);
    let start = if day >= today.day() {
        month_start
    } else {
        add_months(month_start, 1)
    };
    let last = days_in_month(start.year(), start.month());
    start + Duration::days(day.clamp(1, last) as i64 - 1)
}
