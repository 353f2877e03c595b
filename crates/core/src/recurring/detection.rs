//! Heuristic detection of repeating expenses.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::recurring_model::{RecurringFrequency, RecurringSuggestion};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::money::{from_f64, round_money};
use crate::utils::text::{merchant_or_description, normalize_merchant};

const MIN_OCCURRENCES: usize = 3;
const AMOUNT_TOLERANCE: Decimal = dec!(0.10);

/// Maps a mean interval in days to a frequency bucket.
fn classify_interval(mean_days: f64) -> Option<RecurringFrequency> {
    match mean_days {
        d if (6.0..=8.0).contains(&d) => Some(RecurringFrequency::Weekly),
        d if (13.0..=16.0).contains(&d) => Some(RecurringFrequency::Biweekly),
        d if (27.0..=33.0).contains(&d) => Some(RecurringFrequency::Monthly),
        d if (85.0..=95.0).contains(&d) => Some(RecurringFrequency::Quarterly),
        d if (350.0..=380.0).contains(&d) => Some(RecurringFrequency::Yearly),
        _ => None,
    }
}

/// Groups expenses by normalised merchant and keeps groups that repeat on a
/// regular interval with a stable amount.
///
/// `tracked` holds normalised names of merchants already covered by a recurring
/// item; matching suggestions are flagged rather than dropped.
pub fn detect_recurring_patterns(
    transactions: &[Transaction],
    tracked: &HashSet<String>,
) -> Vec<RecurringSuggestion> {
    let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let key = normalize_merchant(merchant_or_description(t.merchant.as_deref(), &t.description));
        if !key.is_empty() {
            groups.entry(key).or_default().push(t);
        }
    }

    let mut suggestions: Vec<RecurringSuggestion> = groups
        .into_iter()
        .filter(|(_, txns)| txns.len() >= MIN_OCCURRENCES)
        .filter_map(|(key, mut txns)| {
            txns.sort_by_key(|t| t.date);
            let dates: Vec<NaiveDate> = txns.iter().map(|t| t.date).collect();
            let gaps: Vec<i64> = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).collect();
            let mean_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
            let frequency = classify_interval(mean_gap)?;

            let total: Decimal = txns.iter().map(|t| t.amount).sum();
            let mean = total / Decimal::from(txns.len());
            let tolerance = mean * AMOUNT_TOLERANCE;
            if txns.iter().any(|t| (t.amount - mean).abs() > tolerance) {
                return None;
            }

            let latest = txns.last()?;
            Some(RecurringSuggestion {
                merchant: merchant_or_description(latest.merchant.as_deref(), &latest.description)
                    .trim()
                    .to_string(),
                already_tracked: tracked.contains(&key),
                normalized_merchant: key,
                frequency,
                average_amount: round_money(mean),
                occurrences: txns.len(),
                average_interval_days: round_money(from_f64(mean_gap)),
                last_date: latest.date,
                next_expected_date: frequency.advance(latest.date),
                account_id: latest.account_id.clone(),
                category_id: latest.category_id.clone(),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.average_amount
            .cmp(&a.average_amount)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    suggestions
}
