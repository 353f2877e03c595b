//! Pure folds shared by the report builders.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::reports_model::{Anomaly, CategoryTotal, DailyTotal, MerchantTotal, MonthTotal};
use crate::transactions::{TransactionType, TransactionWithDetails};
use crate::utils::money::{from_f64, mean_and_std_dev, percent_of, round_money, to_f64};
use crate::utils::text::{merchant_or_description, normalize_merchant};
use crate::utils::time_utils::month_key;

const UNCATEGORIZED: &str = "Uncategorized";

/// Income and expense sums; transfers are counted but not summed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub count: usize,
}

impl Totals {
    pub fn of<'a>(rows: impl IntoIterator<Item = &'a TransactionWithDetails>) -> Self {
        let mut totals = Totals::default();
        for row in rows {
            let t = &row.transaction;
            match t.transaction_type {
                TransactionType::Income => totals.income += t.amount,
                TransactionType::Expense => totals.expenses += t.amount,
                TransactionType::Transfer => {}
            }
            totals.count += 1;
        }
        totals
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Net as a share of income; zero without income.
    pub fn savings_rate(&self) -> Decimal {
        percent_of(self.net(), self.income)
    }
}

fn expenses(rows: &[TransactionWithDetails]) -> impl Iterator<Item = &TransactionWithDetails> {
    rows.iter()
        .filter(|r| r.transaction.transaction_type == TransactionType::Expense)
}

/// Expense totals per category, largest first.
pub fn category_totals(rows: &[TransactionWithDetails]) -> Vec<CategoryTotal> {
    let mut groups: HashMap<Option<String>, CategoryTotal> = HashMap::new();
    let mut grand_total = Decimal::ZERO;
    for row in expenses(rows) {
        let amount = row.transaction.amount;
        grand_total += amount;
        let entry = groups
            .entry(row.transaction.category_id.clone())
            .or_insert_with(|| CategoryTotal {
                category_id: row.transaction.category_id.clone(),
                category_name: row
                    .category_name
                    .clone()
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                color: row.category_color.clone(),
                total: Decimal::ZERO,
                count: 0,
                percent: Decimal::ZERO,
            });
        entry.total += amount;
        entry.count += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_values()
        .map(|mut c| {
            c.percent = percent_of(c.total, grand_total);
            c
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    totals
}

/// Expense totals per normalised merchant, largest first, at most `limit` entries.
pub fn merchant_totals(rows: &[TransactionWithDetails], limit: usize) -> Vec<MerchantTotal> {
    let mut groups: HashMap<String, MerchantTotal> = HashMap::new();
    for row in expenses(rows) {
        let t = &row.transaction;
        let label = merchant_or_description(t.merchant.as_deref(), &t.description).trim();
        let key = normalize_merchant(label);
        if key.is_empty() {
            continue;
        }
        let entry = groups.entry(key).or_insert_with(|| MerchantTotal {
            merchant: label.to_string(),
            total: Decimal::ZERO,
            count: 0,
            average: Decimal::ZERO,
            last_date: t.date,
        });
        entry.total += t.amount;
        entry.count += 1;
        entry.last_date = entry.last_date.max(t.date);
    }

    let mut totals: Vec<MerchantTotal> = groups
        .into_values()
        .map(|mut m| {
            m.average = round_money(m.total / Decimal::from(m.count));
            m
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    totals.truncate(limit);
    totals
}

/// Expense sums per `YYYY-MM`, oldest first.
pub(crate) fn monthly_expense_totals(rows: &[TransactionWithDetails]) -> Vec<MonthTotal> {
    let mut months: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for row in expenses(rows) {
        let entry = months.entry(month_key(row.transaction.date)).or_default();
        entry.0 += row.transaction.amount;
        entry.1 += 1;
    }
    months
        .into_iter()
        .map(|(month, (total, count))| MonthTotal { month, total, count })
        .collect()
}

pub(crate) fn daily_totals(rows: &[TransactionWithDetails]) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
    for row in rows {
        let t = &row.transaction;
        let entry = days.entry(t.date).or_insert_with(|| DailyTotal {
            date: t.date,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        });
        match t.transaction_type {
            TransactionType::Income => entry.income += t.amount,
            TransactionType::Expense => entry.expenses += t.amount,
            TransactionType::Transfer => {}
        }
    }
    days.into_values().collect()
}

/// Population mean, standard deviation and the anomaly threshold (mean + 2σ) of
/// expense amounts, plus the expenses above that threshold (largest first).
pub fn find_anomalies(
    rows: &[TransactionWithDetails],
) -> (Decimal, Decimal, Decimal, Vec<Anomaly>) {
    let amounts: Vec<f64> = expenses(rows).map(|r| to_f64(r.transaction.amount)).collect();
    let (mean, std_dev) = mean_and_std_dev(&amounts);
    let threshold = mean + 2.0 * std_dev;

    let mut anomalies: Vec<Anomaly> = expenses(rows)
        .filter(|r| to_f64(r.transaction.amount) > threshold)
        .map(|r| {
            let amount = to_f64(r.transaction.amount);
            let deviation = if std_dev > 0.0 {
                (amount - mean) / std_dev
            } else {
                0.0
            };
            Anomaly {
                transaction_id: r.transaction.id.clone(),
                date: r.transaction.date,
                description: r.transaction.description.clone(),
                merchant: r.transaction.merchant.clone(),
                amount: r.transaction.amount,
                deviation: round_money(from_f64(deviation)),
            }
        })
        .collect();
    anomalies.sort_by(|a, b| b.amount.cmp(&a.amount));

    (
        round_money(from_f64(mean)),
        round_money(from_f64(std_dev)),
        round_money(from_f64(threshold)),
        anomalies,
    )
}
