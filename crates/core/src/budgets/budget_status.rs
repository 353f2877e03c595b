use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::budgets_model::{BudgetStatus, BudgetWithCategory};
use crate::transactions::{TransactionType, TransactionWithDetails};
use crate::utils::money::{percent_of, round_money};

/// Folds the user's transactions into the status of one budget for the period
/// containing `today`. Only expenses in the budget's category count.
pub fn compute_budget_status(
    budget: &BudgetWithCategory,
    transactions: &[TransactionWithDetails],
    today: NaiveDate,
) -> BudgetStatus {
    let (period_start, period_end) = budget.budget.period.window(today);
    let spent: Decimal = transactions
        .iter()
        .map(|t| &t.transaction)
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .filter(|t| t.category_id.as_deref() == Some(budget.budget.category_id.as_str()))
        .filter(|t| t.date >= period_start && t.date <= period_end)
        .map(|t| t.amount)
        .sum();

    let amount = budget.budget.amount;
    let percent_used = percent_of(spent, amount);
    BudgetStatus {
        budget: budget.clone(),
        period_start,
        period_end,
        spent: round_money(spent),
        remaining: round_money(amount - spent),
        percent_used,
        is_over_budget: spent > amount,
        is_alert: percent_used >= Decimal::from(budget.budget.alert_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budgets::{Budget, BudgetPeriod};
    use crate::transactions::Transaction;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(period: BudgetPeriod, amount: Decimal) -> BudgetWithCategory {
        BudgetWithCategory {
            budget: Budget {
                id: "b1".to_string(),
                user_id: "u1".to_string(),
                category_id: "food".to_string(),
                amount,
                period,
                start_date: d(2024, 1, 1),
                alert_threshold: 80,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            category_name: "Food".to_string(),
            category_color: None,
        }
    }

    fn txn(date: NaiveDate, amount: Decimal, category: &str, t: TransactionType) -> TransactionWithDetails {
        TransactionWithDetails {
            transaction: Transaction {
                id: format!("{date}-{amount}"),
                user_id: "u1".to_string(),
                account_id: "a1".to_string(),
                category_id: Some(category.to_string()),
                amount,
                transaction_type: t,
                description: "x".to_string(),
                merchant: None,
                date,
                notes: None,
                recurring_id: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            account_name: "Checking".to_string(),
            category_name: None,
            category_color: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_monthly_status_counts_only_period_expenses_in_category() {
        let txns = vec![
            txn(d(2024, 6, 2), dec!(100), "food", TransactionType::Expense),
            txn(d(2024, 6, 20), dec!(150), "food", TransactionType::Expense),
            txn(d(2024, 5, 31), dec!(999), "food", TransactionType::Expense),
            txn(d(2024, 6, 5), dec!(999), "rent", TransactionType::Expense),
            txn(d(2024, 6, 5), dec!(999), "food", TransactionType::Income),
        ];
        let status = compute_budget_status(&budget(BudgetPeriod::Monthly, dec!(300)), &txns, d(2024, 6, 21));
        assert_eq!(status.spent, dec!(250));
        assert_eq!(status.remaining, dec!(50));
        assert_eq!(status.percent_used, dec!(83.33));
        assert!(status.is_alert);
        assert!(!status.is_over_budget);
    }

    #[test]
    fn test_weekly_status_starts_monday() {
        let txns = vec![
            txn(d(2024, 6, 9), dec!(40), "food", TransactionType::Expense), // Sunday before
            txn(d(2024, 6, 10), dec!(60), "food", TransactionType::Expense), // Monday
        ];
        let status = compute_budget_status(&budget(BudgetPeriod::Weekly, dec!(50)), &txns, d(2024, 6, 12));
        assert_eq!(status.period_start, d(2024, 6, 10));
        assert_eq!(status.spent, dec!(60));
        assert!(status.is_over_budget);
        assert_eq!(status.remaining, dec!(-10));
    }
}
