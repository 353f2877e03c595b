use crate::accounts::AccountType;
use crate::bills::{Bill, BillFrequency, BillRepositoryTrait, BillUpdate, NewBill, PaymentState};
use crate::budgets::{
    Budget, BudgetPeriod, BudgetRepositoryTrait, BudgetUpdate, BudgetWithCategory, NewBudget,
};
use crate::errors::{Error, Result};
use crate::insights::{InsightsService, InsightsServiceTrait, PaymentAction};
use crate::test_support::{d, txn, InMemoryAccounts, InMemoryTransactions};
use crate::transactions::TransactionType;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

struct StaticBills(Vec<Bill>);

#[async_trait]
impl BillRepositoryTrait for StaticBills {
    fn list(&self, _user_id: &str, active_only: bool) -> Result<Vec<Bill>> {
        Ok(self
            .0
            .iter()
            .filter(|b| !active_only || b.is_active)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, _: &str, bill_id: &str) -> Result<Bill> {
        self.0
            .iter()
            .find(|b| b.id == bill_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Bill"))
    }

    async fn create(&self, _: &str, _: NewBill) -> Result<Bill> {
        unimplemented!()
    }

    async fn update(&self, _: &str, _: &str, _: BillUpdate) -> Result<Bill> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }

    async fn record_payment(&self, _: &str, _: &str, _: PaymentState) -> Result<Bill> {
        unimplemented!()
    }
}

struct StaticBudgets(Vec<BudgetWithCategory>);

#[async_trait]
impl BudgetRepositoryTrait for StaticBudgets {
    fn list(&self, _user_id: &str) -> Result<Vec<BudgetWithCategory>> {
        Ok(self.0.clone())
    }

    fn get_by_id(&self, _: &str, _: &str) -> Result<BudgetWithCategory> {
        Err(Error::not_found("Budget"))
    }

    async fn create(&self, _: &str, _: NewBudget) -> Result<Budget> {
        unimplemented!()
    }

    async fn update(&self, _: &str, _: &str, _: BudgetUpdate) -> Result<Budget> {
        unimplemented!()
    }

    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }

    async fn insert_batch(&self, _: &str, _: bool, _: Vec<NewBudget>) -> Result<Vec<Budget>> {
        unimplemented!()
    }
}

fn bill(id: &str, amount: Decimal, frequency: BillFrequency, due: NaiveDate) -> Bill {
    Bill {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: id.to_string(),
        amount,
        frequency,
        next_due_date: due,
        category_id: None,
        account_id: None,
        is_autopay: false,
        reminder_days: 3,
        is_active: true,
        last_paid_date: None,
        current_streak: 0,
        longest_streak: 0,
        total_payments: 0,
        on_time_payments: 0,
        notes: None,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn budget(amount: Decimal, period: BudgetPeriod) -> BudgetWithCategory {
    BudgetWithCategory {
        budget: Budget {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            category_id: "groceries".to_string(),
            amount,
            period,
            start_date: d(2024, 1, 1),
            alert_threshold: 80,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        },
        category_name: "Groceries".to_string(),
        category_color: None,
    }
}

fn service(
    history: Vec<crate::transactions::TransactionWithDetails>,
    bills: Vec<Bill>,
    budgets: Vec<BudgetWithCategory>,
) -> InsightsService {
    let accounts = InMemoryAccounts::with(&[
        ("checking", AccountType::Checking, dec!(1200)),
        ("savings", AccountType::Savings, dec!(300)),
        ("visa", AccountType::CreditCard, dec!(-900)),
        ("brokerage", AccountType::Investment, dec!(10000)),
    ]);
    InsightsService::new(
        Arc::new(InMemoryTransactions::with(history)),
        Arc::new(accounts),
        Arc::new(StaticBills(bills)),
        Arc::new(StaticBudgets(budgets)),
    )
}

#[test]
fn test_payday_pattern_reads_recent_income_only() {
    let history = vec![
        txn(d(2024, 1, 1), dec!(2000), TransactionType::Income, None, Some("Acme")),
        txn(d(2024, 2, 1), dec!(2050), TransactionType::Income, None, Some("Acme")),
        txn(d(2024, 2, 9), dec!(2000), TransactionType::Expense, None, Some("Rent")),
    ];
    let predictions = service(history, vec![], vec![])
        .get_payday_pattern("u1", d(2024, 2, 20))
        .unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].date, d(2024, 3, 1));
}

#[test]
fn test_schedule_uses_liquid_balance_and_horizon() {
    let today = d(2024, 6, 10);
    let bills = vec![
        bill("insurance", dec!(1100), BillFrequency::Yearly, d(2024, 6, 25)),
        bill("next-quarter", dec!(50), BillFrequency::Quarterly, d(2024, 9, 1)),
    ];
    let schedule = service(vec![], bills, vec![])
        .get_payment_schedule("u1", today)
        .unwrap();

    assert_eq!(schedule.available_balance, dec!(1500));
    assert_eq!(schedule.suggestions.len(), 1);
    // 1500 - 1100 leaves less than the 500 cushion.
    assert_eq!(schedule.suggestions[0].action, PaymentAction::Delay);
    assert_eq!(schedule.suggestions[0].suggested_date, d(2024, 6, 17));
}

#[test]
fn test_forecast_includes_bills_and_budgets() {
    let today = d(2024, 6, 15);
    let history = vec![
        txn(d(2024, 6, 3), dec!(450), TransactionType::Expense, Some("groceries"), None),
        txn(d(2024, 6, 1), dec!(2500), TransactionType::Income, None, None),
    ];
    let bills = vec![bill("gym", dec!(20), BillFrequency::Weekly, d(2024, 6, 17))];
    let budgets = vec![budget(dec!(100), BudgetPeriod::Weekly)];

    let f = service(history, bills, budgets)
        .get_forecast("u1", today)
        .unwrap();
    assert_eq!(f.spent_so_far, dec!(450));
    assert_eq!(f.projected_spending, dec!(900));
    // 17th and 24th
    assert_eq!(f.remaining_bills, dec!(40));
    assert_eq!(f.projected_net, dec!(1560));
    assert_eq!(f.total_budget, dec!(433));
    assert_eq!(f.budget_variance, Some(dec!(-467)));
}
