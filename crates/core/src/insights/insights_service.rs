use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::forecast::forecast;
use super::insights_model::{Forecast, PaydayPrediction, PaymentSchedule};
use super::insights_traits::InsightsServiceTrait;
use super::payday::detect_payday_pattern;
use super::payment_schedule::optimal_payment_schedule;
use crate::accounts::AccountRepositoryTrait;
use crate::bills::BillRepositoryTrait;
use crate::budgets::BudgetRepositoryTrait;
use crate::constants::{PAYDAY_SAMPLE_LIMIT, SCHEDULE_HORIZON_DAYS};
use crate::errors::Result;
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::utils::time_utils::month_bounds_of;

pub struct InsightsService {
    transactions: Arc<dyn TransactionRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    bills: Arc<dyn BillRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
}

impl InsightsService {
    pub fn new(
        transactions: Arc<dyn TransactionRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        bills: Arc<dyn BillRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
    ) -> Self {
        Self {
            transactions,
            accounts,
            bills,
            budgets,
        }
    }

    /// Sum of balances on non-archived checking, savings and cash accounts.
    fn available_balance(&self, user_id: &str) -> Result<Decimal> {
        Ok(self
            .accounts
            .list(user_id, false)?
            .iter()
            .filter(|a| a.account_type.is_liquid())
            .map(|a| a.balance)
            .sum())
    }
}

impl InsightsServiceTrait for InsightsService {
    fn get_payday_pattern(&self, user_id: &str, today: NaiveDate) -> Result<Vec<PaydayPrediction>> {
        let income = self.transactions.list_recent(
            user_id,
            TransactionType::Income,
            PAYDAY_SAMPLE_LIMIT as i64,
        )?;
        let predictions = detect_payday_pattern(&income, today);
        debug!(
            "Payday detection for {} over {} income rows: {} predictions",
            user_id,
            income.len(),
            predictions.len()
        );
        Ok(predictions)
    }

    fn get_payment_schedule(&self, user_id: &str, today: NaiveDate) -> Result<PaymentSchedule> {
        let horizon = today + Duration::days(SCHEDULE_HORIZON_DAYS);
        let bills: Vec<_> = self
            .bills
            .list(user_id, true)?
            .into_iter()
            .filter(|b| b.next_due_date <= horizon)
            .collect();
        let balance = self.available_balance(user_id)?;
        Ok(optimal_payment_schedule(&bills, balance, today))
    }

    fn get_forecast(&self, user_id: &str, today: NaiveDate) -> Result<Forecast> {
        let (month_start, _) = month_bounds_of(today);
        let transactions: Vec<_> = self
            .transactions
            .list_between(user_id, month_start, today)?
            .into_iter()
            .map(|t| t.transaction)
            .collect();
        let budgets = self.budgets.list(user_id)?;
        let bills = self.bills.list(user_id, true)?;
        Ok(forecast(&transactions, &budgets, &bills, today))
    }
}
