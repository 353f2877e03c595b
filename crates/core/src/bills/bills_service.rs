use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::bill_rules::{apply_payment, compute_status, occurrences_between, on_time_rate, with_status};
use super::bills_model::{
    Bill, BillCalendar, BillPaymentResult, BillStatus, BillSummary, BillUpdate, BillWithStatus,
    CalendarEvent, NewBill, PayBillRequest,
};
use super::bills_traits::{BillRepositoryTrait, BillServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::errors::{Error, FieldErrors, Result, ValidationError};
use crate::transactions::{NewTransaction, TransactionServiceTrait, TransactionType};
use crate::utils::time_utils::{month_bounds, month_key, parse_month_key};

pub struct BillService {
    repository: Arc<dyn BillRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    transactions: Arc<dyn TransactionServiceTrait>,
}

impl BillService {
    pub fn new(
        repository: Arc<dyn BillRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionServiceTrait>,
    ) -> Self {
        Self {
            repository,
            accounts,
            transactions,
        }
    }

    fn check_account(&self, user_id: &str, account_id: Option<&str>) -> Result<()> {
        if let Some(account_id) = account_id {
            self.accounts.get_by_id(user_id, account_id)?;
        }
        Ok(())
    }
}

#[async_trait]
impl BillServiceTrait for BillService {
    fn list_bills(&self, user_id: &str, today: NaiveDate) -> Result<Vec<BillWithStatus>> {
        let bills = self.repository.list(user_id, false)?;
        Ok(bills.into_iter().map(|b| with_status(b, today)).collect())
    }

    fn get_bill(&self, user_id: &str, bill_id: &str, today: NaiveDate) -> Result<BillWithStatus> {
        let bill = self.repository.get_by_id(user_id, bill_id)?;
        Ok(with_status(bill, today))
    }

    async fn create_bill(&self, user_id: &str, mut new_bill: NewBill) -> Result<Bill> {
        new_bill.validate()?;
        self.check_account(user_id, new_bill.account_id.as_deref())?;
        new_bill.name = new_bill.name.trim().to_string();
        self.repository.create(user_id, new_bill).await
    }

    async fn update_bill(&self, user_id: &str, bill_id: &str, update: BillUpdate) -> Result<Bill> {
        update.validate()?;
        self.check_account(user_id, update.account_id.as_deref())?;
        self.repository.update(user_id, bill_id, update).await
    }

    async fn delete_bill(&self, user_id: &str, bill_id: &str) -> Result<()> {
        match self.repository.delete(user_id, bill_id).await? {
            0 => Err(Error::not_found("Bill")),
            _ => Ok(()),
        }
    }

    async fn pay_bill(
        &self,
        user_id: &str,
        bill_id: &str,
        request: PayBillRequest,
        today: NaiveDate,
    ) -> Result<BillPaymentResult> {
        let bill = self.repository.get_by_id(user_id, bill_id)?;
        if !bill.is_active {
            return Err(Error::invalid("Cannot pay an inactive bill"));
        }
        let amount = request.amount.unwrap_or(bill.amount);
        let mut errors = FieldErrors::new();
        errors.check(amount <= Decimal::ZERO, "amount", "Amount must be greater than zero");
        errors.check(
            request.create_transaction && bill.account_id.is_none(),
            "createTransaction",
            "Bill has no account to record the payment against",
        );
        errors.into_result()?;

        let paid_date = request.paid_date.unwrap_or(today);
        let state = apply_payment(&bill, paid_date);
        let on_time = state.on_time;
        let updated = self.repository.record_payment(user_id, bill_id, state).await?;
        info!(
            "Bill {} paid on {} ({}), streak {}",
            bill_id,
            paid_date,
            if on_time { "on time" } else { "late" },
            updated.current_streak
        );

        let transaction = match (request.create_transaction, bill.account_id.clone()) {
            (true, Some(account_id)) => Some(
                self.transactions
                    .create_transaction(
                        user_id,
                        NewTransaction {
                            account_id,
                            category_id: bill.category_id.clone(),
                            amount,
                            transaction_type: TransactionType::Expense,
                            description: bill.name.clone(),
                            merchant: Some(bill.name.clone()),
                            date: paid_date,
                            notes: Some("Bill payment".to_string()),
                            tag_ids: Vec::new(),
                            recurring_id: None,
                        },
                    )
                    .await?,
            ),
            _ => None,
        };

        Ok(BillPaymentResult {
            bill: with_status(updated, today),
            on_time,
            transaction,
        })
    }

    fn get_bill_summary(&self, user_id: &str, today: NaiveDate) -> Result<BillSummary> {
        let bills: Vec<BillWithStatus> = self
            .repository
            .list(user_id, true)?
            .into_iter()
            .map(|b| with_status(b, today))
            .collect();

        let count = |status: BillStatus| bills.iter().filter(|b| b.status == status).count();
        let total_payments: i32 = bills.iter().map(|b| b.bill.total_payments).sum();
        let on_time_payments: i32 = bills.iter().map(|b| b.bill.on_time_payments).sum();
        let next_due = bills
            .iter()
            .filter(|b| b.days_until_due >= 0)
            .min_by_key(|b| b.bill.next_due_date)
            .cloned();

        Ok(BillSummary {
            active_count: bills.len(),
            monthly_total: bills.iter().map(|b| b.monthly_equivalent).sum(),
            overdue_count: count(BillStatus::Overdue),
            due_today_count: count(BillStatus::DueToday),
            due_soon_count: count(BillStatus::DueSoon),
            upcoming_count: count(BillStatus::Upcoming),
            on_time_rate: on_time_rate(on_time_payments, total_payments),
            next_due,
        })
    }

    fn get_calendar(&self, user_id: &str, month: &str, today: NaiveDate) -> Result<BillCalendar> {
        let Some((start, end)) =
            parse_month_key(month).and_then(|(year, month_num)| month_bounds(year, month_num))
        else {
            let mut errors = FieldErrors::new();
            errors.add("month", "Month must be a YYYY-MM key between 1900-01 and 9999-12");
            return Err(Error::Validation(ValidationError::Fields(errors)));
        };

        let mut events: Vec<CalendarEvent> = self
            .repository
            .list(user_id, true)?
            .iter()
            .flat_map(|bill| {
                occurrences_between(bill, start, end)
                    .into_iter()
                    .map(move |date| CalendarEvent {
                        date,
                        bill_id: bill.id.clone(),
                        name: bill.name.clone(),
                        amount: bill.amount,
                        is_autopay: bill.is_autopay,
                        status: compute_status(today, date),
                    })
            })
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        debug!("Calendar {} has {} bill events", month, events.len());

        Ok(BillCalendar {
            month: month_key(start),
            total: events.iter().map(|e| e.amount).sum(),
            events,
        })
    }
}
