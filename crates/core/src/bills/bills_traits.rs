use async_trait::async_trait;
use chrono::NaiveDate;

use super::bills_model::{
    Bill, BillCalendar, BillPaymentResult, BillSummary, BillUpdate, BillWithStatus, NewBill,
    PayBillRequest, PaymentState,
};
use crate::errors::Result;

#[async_trait]
pub trait BillRepositoryTrait: Send + Sync {
    /// Bills ordered by next due date.
    fn list(&self, user_id: &str, active_only: bool) -> Result<Vec<Bill>>;
    fn get_by_id(&self, user_id: &str, bill_id: &str) -> Result<Bill>;
    async fn create(&self, user_id: &str, new_bill: NewBill) -> Result<Bill>;
    async fn update(&self, user_id: &str, bill_id: &str, update: BillUpdate) -> Result<Bill>;
    async fn delete(&self, user_id: &str, bill_id: &str) -> Result<usize>;
    /// Persists the payment-tracking fields produced by a payment.
    async fn record_payment(
        &self,
        user_id: &str,
        bill_id: &str,
        state: PaymentState,
    ) -> Result<Bill>;
}

#[async_trait]
pub trait BillServiceTrait: Send + Sync {
    fn list_bills(&self, user_id: &str, today: NaiveDate) -> Result<Vec<BillWithStatus>>;
    fn get_bill(&self, user_id: &str, bill_id: &str, today: NaiveDate) -> Result<BillWithStatus>;
    async fn create_bill(&self, user_id: &str, new_bill: NewBill) -> Result<Bill>;
    async fn update_bill(&self, user_id: &str, bill_id: &str, update: BillUpdate)
        -> Result<Bill>;
    async fn delete_bill(&self, user_id: &str, bill_id: &str) -> Result<()>;
    async fn pay_bill(
        &self,
        user_id: &str,
        bill_id: &str,
        request: PayBillRequest,
        today: NaiveDate,
    ) -> Result<BillPaymentResult>;
    fn get_bill_summary(&self, user_id: &str, today: NaiveDate) -> Result<BillSummary>;
    /// Bill occurrences within a `YYYY-MM` month.
    fn get_calendar(&self, user_id: &str, month: &str, today: NaiveDate) -> Result<BillCalendar>;
}
