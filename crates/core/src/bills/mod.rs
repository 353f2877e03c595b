//! Bills module - recurring obligations, due-date status and payment streaks.

pub mod bill_rules;
mod bills_model;
mod bills_service;
mod bills_traits;


pub use bills_model::{
    Bill, BillCalendar, BillFrequency, BillPaymentResult, BillStatus, BillSummary, BillUpdate,
    BillWithStatus, CalendarEvent, NewBill, PayBillRequest, PaymentState,
};
pub use bills_service::BillService;
pub use bills_traits::{BillRepositoryTrait, BillServiceTrait};
