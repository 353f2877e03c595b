//! Pure due-date and payment-history rules for bills.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::bills_model::{Bill, BillFrequency, BillStatus, BillWithStatus, PaymentState};
use crate::constants::DUE_SOON_DAYS;
use crate::utils::money::{percent_of, round_money};
use crate::utils::time_utils::add_months;

/// Upper bound on generated occurrences when walking a schedule.
const MAX_OCCURRENCE_STEPS: usize = 1000;

pub fn compute_status(today: NaiveDate, next_due_date: NaiveDate) -> BillStatus {
    let days = days_until_due(today, next_due_date);
    if days < 0 {
        BillStatus::Overdue
    } else if days == 0 {
        BillStatus::DueToday
    } else if days <= DUE_SOON_DAYS {
        BillStatus::DueSoon
    } else {
        BillStatus::Upcoming
    }
}

pub fn days_until_due(today: NaiveDate, next_due_date: NaiveDate) -> i64 {
    (next_due_date - today).num_days()
}

/// Converts a per-period amount to its monthly equivalent, rounded to cents.
pub fn monthly_equivalent(amount: Decimal, frequency: BillFrequency) -> Decimal {
    let monthly = match frequency {
        BillFrequency::Weekly => amount * dec!(4.33),
        BillFrequency::Biweekly => amount * dec!(2.17),
        BillFrequency::Monthly => amount,
        BillFrequency::Quarterly => amount / dec!(3),
        BillFrequency::Yearly => amount / dec!(12),
    };
    round_money(monthly)
}

/// Share of on-time payments as a percentage; `None` when nothing was paid yet.
pub fn on_time_rate(on_time_payments: i32, total_payments: i32) -> Option<Decimal> {
    if total_payments <= 0 {
        None
    } else {
        Some(percent_of(
            Decimal::from(on_time_payments),
            Decimal::from(total_payments),
        ))
    }
}

/// Moves a due date forward by one period; month-based steps clamp to month end.
pub fn advance_due_date(date: NaiveDate, frequency: BillFrequency) -> NaiveDate {
    match frequency {
        BillFrequency::Weekly => date + Duration::days(7),
        BillFrequency::Biweekly => date + Duration::days(14),
        BillFrequency::Monthly => add_months(date, 1),
        BillFrequency::Quarterly => add_months(date, 3),
        BillFrequency::Yearly => add_months(date, 12),
    }
}

/// Payment-tracking fields after paying `bill` on `paid_date`.
///
/// A payment is on time when made on or before the due date. On-time payments
/// extend the streak; a late one resets it to zero.
pub fn apply_payment(bill: &Bill, paid_date: NaiveDate) -> PaymentState {
    let on_time = paid_date <= bill.next_due_date;
    let current_streak = if on_time { bill.current_streak + 1 } else { 0 };
    PaymentState {
        on_time,
        last_paid_date: paid_date,
        next_due_date: advance_due_date(bill.next_due_date, bill.frequency),
        current_streak,
        longest_streak: bill.longest_streak.max(current_streak),
        total_payments: bill.total_payments + 1,
        on_time_payments: bill.on_time_payments + i32::from(on_time),
    }
}

pub fn with_status(bill: Bill, today: NaiveDate) -> BillWithStatus {
    BillWithStatus {
        status: compute_status(today, bill.next_due_date),
        days_until_due: days_until_due(today, bill.next_due_date),
        monthly_equivalent: monthly_equivalent(bill.amount, bill.frequency),
        on_time_rate: on_time_rate(bill.on_time_payments, bill.total_payments),
        bill,
    }
}

/// Due dates of `bill` falling within `[start, end]`, walking forward from its next due date.
pub fn occurrences_between(bill: &Bill, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = bill.next_due_date;
    for _ in 0..MAX_OCCURRENCE_STEPS {
        if current > end {
            break;
        }
        if current >= start {
            dates.push(current);
        }
        current = advance_due_date(current, bill.frequency);
    }
    dates
}
