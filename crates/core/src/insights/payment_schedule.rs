use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::insights_model::{PaymentAction, PaymentSchedule, PaymentSuggestion};
use crate::bills::bill_rules::days_until_due;
use crate::bills::Bill;
use crate::constants::{DUE_SOON_DAYS, LOW_BALANCE_THRESHOLD, MAX_PAYMENT_DELAY_DAYS};

/// Suggests when to pay each bill.
///
/// Overdue and nearly due bills are paid now, autopay bills need nothing, bills
/// that would leave the balance under the low-balance threshold are pushed back up
/// to a week (but never past the day before they are due), and the rest are paid
/// halfway between today and the due date.
pub fn optimal_payment_schedule(
    bills: &[Bill],
    available_balance: Decimal,
    today: NaiveDate,
) -> PaymentSchedule {
    let mut ordered: Vec<&Bill> = bills.iter().filter(|b| b.is_active).collect();
    ordered.sort_by_key(|b| b.next_due_date);

    let suggestions: Vec<PaymentSuggestion> = ordered
        .into_iter()
        .map(|bill| suggest(bill, available_balance, today))
        .collect();

    PaymentSchedule {
        available_balance,
        total_due: suggestions.iter().map(|s| s.amount).sum(),
        suggestions,
    }
}

fn suggest(bill: &Bill, available_balance: Decimal, today: NaiveDate) -> PaymentSuggestion {
    let due = bill.next_due_date;
    let days = days_until_due(today, due);

    let (action, suggested_date, reason) = if days < 0 {
        (PaymentAction::PayNow, today, format!("Overdue by {} days", -days))
    } else if days <= DUE_SOON_DAYS {
        (PaymentAction::PayNow, today, "Due within 3 days".to_string())
    } else if bill.is_autopay {
        (PaymentAction::NoAction, due, "Paid automatically".to_string())
    } else if available_balance - bill.amount < Decimal::from(LOW_BALANCE_THRESHOLD) {
        let delayed = (today + Duration::days(MAX_PAYMENT_DELAY_DAYS)).min(due - Duration::days(1));
        (
            PaymentAction::Delay,
            delayed,
            "Paying now would leave a low balance".to_string(),
        )
    } else {
        let midpoint = today + Duration::days(days / 2);
        (
            PaymentAction::Schedule,
            midpoint,
            format!("Due in {} days", days),
        )
    };

    PaymentSuggestion {
        bill_id: bill.id.clone(),
        bill_name: bill.name.clone(),
        amount: bill.amount,
        due_date: due,
        action,
        suggested_date,
        reason,
    }
}
