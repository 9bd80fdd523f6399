use chrono::{DateTime, TimeZone};

use crate::agenda::filter::{FilterMode, WeekStart};
use crate::studio::{Appointment, Expense};

/// Income from appointments against expenses over one filter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    pub income_cents: u64,
    pub expense_cents: u64,
    pub appointment_count: usize,
}

impl Balance {
    /// Income minus expenses, saturating at the bounds of `i64`.
    pub fn net_cents(&self) -> i64 {
        let net = i128::from(self.income_cents) - i128::from(self.expense_cents);
        i64::try_from(net).unwrap_or(if net < 0 { i64::MIN } else { i64::MAX })
    }
}

pub fn balance<Tz: TimeZone>(
    mode: FilterMode,
    appointments: &[Appointment],
    expenses: &[Expense],
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Balance {
    let window = mode.window(now.date_naive(), week_start);
    let zone = now.timezone();
    let in_window = |instant: &DateTime<chrono::Utc>| {
        window
            .as_ref()
            .map_or(true, |w| w.contains_instant(instant, &zone))
    };

    let mut result = Balance::default();
    for appointment in appointments.iter().filter(|a| in_window(&a.date)) {
        result.income_cents = result.income_cents.saturating_add(appointment.price_cents);
        result.appointment_count += 1;
    }
    result.expense_cents = expenses
        .iter()
        .filter(|e| in_window(&e.date))
        .fold(0u64, |total, e| total.saturating_add(e.amount_cents));

    result
}
