use serde::Serialize;

use crate::config::MAX_BILLING_PERIODS;
use crate::models::YearMonth;

/// One billable month as shown in history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year_month: YearMonth,
    pub label: String,
}

impl Period {
    pub fn new(year_month: YearMonth) -> Self {
        Self {
            year_month,
            label: year_month.label(),
        }
    }
}

/// Every month in `[start, end)`, most recent first.
///
/// Empty when `end <= start`. Generation stops after `MAX_BILLING_PERIODS`
/// months however far away `end` is.
pub fn generate_periods(start: YearMonth, end: YearMonth) -> Vec<Period> {
    let span = start.months_until(end) as usize;
    if span > MAX_BILLING_PERIODS {
        tracing::warn!(
            %start,
            %end,
            limit = MAX_BILLING_PERIODS,
            "Billing horizon exceeds period limit, truncating"
        );
    }

    let mut periods = Vec::with_capacity(span.min(MAX_BILLING_PERIODS));
    let mut current = start;
    while current < end && periods.len() < MAX_BILLING_PERIODS {
        periods.push(Period::new(current));
        current = current.succ();
    }
    periods.reverse();
    periods
}
