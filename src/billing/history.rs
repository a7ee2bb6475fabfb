//! Per-tenant billing history: the dense period list merged with the sparse
//! set of persisted payment records.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::period::Period;
use crate::models::{MonthlyPayment, PaymentStatus, YearMonth};

const NOT_REGISTERED: &str = "N/A";

/// Whether a history row came from storage or was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Persisted,
    Default,
}

/// One month of a tenant's history, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodView {
    pub year_month: YearMonth,
    pub label: String,
    pub subscription_amount: f64,
    pub status: PaymentStatus,
    pub amount_paid: f64,
    pub payment_date: Option<DateTime<Utc>>,
    pub receipt_url: Option<String>,
    pub receipt_name: Option<String>,
    pub due_date: NaiveDate,
    /// `DD/MM/YYYY` of the last mutation, or "N/A" for synthesized rows.
    pub last_registered: String,
    pub source: RecordSource,
}

/// Merge one period with its record, if any. Absence means pending with
/// nothing paid.
pub fn merge_period(
    period: &Period,
    subscription_amount: f64,
    record: Option<&MonthlyPayment>,
    due_day: u32,
) -> PeriodView {
    let due_date = period.year_month.day(due_day);
    match record {
        Some(record) => PeriodView {
            year_month: period.year_month,
            label: period.label.clone(),
            subscription_amount,
            status: record.status,
            amount_paid: record.amount_paid,
            payment_date: record.payment_date,
            receipt_url: record.receipt.as_ref().map(|r| r.url.clone()),
            receipt_name: record.receipt.as_ref().map(|r| r.name.clone()),
            due_date,
            last_registered: record.registered_at.format("%d/%m/%Y").to_string(),
            source: RecordSource::Persisted,
        },
        None => PeriodView {
            year_month: period.year_month,
            label: period.label.clone(),
            subscription_amount,
            status: PaymentStatus::Pending,
            amount_paid: 0.0,
            payment_date: None,
            receipt_url: None,
            receipt_name: None,
            due_date,
            last_registered: NOT_REGISTERED.to_string(),
            source: RecordSource::Default,
        },
    }
}

/// One view per period, in the order of `periods`. Records outside the
/// period list are ignored.
pub fn merge_history(
    periods: &[Period],
    subscription_amount: f64,
    records: &[MonthlyPayment],
    due_day: u32,
) -> Vec<PeriodView> {
    let by_month: HashMap<YearMonth, &MonthlyPayment> =
        records.iter().map(|r| (r.year_month, r)).collect();
    periods
        .iter()
        .map(|period| {
            merge_period(
                period,
                subscription_amount,
                by_month.get(&period.year_month).copied(),
                due_day,
            )
        })
        .collect()
}
