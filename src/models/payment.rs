use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::PaymentStatus;
use super::year_month::YearMonth;

/// Uploaded proof of payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub url: String,
    pub name: String,
}

/// Persisted subscription payment for one tenant and one month.
/// At most one exists per `(tenant_id, year_month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPayment {
    pub tenant_id: String,
    pub year_month: YearMonth,
    pub status: PaymentStatus,
    pub amount_paid: f64,
    pub payment_date: Option<DateTime<Utc>>,
    pub receipt: Option<Receipt>,
    pub registered_at: DateTime<Utc>,
}

impl MonthlyPayment {
    /// The record implied by absence: pending, nothing paid.
    pub fn pending(tenant_id: &str, year_month: YearMonth, registered_at: DateTime<Utc>) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            year_month,
            status: PaymentStatus::Pending,
            amount_paid: 0.0,
            payment_date: None,
            receipt: None,
            registered_at,
        }
    }
}

/// Fields written by one ledger mutation. `None` leaves the stored value
/// untouched; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
    pub amount_paid: Option<f64>,
    pub payment_date: Option<Option<DateTime<Utc>>>,
    pub receipt: Option<Option<Receipt>>,
    pub registered_at: DateTime<Utc>,
}

impl PaymentPatch {
    pub fn touching(registered_at: DateTime<Utc>) -> Self {
        Self {
            status: None,
            amount_paid: None,
            payment_date: None,
            receipt: None,
            registered_at,
        }
    }

    /// Merge onto the existing record (or an implicit pending one).
    pub fn apply(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
        existing: Option<MonthlyPayment>,
    ) -> MonthlyPayment {
        let mut record = existing
            .unwrap_or_else(|| MonthlyPayment::pending(tenant_id, year_month, self.registered_at));
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(amount) = self.amount_paid {
            record.amount_paid = amount;
        }
        if let Some(date) = self.payment_date {
            record.payment_date = date;
        }
        if let Some(receipt) = &self.receipt {
            record.receipt = receipt.clone();
        }
        record.registered_at = self.registered_at;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap()
    }

    fn period() -> YearMonth {
        YearMonth::new(2026, 1).unwrap()
    }

    #[test]
    fn apply_without_existing_starts_from_pending() {
        let patch = PaymentPatch::touching(at(5));
        let record = patch.apply("t-1", period(), None);
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.amount_paid, 0.0);
        assert!(record.receipt.is_none());
        assert_eq!(record.registered_at, at(5));
    }

    #[test]
    fn apply_keeps_untouched_fields() {
        let existing = MonthlyPayment {
            receipt: Some(Receipt {
                url: "file:///r/a.pdf".into(),
                name: "a.pdf".into(),
            }),
            status: PaymentStatus::Paid,
            amount_paid: 150.0,
            payment_date: Some(at(3)),
            ..MonthlyPayment::pending("t-1", period(), at(3))
        };
        let patch = PaymentPatch {
            amount_paid: Some(200.0),
            ..PaymentPatch::touching(at(7))
        };
        let record = patch.apply("t-1", period(), Some(existing));
        assert_eq!(record.amount_paid, 200.0);
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.payment_date, Some(at(3)));
        assert!(record.receipt.is_some());
        assert_eq!(record.registered_at, at(7));
    }

    #[test]
    fn apply_can_clear_nullable_fields() {
        let existing = MonthlyPayment {
            receipt: Some(Receipt {
                url: "file:///r/a.pdf".into(),
                name: "a.pdf".into(),
            }),
            payment_date: Some(at(3)),
            ..MonthlyPayment::pending("t-1", period(), at(3))
        };
        let patch = PaymentPatch {
            payment_date: Some(None),
            receipt: Some(None),
            ..PaymentPatch::touching(at(8))
        };
        let record = patch.apply("t-1", period(), Some(existing));
        assert!(record.payment_date.is_none());
        assert!(record.receipt.is_none());
    }
}
