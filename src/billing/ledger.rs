use std::sync::Arc;

use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};

use super::history::{merge_history, PeriodView};
use super::period::{generate_periods, Period};
use super::summary::{compute_summary, BillingSummary};
use super::traits::{PaymentStore, TenantDirectory};
use crate::authorization::{authorize, Capability, Session};
use crate::blob::{BlobError, BlobStore};
use crate::clock::Clock;
use crate::config::LedgerConfig;
use crate::error::ClinicError;
use crate::models::{MonthlyPayment, PaymentPatch, PaymentStatus, Receipt, Tenant, YearMonth};

/// A receipt file handed over by the caller.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Payment details for `register_payment`.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub amount: f64,
    /// Defaults to now.
    pub payment_date: Option<DateTime<Utc>>,
    pub receipt: Option<ReceiptUpload>,
}

/// Platform-operator view of subscription payments across all tenants.
pub struct BillingLedger {
    payments: Arc<dyn PaymentStore>,
    tenants: Arc<dyn TenantDirectory>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

impl BillingLedger {
    pub fn new(
        session: &Session,
        payments: Arc<dyn PaymentStore>,
        tenants: Arc<dyn TenantDirectory>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
        config: LedgerConfig,
    ) -> Result<Self, ClinicError> {
        authorize(session, Capability::ManageBilling)?;
        config
            .validate()
            .map_err(|e| ClinicError::Validation(e.to_string()))?;
        Ok(Self {
            payments,
            tenants,
            blobs,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Billed months from the configured start up to the horizon, most recent first.
    pub fn periods(&self) -> Vec<Period> {
        generate_periods(
            self.config.system_start_month,
            self.config.horizon_for(self.today()),
        )
    }

    /// One view per billed month for `tenant_id`, defaults filled in where
    /// nothing was ever recorded.
    pub fn build_history(&self, tenant_id: &str) -> Result<Vec<PeriodView>, ClinicError> {
        let tenant = self.require_tenant(tenant_id)?;
        let records = self.payments.list_payments(tenant_id)?;
        let amount = tenant.contracted_amount(self.config.default_subscription_amount);
        Ok(merge_history(
            &self.periods(),
            amount,
            &records,
            self.config.due_day,
        ))
    }

    /// Record a payment for one month. The receipt, if any, is uploaded
    /// before the ledger is touched; a failed upload writes nothing.
    pub fn register_payment(
        &self,
        tenant_id: &str,
        year_month: &str,
        input: PaymentInput,
    ) -> Result<MonthlyPayment, ClinicError> {
        let year_month = parse_year_month(year_month)?;
        if !input.amount.is_finite() || input.amount <= 0.0 {
            tracing::debug!(tenant_id, %year_month, amount = input.amount, "Payment rejected");
            return Err(ClinicError::Validation(format!(
                "payment amount must be a positive number, got {}",
                input.amount
            )));
        }
        self.require_tenant(tenant_id)?;

        let (previous, receipt) = match &input.receipt {
            Some(upload) => {
                let previous = self
                    .payments
                    .get_payment(tenant_id, year_month)?
                    .and_then(|p| p.receipt);
                (previous, Some(self.upload_receipt(tenant_id, year_month, upload)?))
            }
            None => (None, None),
        };

        let now = self.clock.now();
        let patch = PaymentPatch {
            status: Some(PaymentStatus::Paid),
            amount_paid: Some(input.amount),
            payment_date: Some(Some(input.payment_date.unwrap_or(now))),
            receipt: receipt.clone().map(Some),
            ..PaymentPatch::touching(now)
        };
        let record = self.upsert(tenant_id, year_month, &patch)?;

        if let (Some(old), Some(new)) = (previous, receipt) {
            self.discard_replaced(&old, &new);
        }
        tracing::info!(tenant_id, %year_month, amount = input.amount, "Payment registered");
        Ok(record)
    }

    /// Flip a month between paid and pending.
    ///
    /// Marking paid bills the contracted amount as of now and keeps any
    /// receipt. Reverting zeroes the amount and drops the receipt reference;
    /// the receipt file itself is left in the blob store.
    pub fn toggle_status(
        &self,
        tenant_id: &str,
        year_month: &str,
        to_paid: bool,
    ) -> Result<MonthlyPayment, ClinicError> {
        let year_month = parse_year_month(year_month)?;
        let tenant = self.require_tenant(tenant_id)?;
        let now = self.clock.now();

        let patch = if to_paid {
            PaymentPatch {
                status: Some(PaymentStatus::Paid),
                amount_paid: Some(tenant.contracted_amount(self.config.default_subscription_amount)),
                payment_date: Some(Some(now)),
                ..PaymentPatch::touching(now)
            }
        } else {
            PaymentPatch {
                status: Some(PaymentStatus::Pending),
                amount_paid: Some(0.0),
                payment_date: Some(None),
                receipt: Some(None),
                ..PaymentPatch::touching(now)
            }
        };
        let record = self.upsert(tenant_id, year_month, &patch)?;
        tracing::info!(tenant_id, %year_month, status = %record.status, "Payment status toggled");
        Ok(record)
    }

    /// Upload a receipt for a paid month, replacing any previous one.
    pub fn attach_receipt(
        &self,
        tenant_id: &str,
        year_month: &str,
        upload: ReceiptUpload,
    ) -> Result<MonthlyPayment, ClinicError> {
        let year_month = parse_year_month(year_month)?;
        self.require_tenant(tenant_id)?;

        let existing = self.payments.get_payment(tenant_id, year_month)?;
        let previous = match existing {
            Some(record) if record.status == PaymentStatus::Paid => record.receipt,
            _ => {
                tracing::debug!(tenant_id, %year_month, "Receipt rejected for unpaid period");
                return Err(ClinicError::Validation(format!(
                    "period {year_month} is not paid; receipts can only be attached to paid periods"
                )));
            }
        };

        let receipt = self.upload_receipt(tenant_id, year_month, &upload)?;
        let patch = PaymentPatch {
            receipt: Some(Some(receipt.clone())),
            ..PaymentPatch::touching(self.clock.now())
        };
        let record = self.upsert(tenant_id, year_month, &patch)?;

        if let Some(old) = previous {
            self.discard_replaced(&old, &receipt);
        }
        tracing::info!(tenant_id, %year_month, file = %receipt.name, "Receipt attached");
        Ok(record)
    }

    /// Delete a month's receipt file and clear the reference. Status and
    /// amount stay as they are.
    pub fn remove_receipt(
        &self,
        tenant_id: &str,
        year_month: &str,
    ) -> Result<MonthlyPayment, ClinicError> {
        let year_month = parse_year_month(year_month)?;
        let receipt = self
            .payments
            .get_payment(tenant_id, year_month)?
            .and_then(|p| p.receipt)
            .ok_or_else(|| ClinicError::not_found("Receipt", format!("{tenant_id}/{year_month}")))?;

        match self.blobs.delete(&receipt.url) {
            Ok(()) => {}
            Err(BlobError::NotFound(url)) => {
                tracing::warn!(tenant_id, %year_month, %url, "Receipt file already gone");
            }
            Err(e) => return Err(e.into()),
        }

        let patch = PaymentPatch {
            receipt: Some(None),
            ..PaymentPatch::touching(self.clock.now())
        };
        let record = self.upsert(tenant_id, year_month, &patch)?;
        tracing::info!(tenant_id, %year_month, "Receipt removed");
        Ok(record)
    }

    /// Figures for the current month. Before the activation date only the
    /// tenant counts are reported.
    pub fn summary(&self) -> Result<BillingSummary, ClinicError> {
        let today = self.today();
        let period = YearMonth::from_date(today);
        let tracking_active = today >= self.config.system_activation_date;

        let tenants = self.tenants.list_tenants()?;
        let payments = if tracking_active {
            self.payments.list_payments_for_period(period)?
        } else {
            Vec::new()
        };
        Ok(compute_summary(
            period,
            &tenants,
            &payments,
            self.config.default_subscription_amount,
            tracking_active,
        ))
    }

    fn require_tenant(&self, tenant_id: &str) -> Result<Tenant, ClinicError> {
        self.tenants
            .get_tenant(tenant_id)?
            .ok_or_else(|| ClinicError::not_found("Tenant", tenant_id))
    }

    fn upsert(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
        patch: &PaymentPatch,
    ) -> Result<MonthlyPayment, ClinicError> {
        self.payments
            .upsert_payment(tenant_id, year_month, patch)
            .map_err(|e| {
                tracing::warn!(tenant_id, %year_month, error = %e, "Ledger write failed");
                e.into()
            })
    }

    fn upload_receipt(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
        upload: &ReceiptUpload,
    ) -> Result<Receipt, ClinicError> {
        // tenant ids are free text; encoding keeps distinct ids in distinct directories
        let tenant_dir = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tenant_id);
        let hint = format!("{tenant_dir}/{year_month}");
        let stored = self
            .blobs
            .upload(&upload.bytes, &upload.file_name, &hint)
            .map_err(|e| {
                tracing::warn!(tenant_id, %year_month, error = %e, "Receipt upload failed");
                ClinicError::from(e)
            })?;
        Ok(Receipt {
            url: stored.url,
            name: stored.file_name,
        })
    }

    /// Best effort: the record already points at `new`.
    fn discard_replaced(&self, old: &Receipt, new: &Receipt) {
        if old.url == new.url {
            return;
        }
        if let Err(e) = self.blobs.delete(&old.url) {
            tracing::warn!(url = %old.url, error = %e, "Failed to delete replaced receipt");
        }
    }
}

fn parse_year_month(raw: &str) -> Result<YearMonth, ClinicError> {
    raw.parse().map_err(|e| {
        tracing::debug!(year_month = raw, "Invalid period key");
        ClinicError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::billing::history::RecordSource;
    use crate::blob::{FsBlobStore, StoredBlob};
    use crate::clock::FixedClock;
    use crate::db::SqliteStore;
    use crate::error::ErrorKind;
    use crate::models::Role;
    use chrono::TimeZone;

    struct Fixture {
        ledger: BillingLedger,
        store: Arc<SqliteStore>,
        _blob_dir: tempfile::TempDir,
    }

    fn operator() -> Session {
        Session::new("op-1", "platform", Role::SuperAdmin)
    }

    fn tenant(id: &str, amount: Option<f64>, blocked: bool) -> Tenant {
        Tenant {
            id: id.into(),
            name: format!("Clinic {id}"),
            subscription_amount: amount,
            blocked,
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn fixture_with(now: DateTime<Utc>, blobs: Option<Arc<dyn BlobStore>>) -> Fixture {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store.insert_tenant(&tenant("t-1", None, false)).unwrap();
        store.insert_tenant(&tenant("t-2", Some(320.0), false)).unwrap();
        let blob_dir = tempfile::tempdir().unwrap();
        let blobs: Arc<dyn BlobStore> = match blobs {
            Some(blobs) => blobs,
            None => Arc::new(FsBlobStore::new(blob_dir.path()).unwrap()),
        };
        let ledger = BillingLedger::new(
            &operator(),
            store.clone(),
            store.clone(),
            blobs,
            Arc::new(FixedClock(now)),
            LedgerConfig::default(),
        )
        .unwrap();
        Fixture {
            ledger,
            store,
            _blob_dir: blob_dir,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(at(2026, 1, 15), None)
    }

    fn upload(name: &str, bytes: &[u8]) -> ReceiptUpload {
        ReceiptUpload {
            file_name: name.into(),
            bytes: bytes.to_vec(),
        }
    }

    fn payment(amount: f64, receipt: Option<ReceiptUpload>) -> PaymentInput {
        PaymentInput {
            amount,
            payment_date: None,
            receipt,
        }
    }

    fn blob_path(receipt: &Receipt) -> PathBuf {
        PathBuf::from(receipt.url.trim_start_matches("file://"))
    }

    struct BrokenBlobStore;

    impl BlobStore for BrokenBlobStore {
        fn upload(&self, _: &[u8], _: &str, _: &str) -> Result<StoredBlob, BlobError> {
            Err(BlobError::Io(std::io::Error::other("bucket unavailable")))
        }

        fn delete(&self, _: &str) -> Result<(), BlobError> {
            Err(BlobError::Io(std::io::Error::other("bucket unavailable")))
        }
    }

    #[test]
    fn only_super_admin_opens_the_ledger() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let blob_dir = tempfile::tempdir().unwrap();
        for role in [Role::Admin, Role::Secretaria] {
            let err = BillingLedger::new(
                &Session::new("u-1", "t-1", role),
                store.clone(),
                store.clone(),
                Arc::new(FsBlobStore::new(blob_dir.path()).unwrap()),
                Arc::new(FixedClock(at(2026, 1, 15))),
                LedgerConfig::default(),
            )
            .err()
            .unwrap();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let blob_dir = tempfile::tempdir().unwrap();
        let err = BillingLedger::new(
            &operator(),
            store.clone(),
            store,
            Arc::new(FsBlobStore::new(blob_dir.path()).unwrap()),
            Arc::new(FixedClock(at(2026, 1, 15))),
            LedgerConfig {
                due_day: 0,
                ..LedgerConfig::default()
            },
        )
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn periods_are_stable_across_calls() {
        let fx = fixture();
        let first = fx.ledger.periods();
        assert_eq!(first, fx.ledger.periods());
        assert_eq!(first.len(), 13);
        assert_eq!(first[0].year_month.to_string(), "202612");
    }

    #[test]
    fn rolling_horizon_ends_after_current_month() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let blob_dir = tempfile::tempdir().unwrap();
        let ledger = BillingLedger::new(
            &operator(),
            store.clone(),
            store,
            Arc::new(FsBlobStore::new(blob_dir.path()).unwrap()),
            Arc::new(FixedClock(at(2026, 3, 10))),
            LedgerConfig {
                horizon_end_month: None,
                ..LedgerConfig::default()
            },
        )
        .unwrap();
        let keys: Vec<String> = ledger
            .periods()
            .iter()
            .map(|p| p.year_month.to_string())
            .collect();
        assert_eq!(keys, ["202603", "202602", "202601", "202512"]);
    }

    #[test]
    fn history_is_complete_without_records() {
        let fx = fixture();
        let history = fx.ledger.build_history("t-1").unwrap();
        assert_eq!(history.len(), fx.ledger.periods().len());
        assert!(history.iter().all(|v| v.source == RecordSource::Default
            && v.status == PaymentStatus::Pending
            && v.amount_paid == 0.0
            && v.subscription_amount == 150.0));
    }

    #[test]
    fn history_overlays_records_with_contracted_amount() {
        let fx = fixture();
        fx.ledger
            .register_payment("t-2", "202601", payment(320.0, None))
            .unwrap();
        let history = fx.ledger.build_history("t-2").unwrap();
        assert_eq!(history.len(), 13);
        let january = history
            .iter()
            .find(|v| v.year_month.to_string() == "202601")
            .unwrap();
        assert_eq!(january.status, PaymentStatus::Paid);
        assert_eq!(january.subscription_amount, 320.0);
        assert_eq!(january.last_registered, "15/01/2026");
        assert_eq!(
            history
                .iter()
                .filter(|v| v.source == RecordSource::Persisted)
                .count(),
            1
        );
    }

    #[test]
    fn history_of_unknown_tenant_is_not_found() {
        let fx = fixture();
        let err = fx.ledger.build_history("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn month_thirteen_is_rejected_without_write() {
        let fx = fixture();
        let err = fx
            .ledger
            .register_payment("t-1", "202513", payment(150.0, None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.store.list_payments("t-1").unwrap().is_empty());
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let fx = fixture();
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = fx
                .ledger
                .register_payment("t-1", "202601", payment(amount, None))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(fx.store.list_payments("t-1").unwrap().is_empty());
    }

    #[test]
    fn unknown_tenant_payment_is_not_found() {
        let fx = fixture();
        let err = fx
            .ledger
            .register_payment("ghost", "202601", payment(150.0, None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn second_registration_overwrites_first() {
        let fx = fixture();
        fx.ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("jan.pdf", b"jan"))))
            .unwrap();
        let record = fx
            .ledger
            .register_payment(
                "t-1",
                "202601",
                PaymentInput {
                    amount: 175.5,
                    payment_date: Some(at(2026, 1, 9)),
                    receipt: None,
                },
            )
            .unwrap();

        let stored = fx.store.list_payments("t-1").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], record);
        assert_eq!(record.amount_paid, 175.5);
        assert_eq!(record.payment_date, Some(at(2026, 1, 9)));
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.receipt.as_ref().unwrap().name, "jan.pdf");
    }

    #[test]
    fn payment_date_defaults_to_now() {
        let fx = fixture();
        let record = fx
            .ledger
            .register_payment("t-1", "202601", payment(150.0, None))
            .unwrap();
        assert_eq!(record.payment_date, Some(at(2026, 1, 15)));
        assert_eq!(record.registered_at, at(2026, 1, 15));
    }

    #[test]
    fn stored_record_matches_returned_record_to_the_nanosecond() {
        let now = at(2026, 1, 15) + chrono::Duration::nanoseconds(123_456_789);
        let fx = fixture_with(now, None);
        let record = fx
            .ledger
            .register_payment(
                "t-1",
                "202601",
                PaymentInput {
                    amount: 150.0,
                    payment_date: Some(at(2026, 1, 9) + chrono::Duration::milliseconds(42)),
                    receipt: None,
                },
            )
            .unwrap();
        assert_eq!(record.registered_at, now);
        assert_eq!(fx.store.list_payments("t-1").unwrap(), vec![record]);
    }

    #[test]
    fn failed_upload_writes_nothing() {
        let fx = fixture_with(at(2026, 1, 15), Some(Arc::new(BrokenBlobStore)));
        let err = fx
            .ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("jan.pdf", b"jan"))))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(fx.store.get_payment("t-1", "202601".parse().unwrap()).unwrap().is_none());
    }

    #[test]
    fn new_receipt_replaces_old_file() {
        let fx = fixture();
        let first = fx
            .ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("a.pdf", b"first"))))
            .unwrap();
        let old = first.receipt.unwrap();
        assert!(blob_path(&old).exists());

        let second = fx
            .ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("b.pdf", b"second"))))
            .unwrap();
        let new = second.receipt.unwrap();
        assert_eq!(new.name, "b.pdf");
        assert!(blob_path(&new).exists());
        assert!(!blob_path(&old).exists());
    }

    #[test]
    fn look_alike_tenants_do_not_share_receipt_files() {
        let fx = fixture();
        fx.store.insert_tenant(&tenant("a b", None, false)).unwrap();
        fx.store.insert_tenant(&tenant("ab", None, false)).unwrap();
        let spaced = fx
            .ledger
            .register_payment("a b", "202601", payment(150.0, Some(upload("r.pdf", b"same"))))
            .unwrap()
            .receipt
            .unwrap();
        let plain = fx
            .ledger
            .register_payment("ab", "202601", payment(150.0, Some(upload("r.pdf", b"same"))))
            .unwrap()
            .receipt
            .unwrap();
        assert_ne!(spaced.url, plain.url);

        fx.ledger.remove_receipt("a b", "202601").unwrap();
        assert!(!blob_path(&spaced).exists());
        assert!(blob_path(&plain).exists());
    }

    #[test]
    fn marking_paid_bills_contracted_amount_and_keeps_receipt() {
        let fx = fixture();
        fx.ledger
            .register_payment("t-2", "202601", payment(100.0, Some(upload("jan.pdf", b"jan"))))
            .unwrap();
        let record = fx.ledger.toggle_status("t-2", "202601", true).unwrap();
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.amount_paid, 320.0);
        assert_eq!(record.payment_date, Some(at(2026, 1, 15)));
        assert!(record.receipt.is_some());
    }

    #[test]
    fn marking_paid_without_contract_uses_default_amount() {
        let fx = fixture();
        let record = fx.ledger.toggle_status("t-1", "202602", true).unwrap();
        assert_eq!(record.amount_paid, 150.0);
    }

    #[test]
    fn reverting_clears_receipt_and_amount() {
        let fx = fixture();
        fx.ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("jan.pdf", b"jan"))))
            .unwrap();
        let record = fx.ledger.toggle_status("t-1", "202601", false).unwrap();
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.amount_paid, 0.0);
        assert!(record.payment_date.is_none());
        assert!(record.receipt.is_none());
        assert_eq!(fx.store.list_payments("t-1").unwrap().len(), 1);
    }

    #[test]
    fn receipts_need_a_paid_period() {
        let fx = fixture();
        let err = fx
            .ledger
            .attach_receipt("t-1", "202601", upload("jan.pdf", b"jan"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        fx.ledger.toggle_status("t-1", "202601", false).unwrap();
        let err = fx
            .ledger
            .attach_receipt("t-1", "202601", upload("jan.pdf", b"jan"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn attach_touches_only_receipt_fields() {
        let fx = fixture();
        let paid = fx.ledger.toggle_status("t-2", "202601", true).unwrap();
        let record = fx
            .ledger
            .attach_receipt("t-2", "202601", upload("jan.pdf", b"jan"))
            .unwrap();
        assert_eq!(record.status, paid.status);
        assert_eq!(record.amount_paid, paid.amount_paid);
        assert_eq!(record.payment_date, paid.payment_date);
        assert!(blob_path(record.receipt.as_ref().unwrap()).exists());
    }

    #[test]
    fn remove_receipt_deletes_file_and_reference() {
        let fx = fixture();
        let registered = fx
            .ledger
            .register_payment("t-1", "202601", payment(150.0, Some(upload("jan.pdf", b"jan"))))
            .unwrap();
        let receipt = registered.receipt.unwrap();

        let record = fx.ledger.remove_receipt("t-1", "202601").unwrap();
        assert!(record.receipt.is_none());
        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.amount_paid, 150.0);
        assert!(!blob_path(&receipt).exists());
    }

    #[test]
    fn removing_missing_receipt_is_not_found() {
        let fx = fixture();
        let err = fx.ledger.remove_receipt("t-1", "202601").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        fx.ledger.toggle_status("t-1", "202601", true).unwrap();
        let err = fx.ledger.remove_receipt("t-1", "202601").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn summary_is_zeroed_before_activation() {
        let fx = fixture_with(at(2025, 12, 20), None);
        fx.ledger.toggle_status("t-1", "202512", true).unwrap();
        let summary = fx.ledger.summary().unwrap();
        assert!(!summary.tracking_active);
        assert_eq!(summary.period.to_string(), "202512");
        assert_eq!(summary.total_tenants, 2);
        assert_eq!(summary.paid_this_period, 0);
        assert_eq!(summary.delinquent, 0);
        assert_eq!(summary.estimated_monthly_revenue, 0.0);
    }

    #[test]
    fn summary_counts_current_period_after_activation() {
        let fx = fixture();
        fx.store.insert_tenant(&tenant("t-3", Some(90.0), true)).unwrap();
        fx.ledger.toggle_status("t-1", "202601", true).unwrap();
        fx.ledger.toggle_status("t-2", "202512", true).unwrap();

        let summary = fx.ledger.summary().unwrap();
        assert!(summary.tracking_active);
        assert_eq!(summary.period.to_string(), "202601");
        assert_eq!(summary.total_tenants, 3);
        assert_eq!(summary.blocked_tenants, 1);
        assert_eq!(summary.paid_this_period, 1);
        assert_eq!(summary.delinquent, 1);
        assert_eq!(summary.estimated_monthly_revenue, 470.0);
    }
}
