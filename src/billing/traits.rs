//! Storage boundaries of the billing ledger.
//!
//! - PaymentStore: sparse monthly payment records, upserted by `(tenant, period)`
//! - TenantDirectory: read-only view of the platform's clinics

use crate::db::DatabaseError;
use crate::models::{MonthlyPayment, PaymentPatch, Tenant, YearMonth};

pub trait PaymentStore: Send + Sync {
    fn list_payments(&self, tenant_id: &str) -> Result<Vec<MonthlyPayment>, DatabaseError>;

    fn list_payments_for_period(
        &self,
        year_month: YearMonth,
    ) -> Result<Vec<MonthlyPayment>, DatabaseError>;

    fn get_payment(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyPayment>, DatabaseError>;

    /// Insert or merge, returning the stored record.
    fn upsert_payment(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
        patch: &PaymentPatch,
    ) -> Result<MonthlyPayment, DatabaseError>;
}

pub trait TenantDirectory: Send + Sync {
    fn list_tenants(&self) -> Result<Vec<Tenant>, DatabaseError>;

    fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>, DatabaseError>;
}
