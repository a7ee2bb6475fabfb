//! Subscription billing: dense monthly periods, the sparse payment records
//! laid over them, and the operator-facing ledger.

pub mod history;
pub mod ledger;
pub mod period;
pub mod summary;
pub mod traits;

pub use history::{merge_history, merge_period, PeriodView, RecordSource};
pub use ledger::{BillingLedger, PaymentInput, ReceiptUpload};
pub use period::{generate_periods, Period};
pub use summary::{compute_summary, BillingSummary};
pub use traits::{PaymentStore, TenantDirectory};
