use serde::{Deserialize, Serialize};

/// A clinic. Owned by the platform operator; read-only to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub subscription_amount: Option<f64>,
    pub blocked: bool,
}

impl Tenant {
    /// Contracted monthly amount, or `fallback` when none was negotiated.
    pub fn contracted_amount(&self, fallback: f64) -> f64 {
        match self.subscription_amount {
            Some(amount) if amount.is_finite() && amount > 0.0 => amount,
            _ => fallback,
        }
    }
}
