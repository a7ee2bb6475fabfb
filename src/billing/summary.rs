use std::collections::HashSet;

use serde::Serialize;

use crate::models::{MonthlyPayment, PaymentStatus, Tenant, YearMonth};

/// Operator dashboard figures for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub period: YearMonth,
    /// False before the activation date; financial figures are then zero.
    pub tracking_active: bool,
    pub total_tenants: usize,
    pub blocked_tenants: usize,
    /// Active tenants with a paid record for `period`.
    pub paid_this_period: usize,
    /// Active tenants with no paid record for `period`.
    /// `paid_this_period + delinquent` always equals the active tenant count.
    pub delinquent: usize,
    /// Sum of contracted amounts over active tenants.
    pub estimated_monthly_revenue: f64,
}

pub fn compute_summary(
    period: YearMonth,
    tenants: &[Tenant],
    period_payments: &[MonthlyPayment],
    default_amount: f64,
    tracking_active: bool,
) -> BillingSummary {
    let total_tenants = tenants.len();
    let blocked_tenants = tenants.iter().filter(|t| t.blocked).count();

    if !tracking_active {
        return BillingSummary {
            period,
            tracking_active,
            total_tenants,
            blocked_tenants,
            paid_this_period: 0,
            delinquent: 0,
            estimated_monthly_revenue: 0.0,
        };
    }

    let paid: HashSet<&str> = period_payments
        .iter()
        .filter(|p| p.year_month == period && p.status == PaymentStatus::Paid)
        .map(|p| p.tenant_id.as_str())
        .collect();
    let active = || tenants.iter().filter(|t| !t.blocked);

    BillingSummary {
        period,
        tracking_active,
        total_tenants,
        blocked_tenants,
        paid_this_period: active().filter(|t| paid.contains(t.id.as_str())).count(),
        delinquent: active().filter(|t| !paid.contains(t.id.as_str())).count(),
        estimated_monthly_revenue: active().map(|t| t.contracted_amount(default_amount)).sum(),
    }
}
