//! Role gating for the scheduling engine and the billing ledger.
//!
//! Default-deny: clinic staff (`admin`, `secretaria`) manage their own
//! tenant's schedule; the platform operator (`super_admin`) manages billing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClinicError;
use crate::models::Role;

/// Something a session may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageSchedule,
    ManageBilling,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManageSchedule => f.write_str("manage the appointment schedule"),
            Self::ManageBilling => f.write_str("manage subscription billing"),
        }
    }
}

/// Authenticated caller, as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub tenant_id: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: tenant_id.into(),
            role,
        }
    }
}

pub fn is_allowed(role: Role, capability: Capability) -> bool {
    match (role, capability) {
        (Role::Admin | Role::Secretaria, Capability::ManageSchedule) => true,
        (Role::SuperAdmin, Capability::ManageBilling) => true,
        _ => false,
    }
}

pub fn authorize(session: &Session, capability: Capability) -> Result<(), ClinicError> {
    if is_allowed(session.role, capability) {
        return Ok(());
    }
    tracing::warn!(
        user_id = %session.user_id,
        role = %session.role,
        ?capability,
        "Access denied"
    );
    Err(ClinicError::Forbidden {
        role: session.role,
        capability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn clinic_staff_manage_schedule() {
        assert!(is_allowed(Role::Admin, Capability::ManageSchedule));
        assert!(is_allowed(Role::Secretaria, Capability::ManageSchedule));
    }

    #[test]
    fn only_super_admin_manages_billing() {
        assert!(is_allowed(Role::SuperAdmin, Capability::ManageBilling));
        assert!(!is_allowed(Role::Admin, Capability::ManageBilling));
        assert!(!is_allowed(Role::Secretaria, Capability::ManageBilling));
    }

    #[test]
    fn super_admin_does_not_touch_clinic_schedules() {
        assert!(!is_allowed(Role::SuperAdmin, Capability::ManageSchedule));
    }

    #[test]
    fn denied_session_gets_forbidden() {
        let session = Session::new("u-1", "t-1", Role::Secretaria);
        let err = authorize(&session, Capability::ManageBilling).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(err.to_string().contains("secretaria"));
    }
}
