//! Appointment status transitions.
//!
//! The clinic edits status freely; the policy seam exists so a stricter
//! graph can be swapped in without touching callers.

use crate::models::AppointmentStatus;

pub const INITIAL_STATUS: AppointmentStatus = AppointmentStatus::Pending;

pub trait StatusPolicy: Send + Sync {
    fn can_transition(&self, from: AppointmentStatus, to: AppointmentStatus) -> bool;
}

/// Any status may follow any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnrestrictedStatusPolicy;

impl StatusPolicy for UnrestrictedStatusPolicy {
    fn can_transition(&self, _from: AppointmentStatus, _to: AppointmentStatus) -> bool {
        true
    }
}

/// `Done` is terminal; everything else is unrestricted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDonePolicy;

impl StatusPolicy for TerminalDonePolicy {
    fn can_transition(&self, from: AppointmentStatus, to: AppointmentStatus) -> bool {
        from != AppointmentStatus::Done || to == AppointmentStatus::Done
    }
}
