//! Appointment scheduling: slot-conflict detection, status policy, and the
//! tenant-scoped engine that guards every write.

pub mod conflict;
pub mod engine;
pub mod status;
pub mod traits;

pub use conflict::{check_conflict, find_conflict, intervals_conflict};
pub use engine::SchedulingEngine;
pub use status::{StatusPolicy, TerminalDonePolicy, UnrestrictedStatusPolicy};
pub use traits::{AppointmentStore, ReferenceDirectory};
