//! Slot-conflict predicate.
//!
//! A candidate `[start, end)` conflicts with an existing `[s, e)` when either
//! candidate endpoint lies strictly inside `(s, e)`, or the candidate covers
//! the existing slot entirely (`start <= s && end >= e`). Touching slots
//! (`start == e` or `end == s`) never conflict.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Appointment;

pub fn intervals_conflict(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
) -> bool {
    let start_inside = candidate_start > existing_start && candidate_start < existing_end;
    let end_inside = candidate_end > existing_start && candidate_end < existing_end;
    let covers = candidate_start <= existing_start && candidate_end >= existing_end;
    start_inside || end_inside || covers
}

/// First appointment (in slice order) whose slot conflicts with the candidate.
/// `exclude_id` skips the appointment being edited.
pub fn find_conflict<'a>(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    appointments: &'a [Appointment],
    exclude_id: Option<Uuid>,
) -> Option<&'a Appointment> {
    appointments
        .iter()
        .filter(|appt| Some(appt.id) != exclude_id)
        .find(|appt| {
            intervals_conflict(candidate_start, candidate_end, appt.start_time, appt.end_time)
        })
}

pub fn check_conflict(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    appointments: &[Appointment],
    exclude_id: Option<Uuid>,
) -> bool {
    find_conflict(candidate_start, candidate_end, appointments, exclude_id).is_some()
}
