use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AppointmentKind, AppointmentStatus};

/// Length of an appointment when no end time is given.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: String,
    /// Absent for walk-ins.
    pub patient_id: Option<Uuid>,
    pub physician_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub value: f64,
    pub notes: String,
}

/// Appointment as entered by the user, before conflict checking.
///
/// `id: None` creates a new appointment, `Some` edits an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub physician_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub kind: AppointmentKind,
    pub status: Option<AppointmentStatus>,
    pub value: f64,
    pub notes: String,
}

impl AppointmentDraft {
    pub fn new(start_time: DateTime<Utc>, kind: AppointmentKind) -> Self {
        Self {
            id: None,
            patient_id: None,
            physician_id: None,
            start_time,
            end_time: None,
            kind,
            status: None,
            value: 0.0,
            notes: String::new(),
        }
    }

    pub fn editing(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn for_patient(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn with_physician(mut self, physician_id: Uuid) -> Self {
        self.physician_id = Some(physician_id);
        self
    }

    pub fn ending_at(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Explicit end time, or start plus the default slot length.
    pub fn resolved_end(&self) -> DateTime<Utc> {
        self.end_time
            .unwrap_or(self.start_time + Duration::minutes(DEFAULT_APPOINTMENT_MINUTES))
    }
}
