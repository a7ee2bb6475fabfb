use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::conflict::{self, find_conflict};
use super::status::{StatusPolicy, UnrestrictedStatusPolicy, INITIAL_STATUS};
use super::traits::{AppointmentStore, ReferenceDirectory};
use crate::authorization::{authorize, Capability, Session};
use crate::error::ClinicError;
use crate::models::{Appointment, AppointmentDraft, AppointmentStatus};

const MAX_NOTES_LEN: usize = 2000;

/// Sole mutator of a tenant's appointments. Every write path (form,
/// slot click, drag) runs the same conflict check before touching storage.
pub struct SchedulingEngine {
    tenant_id: String,
    appointments: Arc<dyn AppointmentStore>,
    references: Arc<dyn ReferenceDirectory>,
    status_policy: Box<dyn StatusPolicy>,
}

impl SchedulingEngine {
    pub fn new(
        session: &Session,
        appointments: Arc<dyn AppointmentStore>,
        references: Arc<dyn ReferenceDirectory>,
    ) -> Result<Self, ClinicError> {
        authorize(session, Capability::ManageSchedule)?;
        Ok(Self {
            tenant_id: session.tenant_id.clone(),
            appointments,
            references,
            status_policy: Box::new(UnrestrictedStatusPolicy),
        })
    }

    pub fn with_status_policy(mut self, policy: impl StatusPolicy + 'static) -> Self {
        self.status_policy = Box::new(policy);
        self
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Every appointment of the tenant, earliest first. Windowing is the caller's job.
    pub fn list_appointments(&self) -> Result<Vec<Appointment>, ClinicError> {
        Ok(self.appointments.list_appointments(&self.tenant_id)?)
    }

    /// Whether `[start, end)` collides with any of the tenant's appointments
    /// other than `exclude_id`.
    pub fn check_conflict(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, ClinicError> {
        let existing = self.list_appointments()?;
        Ok(conflict::check_conflict(start, end, &existing, exclude_id))
    }

    /// Create (`draft.id == None`) or edit an appointment.
    pub fn save(&self, draft: AppointmentDraft) -> Result<Appointment, ClinicError> {
        let end_time = draft.resolved_end();
        validate_slot(draft.start_time, end_time)?;
        validate_details(&draft)?;

        let existing = match draft.id {
            Some(id) => Some(self.load(&id)?),
            None => None,
        };
        self.validate_references(&draft)?;

        let status = match (&existing, draft.status) {
            (Some(current), Some(next)) => {
                self.ensure_transition(current.status, next)?;
                next
            }
            (Some(current), None) => current.status,
            (None, Some(status)) => status,
            (None, None) => INITIAL_STATUS,
        };

        self.ensure_free(draft.start_time, end_time, draft.id)?;

        let appointment = Appointment {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            tenant_id: self.tenant_id.clone(),
            patient_id: draft.patient_id,
            physician_id: draft.physician_id,
            start_time: draft.start_time,
            end_time,
            kind: draft.kind,
            status,
            value: draft.value,
            notes: draft.notes,
        };

        if existing.is_some() {
            self.appointments.update_appointment(&appointment)?;
            tracing::info!(
                tenant_id = %self.tenant_id,
                appointment_id = %appointment.id,
                "Appointment updated"
            );
        } else {
            self.appointments.insert_appointment(&appointment)?;
            tracing::info!(
                tenant_id = %self.tenant_id,
                appointment_id = %appointment.id,
                start = %appointment.start_time,
                "Appointment created"
            );
        }
        Ok(appointment)
    }

    /// Move an appointment to a new slot (drag and drop). On conflict nothing
    /// is written and the caller reverts the visual move.
    pub fn reschedule(
        &self,
        id: Uuid,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Appointment, ClinicError> {
        validate_slot(new_start, new_end)?;
        let mut appointment = self.load(&id)?;
        self.ensure_free(new_start, new_end, Some(id))?;

        appointment.start_time = new_start;
        appointment.end_time = new_end;
        self.appointments.update_appointment(&appointment)?;
        tracing::info!(
            tenant_id = %self.tenant_id,
            appointment_id = %id,
            start = %new_start,
            end = %new_end,
            "Appointment rescheduled"
        );
        Ok(appointment)
    }

    pub fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClinicError> {
        let mut appointment = self.load(&id)?;
        self.ensure_transition(appointment.status, status)?;
        appointment.status = status;
        self.appointments.update_appointment(&appointment)?;
        tracing::info!(
            tenant_id = %self.tenant_id,
            appointment_id = %id,
            status = %status,
            "Appointment status changed"
        );
        Ok(appointment)
    }

    /// Permanent removal.
    pub fn delete(&self, id: Uuid) -> Result<(), ClinicError> {
        self.appointments.delete_appointment(&self.tenant_id, &id)?;
        tracing::info!(tenant_id = %self.tenant_id, appointment_id = %id, "Appointment deleted");
        Ok(())
    }

    fn load(&self, id: &Uuid) -> Result<Appointment, ClinicError> {
        self.appointments
            .get_appointment(&self.tenant_id, id)?
            .ok_or_else(|| ClinicError::not_found("Appointment", id))
    }

    fn ensure_free(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ClinicError> {
        let existing = self.list_appointments()?;
        if let Some(hit) = find_conflict(start, end, &existing, exclude_id) {
            tracing::warn!(
                tenant_id = %self.tenant_id,
                conflicting_id = %hit.id,
                %start,
                %end,
                "Slot conflict, nothing written"
            );
            return Err(ClinicError::Conflict {
                conflicting_id: hit.id,
                start: hit.start_time,
                end: hit.end_time,
            });
        }
        Ok(())
    }

    fn ensure_transition(
        &self,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<(), ClinicError> {
        if from == to || self.status_policy.can_transition(from, to) {
            return Ok(());
        }
        Err(ClinicError::Validation(format!(
            "status cannot change from {from} to {to}"
        )))
    }

    fn validate_references(&self, draft: &AppointmentDraft) -> Result<(), ClinicError> {
        if let Some(patient_id) = &draft.patient_id {
            if !self.references.patient_exists(&self.tenant_id, patient_id)? {
                return Err(ClinicError::Validation(format!(
                    "patient {patient_id} does not belong to this clinic"
                )));
            }
        }
        if let Some(physician_id) = &draft.physician_id {
            if !self.references.physician_exists(&self.tenant_id, physician_id)? {
                return Err(ClinicError::Validation(format!(
                    "physician {physician_id} does not belong to this clinic"
                )));
            }
        }
        Ok(())
    }
}

fn validate_slot(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ClinicError> {
    if end <= start {
        return Err(ClinicError::Validation(format!(
            "appointment must end after it starts ({start} to {end})"
        )));
    }
    Ok(())
}

fn validate_details(draft: &AppointmentDraft) -> Result<(), ClinicError> {
    if !draft.value.is_finite() || draft.value < 0.0 {
        return Err(ClinicError::Validation(format!(
            "appointment value must be a non-negative amount, got {}",
            draft.value
        )));
    }
    if draft.notes.chars().count() > MAX_NOTES_LEN {
        return Err(ClinicError::Validation(format!(
            "notes exceed {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(())
}
