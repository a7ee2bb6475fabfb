//! Storage boundaries of the scheduling engine.
//!
//! - AppointmentStore: tenant-scoped appointment persistence
//! - ReferenceDirectory: existence checks for patients and physicians

use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Appointment;

pub trait AppointmentStore: Send + Sync {
    /// All appointments of the tenant, earliest first.
    fn list_appointments(&self, tenant_id: &str) -> Result<Vec<Appointment>, DatabaseError>;

    fn get_appointment(
        &self,
        tenant_id: &str,
        id: &Uuid,
    ) -> Result<Option<Appointment>, DatabaseError>;

    fn insert_appointment(&self, appointment: &Appointment) -> Result<(), DatabaseError>;

    /// Fails with `NotFound` when the appointment does not exist in its tenant.
    fn update_appointment(&self, appointment: &Appointment) -> Result<(), DatabaseError>;

    /// Fails with `NotFound` when the appointment does not exist in the tenant.
    fn delete_appointment(&self, tenant_id: &str, id: &Uuid) -> Result<(), DatabaseError>;
}

pub trait ReferenceDirectory: Send + Sync {
    fn patient_exists(&self, tenant_id: &str, id: &Uuid) -> Result<bool, DatabaseError>;

    fn physician_exists(&self, tenant_id: &str, id: &Uuid) -> Result<bool, DatabaseError>;
}
