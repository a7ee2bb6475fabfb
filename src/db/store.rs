//! SQLite-backed implementation of every store boundary.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use super::repository as repo;
use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;
use crate::billing::traits::{PaymentStore, TenantDirectory};
use crate::models::{Appointment, MonthlyPayment, PaymentPatch, Patient, Physician, Tenant, YearMonth};
use crate::scheduling::traits::{AppointmentStore, ReferenceDirectory};

/// One connection shared behind a mutex; each call holds the lock for a
/// single repository operation.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(open_memory_database()?))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    pub fn insert_tenant(&self, tenant: &Tenant) -> Result<(), DatabaseError> {
        repo::insert_tenant(&*self.conn()?, tenant)
    }

    pub fn set_tenant_blocked(&self, tenant_id: &str, blocked: bool) -> Result<(), DatabaseError> {
        repo::set_tenant_blocked(&*self.conn()?, tenant_id, blocked)
    }

    pub fn insert_patient(&self, patient: &Patient) -> Result<(), DatabaseError> {
        repo::insert_patient(&*self.conn()?, patient)
    }

    pub fn list_patients(&self, tenant_id: &str) -> Result<Vec<Patient>, DatabaseError> {
        repo::list_patients(&*self.conn()?, tenant_id)
    }

    pub fn insert_physician(&self, physician: &Physician) -> Result<(), DatabaseError> {
        repo::insert_physician(&*self.conn()?, physician)
    }

    pub fn list_physicians(&self, tenant_id: &str) -> Result<Vec<Physician>, DatabaseError> {
        repo::list_physicians(&*self.conn()?, tenant_id)
    }
}

impl AppointmentStore for SqliteStore {
    fn list_appointments(&self, tenant_id: &str) -> Result<Vec<Appointment>, DatabaseError> {
        repo::list_appointments(&*self.conn()?, tenant_id)
    }

    fn get_appointment(
        &self,
        tenant_id: &str,
        id: &Uuid,
    ) -> Result<Option<Appointment>, DatabaseError> {
        repo::get_appointment(&*self.conn()?, tenant_id, id)
    }

    fn insert_appointment(&self, appointment: &Appointment) -> Result<(), DatabaseError> {
        repo::insert_appointment(&*self.conn()?, appointment)
    }

    fn update_appointment(&self, appointment: &Appointment) -> Result<(), DatabaseError> {
        repo::update_appointment(&*self.conn()?, appointment)
    }

    fn delete_appointment(&self, tenant_id: &str, id: &Uuid) -> Result<(), DatabaseError> {
        repo::delete_appointment(&*self.conn()?, tenant_id, id)
    }
}

impl ReferenceDirectory for SqliteStore {
    fn patient_exists(&self, tenant_id: &str, id: &Uuid) -> Result<bool, DatabaseError> {
        repo::patient_exists(&*self.conn()?, tenant_id, id)
    }

    fn physician_exists(&self, tenant_id: &str, id: &Uuid) -> Result<bool, DatabaseError> {
        repo::physician_exists(&*self.conn()?, tenant_id, id)
    }
}

impl PaymentStore for SqliteStore {
    fn list_payments(&self, tenant_id: &str) -> Result<Vec<MonthlyPayment>, DatabaseError> {
        repo::list_monthly_payments(&*self.conn()?, tenant_id)
    }

    fn list_payments_for_period(
        &self,
        year_month: YearMonth,
    ) -> Result<Vec<MonthlyPayment>, DatabaseError> {
        repo::list_payments_for_period(&*self.conn()?, year_month)
    }

    fn get_payment(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyPayment>, DatabaseError> {
        repo::get_monthly_payment(&*self.conn()?, tenant_id, year_month)
    }

    fn upsert_payment(
        &self,
        tenant_id: &str,
        year_month: YearMonth,
        patch: &PaymentPatch,
    ) -> Result<MonthlyPayment, DatabaseError> {
        repo::upsert_monthly_payment(&*self.conn()?, tenant_id, year_month, patch)
    }
}

impl TenantDirectory for SqliteStore {
    fn list_tenants(&self) -> Result<Vec<Tenant>, DatabaseError> {
        repo::list_tenants(&*self.conn()?)
    }

    fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>, DatabaseError> {
        repo::get_tenant(&*self.conn()?, tenant_id)
    }
}
