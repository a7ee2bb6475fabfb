use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{constraint_error, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Patient, Physician};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, tenant_id, name, phone) VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id.to_string(),
            patient.tenant_id,
            patient.name,
            patient.phone,
        ],
    )
    .map_err(|e| constraint_error("Patient", e))?;
    Ok(())
}

pub fn list_patients(conn: &Connection, tenant_id: &str) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, name, phone FROM patients
         WHERE tenant_id = ?1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![tenant_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        let (id, tenant_id, name, phone) = row?;
        patients.push(Patient {
            id: parse_uuid("patients.id", &id)?,
            tenant_id,
            name,
            phone,
        });
    }
    Ok(patients)
}

pub fn patient_exists(conn: &Connection, tenant_id: &str, id: &Uuid) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE id = ?1 AND tenant_id = ?2",
        params![id.to_string(), tenant_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn insert_physician(conn: &Connection, physician: &Physician) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO physicians (id, tenant_id, name, specialty) VALUES (?1, ?2, ?3, ?4)",
        params![
            physician.id.to_string(),
            physician.tenant_id,
            physician.name,
            physician.specialty,
        ],
    )
    .map_err(|e| constraint_error("Physician", e))?;
    Ok(())
}

pub fn list_physicians(
    conn: &Connection,
    tenant_id: &str,
) -> Result<Vec<Physician>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, name, specialty FROM physicians
         WHERE tenant_id = ?1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![tenant_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut physicians = Vec::new();
    for row in rows {
        let (id, tenant_id, name, specialty) = row?;
        physicians.push(Physician {
            id: parse_uuid("physicians.id", &id)?,
            tenant_id,
            name,
            specialty,
        });
    }
    Ok(physicians)
}

pub fn physician_exists(
    conn: &Connection,
    tenant_id: &str,
    id: &Uuid,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM physicians WHERE id = ?1 AND tenant_id = ?2",
        params![id.to_string(), tenant_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
