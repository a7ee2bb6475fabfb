use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{constraint_error, format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Appointment;

const SELECT_COLUMNS: &str = "SELECT id, tenant_id, patient_id, physician_id, start_time, end_time,
        kind, status, value, notes FROM appointments";

/// Raw column values; converted outside the rusqlite closure so parse
/// failures surface as `DatabaseError` instead of being swallowed.
struct AppointmentRow {
    id: String,
    tenant_id: String,
    patient_id: Option<String>,
    physician_id: Option<String>,
    start_time: String,
    end_time: String,
    kind: String,
    status: String,
    value: f64,
    notes: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        patient_id: row.get(2)?,
        physician_id: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        kind: row.get(6)?,
        status: row.get(7)?,
        value: row.get(8)?,
        notes: row.get(9)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid("appointments.id", &row.id)?,
        tenant_id: row.tenant_id,
        patient_id: row
            .patient_id
            .as_deref()
            .map(|id| parse_uuid("appointments.patient_id", id))
            .transpose()?,
        physician_id: row
            .physician_id
            .as_deref()
            .map(|id| parse_uuid("appointments.physician_id", id))
            .transpose()?,
        start_time: parse_timestamp("appointments.start_time", &row.start_time)?,
        end_time: parse_timestamp("appointments.end_time", &row.end_time)?,
        kind: row.kind.parse()?,
        status: row.status.parse()?,
        value: row.value,
        notes: row.notes,
    })
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments
         (id, tenant_id, patient_id, physician_id, start_time, end_time, kind, status, value, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id.to_string(),
            appt.tenant_id,
            appt.patient_id.map(|id| id.to_string()),
            appt.physician_id.map(|id| id.to_string()),
            format_timestamp(&appt.start_time),
            format_timestamp(&appt.end_time),
            appt.kind.as_str(),
            appt.status.as_str(),
            appt.value,
            appt.notes,
        ],
    )
    .map_err(|e| constraint_error("Appointment", e))?;
    Ok(())
}

/// Overwrite every mutable column of an existing appointment.
pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET
         patient_id = ?1, physician_id = ?2, start_time = ?3, end_time = ?4,
         kind = ?5, status = ?6, value = ?7, notes = ?8
         WHERE id = ?9 AND tenant_id = ?10",
        params![
            appt.patient_id.map(|id| id.to_string()),
            appt.physician_id.map(|id| id.to_string()),
            format_timestamp(&appt.start_time),
            format_timestamp(&appt.end_time),
            appt.kind.as_str(),
            appt.status.as_str(),
            appt.value,
            appt.notes,
            appt.id.to_string(),
            appt.tenant_id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, tenant_id: &str, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointments WHERE id = ?1 AND tenant_id = ?2",
        params![id.to_string(), tenant_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn get_appointment(
    conn: &Connection,
    tenant_id: &str,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND tenant_id = ?2"))?;
    match stmt.query_row(params![id.to_string(), tenant_id], read_row) {
        Ok(row) => appointment_from_row(row).map(Some),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All appointments of a tenant, earliest first.
pub fn list_appointments(
    conn: &Connection,
    tenant_id: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE tenant_id = ?1 ORDER BY start_time ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![tenant_id], read_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row?)?);
    }
    Ok(appointments)
}
