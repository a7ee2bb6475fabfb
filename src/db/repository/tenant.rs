use rusqlite::{params, Connection};

use super::constraint_error;
use crate::db::DatabaseError;
use crate::models::Tenant;

pub fn insert_tenant(conn: &Connection, tenant: &Tenant) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO tenants (id, name, subscription_amount, blocked)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            tenant.id,
            tenant.name,
            tenant.subscription_amount,
            tenant.blocked,
        ],
    )
    .map_err(|e| constraint_error("Tenant", e))?;
    Ok(())
}

pub fn get_tenant(conn: &Connection, tenant_id: &str) -> Result<Option<Tenant>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, subscription_amount, blocked FROM tenants WHERE id = ?1",
    )?;
    match stmt.query_row(params![tenant_id], tenant_from_row) {
        Ok(tenant) => Ok(Some(tenant)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_tenants(conn: &Connection) -> Result<Vec<Tenant>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, subscription_amount, blocked FROM tenants ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], tenant_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn set_tenant_blocked(
    conn: &Connection,
    tenant_id: &str,
    blocked: bool,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE tenants SET blocked = ?1 WHERE id = ?2",
        params![blocked, tenant_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Tenant".into(),
            id: tenant_id.into(),
        });
    }
    Ok(())
}

fn tenant_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tenant> {
    Ok(Tenant {
        id: row.get(0)?,
        name: row.get(1)?,
        subscription_amount: row.get(2)?,
        blocked: row.get(3)?,
    })
}
