use rusqlite::{params, Connection};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{MonthlyPayment, PaymentPatch, Receipt, YearMonth};

const SELECT_COLUMNS: &str = "SELECT tenant_id, year_month, status, amount_paid, payment_date,
        receipt_url, receipt_name, registered_at FROM monthly_payments";

struct PaymentRow {
    tenant_id: String,
    year_month: String,
    status: String,
    amount_paid: f64,
    payment_date: Option<String>,
    receipt_url: Option<String>,
    receipt_name: Option<String>,
    registered_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentRow> {
    Ok(PaymentRow {
        tenant_id: row.get(0)?,
        year_month: row.get(1)?,
        status: row.get(2)?,
        amount_paid: row.get(3)?,
        payment_date: row.get(4)?,
        receipt_url: row.get(5)?,
        receipt_name: row.get(6)?,
        registered_at: row.get(7)?,
    })
}

fn payment_from_row(row: PaymentRow) -> Result<MonthlyPayment, DatabaseError> {
    let year_month: YearMonth =
        row.year_month
            .parse()
            .map_err(|_| DatabaseError::InvalidValue {
                field: "monthly_payments.year_month".into(),
                value: row.year_month.clone(),
            })?;
    let receipt = match row.receipt_url {
        Some(url) => {
            let name = row.receipt_name.unwrap_or_default();
            Some(Receipt { url, name })
        }
        None => None,
    };
    Ok(MonthlyPayment {
        tenant_id: row.tenant_id,
        year_month,
        status: row.status.parse()?,
        amount_paid: row.amount_paid,
        payment_date: row
            .payment_date
            .as_deref()
            .map(|d| parse_timestamp("monthly_payments.payment_date", d))
            .transpose()?,
        receipt,
        registered_at: parse_timestamp("monthly_payments.registered_at", &row.registered_at)?,
    })
}

fn collect_payments(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> Result<Vec<MonthlyPayment>, DatabaseError> {
    let rows = stmt.query_map(params, read_row)?;
    let mut payments = Vec::new();
    for row in rows {
        payments.push(payment_from_row(row?)?);
    }
    Ok(payments)
}

pub fn get_monthly_payment(
    conn: &Connection,
    tenant_id: &str,
    year_month: YearMonth,
) -> Result<Option<MonthlyPayment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE tenant_id = ?1 AND year_month = ?2"
    ))?;
    match stmt.query_row(params![tenant_id, year_month.to_string()], read_row) {
        Ok(row) => payment_from_row(row).map(Some),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All persisted payment records of a tenant, oldest period first.
pub fn list_monthly_payments(
    conn: &Connection,
    tenant_id: &str,
) -> Result<Vec<MonthlyPayment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE tenant_id = ?1 ORDER BY year_month ASC"
    ))?;
    collect_payments(&mut stmt, params![tenant_id])
}

/// Payment records of every tenant for one period.
pub fn list_payments_for_period(
    conn: &Connection,
    year_month: YearMonth,
) -> Result<Vec<MonthlyPayment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE year_month = ?1 ORDER BY tenant_id ASC"
    ))?;
    collect_payments(&mut stmt, params![year_month.to_string()])
}

/// Insert-or-merge the record keyed by `(tenant_id, year_month)` and return
/// the stored result. Last write wins on the fields the patch sets.
pub fn upsert_monthly_payment(
    conn: &Connection,
    tenant_id: &str,
    year_month: YearMonth,
    patch: &PaymentPatch,
) -> Result<MonthlyPayment, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let existing = get_monthly_payment(&tx, tenant_id, year_month)?;
    let record = patch.apply(tenant_id, year_month, existing);
    let (receipt_url, receipt_name) = match &record.receipt {
        Some(receipt) => (Some(receipt.url.as_str()), Some(receipt.name.as_str())),
        None => (None, None),
    };

    tx.execute(
        "INSERT INTO monthly_payments
         (tenant_id, year_month, status, amount_paid, payment_date, receipt_url, receipt_name, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(tenant_id, year_month) DO UPDATE SET
             status = excluded.status,
             amount_paid = excluded.amount_paid,
             payment_date = excluded.payment_date,
             receipt_url = excluded.receipt_url,
             receipt_name = excluded.receipt_name,
             registered_at = excluded.registered_at",
        params![
            record.tenant_id,
            year_month.to_string(),
            record.status.as_str(),
            record.amount_paid,
            record.payment_date.as_ref().map(format_timestamp),
            receipt_url,
            receipt_name,
            format_timestamp(&record.registered_at),
        ],
    )?;

    tx.commit()?;
    Ok(record)
}
