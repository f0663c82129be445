#![forbid(unsafe_code)]

//! Per-tenant record namespaces: an ordered map from integer id to a
//! field-named JSON payload, plus a monotonic id sequence per namespace.

use super::StoreError;
use bk_core::ids::TenantId;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) const NS_BUCKETS: &str = "buckets";
pub(crate) const NS_TOKENS: &str = "tokens";

pub(crate) fn get<T: DeserializeOwned>(
    conn: &Connection,
    tenant: &TenantId,
    ns: &str,
    id: u64,
) -> Result<Option<T>, StoreError> {
    let payload = conn
        .query_row(
            "SELECT payload FROM records WHERE tenant = ?1 AND ns = ?2 AND id = ?3",
            params![tenant.as_str(), ns, id as i64],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match payload {
        Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        None => Ok(None),
    }
}

pub(crate) fn put<T: Serialize>(
    conn: &Connection,
    tenant: &TenantId,
    ns: &str,
    id: u64,
    record: &T,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(record)?;
    conn.execute(
        r#"
        INSERT INTO records(tenant, ns, id, payload) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(tenant, ns, id) DO UPDATE SET payload=excluded.payload
        "#,
        params![tenant.as_str(), ns, id as i64, payload],
    )?;
    Ok(())
}

pub(crate) fn delete(
    conn: &Connection,
    tenant: &TenantId,
    ns: &str,
    id: u64,
) -> Result<bool, StoreError> {
    let deleted = conn.execute(
        "DELETE FROM records WHERE tenant = ?1 AND ns = ?2 AND id = ?3",
        params![tenant.as_str(), ns, id as i64],
    )?;
    Ok(deleted > 0)
}

/// Ascending id order; ids are monotonic, so this is insertion order. A
/// payload that no longer decodes is logged and skipped rather than failing
/// the whole read.
pub(crate) fn list<T: DeserializeOwned>(
    conn: &Connection,
    tenant: &TenantId,
    ns: &str,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, payload FROM records WHERE tenant = ?1 AND ns = ?2 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![tenant.as_str(), ns], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, payload) = row?;
        match serde_json::from_str(&payload) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(
                    tenant = tenant.as_str(),
                    ns,
                    id,
                    error = %err,
                    "skipping undecodable record"
                );
            }
        }
    }
    Ok(records)
}

/// Monotonic per tenant per namespace; never reset by record deletion.
pub(crate) fn next_sequence(
    conn: &Connection,
    tenant: &TenantId,
    ns: &str,
) -> Result<u64, StoreError> {
    let current: i64 = conn
        .query_row(
            "SELECT value FROM sequences WHERE tenant = ?1 AND ns = ?2",
            params![tenant.as_str(), ns],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    conn.execute(
        r#"
        INSERT INTO sequences(tenant, ns, value) VALUES (?1, ?2, ?3)
        ON CONFLICT(tenant, ns) DO UPDATE SET value=excluded.value
        "#,
        params![tenant.as_str(), ns, next],
    )?;
    Ok(next as u64)
}
