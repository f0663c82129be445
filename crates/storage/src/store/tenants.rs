#![forbid(unsafe_code)]

use super::{PipelineStore, StoreError, now_ms};
use bk_core::ids::TenantId;
use rusqlite::{OptionalExtension, params};

impl PipelineStore {
    pub fn tenant_create(&mut self, tenant: &TenantId) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO tenants(tenant, created_at_ms) VALUES (?1, ?2)",
            params![tenant.as_str(), now_ms],
        )?;
        if inserted == 0 {
            return Err(StoreError::TenantExists);
        }
        tx.commit()?;
        Ok(())
    }

    /// Drops the tenant together with all of its records and sequences. A
    /// re-provisioned short-code starts its id sequences over.
    pub fn tenant_remove(&mut self, tenant: &TenantId) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM records WHERE tenant = ?1",
            params![tenant.as_str()],
        )?;
        tx.execute(
            "DELETE FROM sequences WHERE tenant = ?1",
            params![tenant.as_str()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM tenants WHERE tenant = ?1",
            params![tenant.as_str()],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    pub fn tenant_exists(&self, tenant: &TenantId) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM tenants WHERE tenant = ?1",
                params![tenant.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }
}
