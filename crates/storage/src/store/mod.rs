#![forbid(unsafe_code)]

mod buckets;
mod config;
mod error;
mod records;
mod requests;
mod tenants;
mod tokens;
mod view;

pub use config::{OrphanPolicy, StoreConfig};
pub use error::StoreError;
pub use requests::{ApplyRequest, SaveBucketRequest};
pub use tokens::Advance;

use bk_core::ids::TenantId;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "bucketeer.db";

/// Single-process pipeline store. Opened once by the embedder and passed to
/// whatever surface serves requests; every mutating operation runs inside one
/// transaction scoped to the tenant's namespaces.
#[derive(Debug)]
pub struct PipelineStore {
    conn: Connection,
    config: StoreConfig,
    storage_dir: PathBuf,
}

impl PipelineStore {
    pub fn open(storage_dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        install_schema(&conn)?;

        Ok(Self {
            conn,
            config,
            storage_dir,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS tenants (
          tenant TEXT PRIMARY KEY,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS records (
          tenant TEXT NOT NULL,
          ns TEXT NOT NULL,
          id INTEGER NOT NULL,
          payload TEXT NOT NULL,
          PRIMARY KEY (tenant, ns, id)
        );

        CREATE TABLE IF NOT EXISTS sequences (
          tenant TEXT NOT NULL,
          ns TEXT NOT NULL,
          value INTEGER NOT NULL,
          PRIMARY KEY (tenant, ns)
        );
        "#,
    )?;
    Ok(())
}

pub(crate) fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

pub(crate) fn ensure_tenant(
    conn: &Connection,
    tenant: &TenantId,
    now_ms: i64,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO tenants(tenant, created_at_ms) VALUES (?1, ?2)",
        rusqlite::params![tenant.as_str(), now_ms],
    )?;
    Ok(())
}
