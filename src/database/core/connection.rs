//! Database connection management
//!
//! [`RdsDb`] is the pooled handle every helper in this crate runs on. Pooled
//! connections are configured on checkout-creation with the same pragmas the
//! single-connection wrapper used to apply.

use anyhow::{anyhow, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::alert::{Alerter, TracingAlerter};
use super::schema::{SchemaDefinitions, SchemaManager, SchemaStatus};
use crate::config::RdsConfig;

/// A connection checked out of the pool
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

static MEMORY_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Connection pool tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Connections older than this are closed and replaced
    pub max_lifetime: Option<Duration>,
    /// Upper bound on open connections
    pub max_open: u32,
    /// Connections kept open while idle
    pub max_idle: u32,
    /// How long a connection waits on a locked database
    pub busy_timeout: Duration,
    /// How long a checkout waits for a free connection
    pub connection_timeout: Duration,
}

impl PoolSettings {
    /// Pooling defaults: 15 minute lifetime, 20 open, 4 idle
    pub fn common() -> Self {
        Self {
            max_lifetime: Some(Duration::from_secs(15 * 60)),
            max_open: 20,
            max_idle: 4,
            busy_timeout: Duration::from_secs(5),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// A single connection, no pooling
    pub fn single() -> Self {
        Self::common().single_conn()
    }

    /// Restrict these settings to a single connection
    pub fn single_conn(mut self) -> Self {
        self.max_open = 1;
        self.max_idle = self.max_idle.min(1);
        self
    }

    pub fn from_config(config: &RdsConfig) -> Self {
        let settings = Self {
            max_lifetime: match config.pool_max_lifetime_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            max_open: config.pool_max_open.max(1),
            max_idle: config.pool_max_idle,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            ..Self::common()
        };
        if config.single_conn {
            settings.single_conn()
        } else {
            settings
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::common()
    }
}

/// Snapshot of the pool's connection counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle: u32,
}

/// Pooled SQLite database handle
///
/// Cloning is cheap and clones share the pool. Failures swallowed by the
/// query helpers are reported to the configured [`Alerter`].
#[derive(Clone)]
pub struct RdsDb {
    pool: Pool<SqliteConnectionManager>,
    alerter: Arc<dyn Alerter>,
    settings: PoolSettings,
    host: String,
}

impl RdsDb {
    /// Open a database file with the common pooling defaults
    pub fn connect(path: &str) -> Result<Self> {
        Self::connect_with(path, PoolSettings::common())
    }

    /// Open a database file with explicit pool settings
    pub fn connect_with(path: &str, settings: PoolSettings) -> Result<Self> {
        let busy_timeout = settings.busy_timeout;
        let manager = SqliteConnectionManager::file(path)
            .with_init(move |conn| configure(conn, busy_timeout));
        let db = Self::build(manager, settings)
            .map_err(|e| anyhow!("Failed to open database at '{}': {}", path, e))?;
        info!("opened database at {}", path);
        Ok(db)
    }

    /// Create an in-memory database
    ///
    /// Every call gets a fresh database private to this handle and its clones.
    /// Shared-cache table locks fail immediately instead of honoring the busy
    /// timeout, so the pool holds exactly one connection and concurrent
    /// callers queue on checkout. That connection never expires, which keeps
    /// the data alive.
    pub fn connect_in_memory() -> Result<Self> {
        let id = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:rdskit-mem-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            id
        );
        let settings = PoolSettings {
            max_lifetime: None,
            max_idle: 1,
            ..PoolSettings::single()
        };
        let busy_timeout = settings.busy_timeout;
        let manager = SqliteConnectionManager::file(uri)
            .with_flags(OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI)
            .with_init(move |conn| configure(conn, busy_timeout));
        Self::build(manager, settings)
            .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))
    }

    /// Open the database named by the configuration
    pub fn from_config(config: &RdsConfig) -> Result<Self> {
        let db = Self::connect_with(&config.database, PoolSettings::from_config(config))?;
        Ok(match &config.host {
            Some(host) => db.with_host(host),
            None => db,
        })
    }

    fn build(manager: SqliteConnectionManager, settings: PoolSettings) -> Result<Self> {
        let max_open = settings.max_open.max(1);
        let pool = Pool::builder()
            .max_size(max_open)
            .min_idle(Some(settings.max_idle.min(max_open)))
            .max_lifetime(settings.max_lifetime)
            .connection_timeout(settings.connection_timeout)
            .build(manager)?;

        Ok(Self {
            pool,
            alerter: Arc::new(TracingAlerter),
            settings,
            host: local_hostname(),
        })
    }

    /// Replace the alerting hook
    pub fn with_alerter(mut self, alerter: Arc<dyn Alerter>) -> Self {
        self.alerter = alerter;
        self
    }

    /// Override the host name used for control lookups
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn pool_status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            connections: state.connections,
            idle: state.idle_connections,
        }
    }

    /// Report a failure through the alerting hook
    pub fn alert(&self, message: &str) {
        self.alerter.alert(message);
    }

    /// Check a connection out of the pool
    pub fn conn(&self) -> Result<PooledConn> {
        self.pool
            .get()
            .map_err(|e| anyhow!("Failed to get a pooled connection: {}", e))
    }

    /// Check that the database answers a trivial query
    pub fn ping(&self) -> bool {
        let result = self.conn().and_then(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| anyhow!("Failed to ping database: {}", e))
        });
        match result {
            Ok(_) => true,
            Err(e) => {
                self.alert(&format!("ping failed [{}]", e));
                false
            }
        }
    }

    /// Create the controls and runtime tables if they are missing
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        SchemaManager::new(&conn).initialize()
    }

    pub fn schema_status(&self) -> Result<SchemaStatus> {
        let conn = self.conn()?;
        SchemaManager::new(&conn).check_status()
    }

    /// Drop the controls and runtime tables
    pub fn reset_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        SchemaManager::new(&conn).reset()?;
        info!("dropped controls and runtime tables");
        Ok(())
    }

    /// Row counts of the controls and runtime tables that exist
    pub fn lookup_table_counts(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for table in SchemaDefinitions::REQUIRED_TABLES {
            if self.table_exists(table)? {
                counts.insert(table.to_string(), self.table_count(table)?);
            }
        }
        Ok(counts)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table_name],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;
        Ok(count > 0)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> Result<u64> {
        let conn = self.conn()?;
        let query = format!("SELECT COUNT(*) FROM {}", table_name);
        let count: u64 = conn
            .query_row(&query, [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get table count: {}", e))?;
        Ok(count)
    }
}

/// Per-connection settings, applied when the pool opens a connection
fn configure(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;

    // In-memory databases answer "memory" and stay that way
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    debug!("journal mode: {}", mode);

    conn.execute("PRAGMA synchronous=NORMAL", [])?;
    conn.execute("PRAGMA temp_store=MEMORY", [])?;
    conn.execute("PRAGMA foreign_keys=ON", [])?;
    Ok(())
}

/// The OS host name, or an empty string when it cannot be read
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_default()
}
