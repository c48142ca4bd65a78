//! Database connection management.
//!
//! The workbench talks to MySQL through one long-lived handle. The
//! [`ConnectionProvider`] creates it on first use, hands out clones of it
//! afterwards, and closes it on shutdown.

use std::time::{Duration, Instant};

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use wildlife_core::defaults::{DATABASE_URL, DB_CONNECT_TIMEOUT_SECS, DB_MAX_CONNECTIONS};
use wildlife_core::{Error, Result};

/// Default idle timeout in seconds.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Pool configuration options.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Idle connection timeout duration.
    pub idle_timeout: Duration,
    /// Maximum connection lifetime.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DB_MAX_CONNECTIONS,
            min_connections: 1,
            connect_timeout: Duration::from_secs(DB_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the minimum number of connections.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the maximum connection lifetime.
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }
}

/// Open a MySQL pool with custom configuration.
///
/// A failure to connect is reported as [`Error::Unavailable`].
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<MySqlPool> {
    let start = Instant::now();

    info!(
        subsystem = "database",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_secs = config.connect_timeout.as_secs(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Creating database connection pool"
    );

    let mut options = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout);

    if let Some(max_lifetime) = config.max_lifetime {
        options = options.max_lifetime(max_lifetime);
    }

    let pool = options.connect(database_url).await.map_err(|e| {
        error!(
            subsystem = "database",
            component = "pool",
            op = "create",
            error = %e,
            duration_ms = start.elapsed().as_millis() as u64,
            "Error connecting to database"
        );
        Error::Unavailable(format!("Error connecting to database: {}", e))
    })?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "established",
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Log current pool health metrics.
pub fn log_pool_metrics(pool: &MySqlPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(
        subsystem = "database",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool health check"
    );

    if idle == 0 && size > 0 {
        warn!(
            subsystem = "database",
            component = "pool",
            pool_size = size,
            "Shared connection is busy; requests are queueing"
        );
    }
}

/// Lazily created, process-wide database handle.
///
/// The first successful [`get_connection`](Self::get_connection) creates the
/// pool; every later call returns a clone of the same pool. A failed attempt
/// leaves the provider empty so the next call tries again.
#[derive(Debug)]
pub struct ConnectionProvider {
    database_url: String,
    config: PoolConfig,
    pool: OnceCell<MySqlPool>,
}

impl ConnectionProvider {
    pub fn new(database_url: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            database_url: database_url.into(),
            config,
            pool: OnceCell::new(),
        }
    }

    /// Provider configured from `DATABASE_URL` with default pool settings.
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(url, PoolConfig::default())
    }

    /// The shared handle, created on first use.
    pub async fn get_connection(&self) -> Result<MySqlPool> {
        self.pool
            .get_or_try_init(|| create_pool_with_config(&self.database_url, self.config.clone()))
            .await
            .cloned()
    }

    /// Whether the handle has been created and not closed.
    pub fn is_connected(&self) -> bool {
        self.pool.get().map(|p| !p.is_closed()).unwrap_or(false)
    }

    /// Close the handle. Later calls to `get_connection` return a closed pool,
    /// which fails every query with [`Error::Unavailable`].
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            info!(
                subsystem = "database",
                component = "pool",
                op = "close",
                pool_size = pool.size(),
                "Closing database connection"
            );
            pool.close().await;
        }
    }
}
