//! Test fixtures for database integration tests.
//!
//! Live tests run against a real `wild_db` (tables, procedures, functions
//! and triggers installed) and are skipped when `DATABASE_URL` is not set.
//! Rows created by a test are tracked and deleted again by
//! [`TestDatabase::cleanup`], or on drop when a failed assertion unwinds
//! past it. Alert rows written by triggers are left alone.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wildlife_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let Some(test_db) = TestDatabase::connect().await else { return };
//!     let sp_id = test_db.unique_id("S");
//!     // ... dispatch commands, then:
//!     test_db.track("species", "SP_ID", &sp_id);
//!     test_db.cleanup().await;
//! }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use sqlx::mysql::MySqlPool;

use crate::{ConnectionProvider, Database, PoolConfig, QueryCache};

type TrackedRow = (&'static str, &'static str, String);

/// Database URL documented for local test setups.
pub const DEFAULT_TEST_DATABASE_URL: &str = "mysql://root@localhost:3306/wild_db";

/// The configured live database URL, if any.
pub fn test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty())
}

/// A live database connection plus the rows a test created.
pub struct TestDatabase {
    pub db: Database,
    url: String,
    created: Mutex<Vec<TrackedRow>>,
}

impl TestDatabase {
    /// Connect to `DATABASE_URL`, or return `None` so the caller can skip.
    pub async fn connect() -> Option<Self> {
        let url = test_database_url()?;
        let config = PoolConfig::new()
            .max_connections(2)
            .connect_timeout(Duration::from_secs(10));
        let provider = Arc::new(ConnectionProvider::new(url.clone(), config));
        if let Err(e) = provider.get_connection().await {
            eprintln!("Skipping: database not reachable ({})", e);
            return None;
        }
        let store = Arc::new(crate::MySqlStore::new(provider.clone()));
        // No caching, so assertions always see the database.
        let cache = QueryCache::new(store.clone(), Duration::ZERO, 1);
        Some(Self {
            db: Database::with_store(provider, store, cache),
            url,
            created: Mutex::new(Vec::new()),
        })
    }

    /// A short identifier unlikely to collide with seeded data (`<prefix>T1234`).
    pub fn unique_id(&self, prefix: &str) -> String {
        let nanos = Utc::now().timestamp_subsec_nanos();
        format!("{}T{:04}", prefix, (nanos / 1000) % 10_000)
    }

    /// Remember a row to delete during cleanup.
    pub fn track(&self, table: &'static str, column: &'static str, id: &str) {
        if let Ok(mut created) = self.created.lock() {
            created.push((table, column, id.to_string()));
        }
    }

    /// Rows tracked and not yet deleted.
    pub fn pending(&self) -> usize {
        self.created.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn take_tracked(&self) -> Vec<TrackedRow> {
        match self.created.lock() {
            Ok(mut created) => created.drain(..).rev().collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).rev().collect(),
        }
    }

    /// Delete tracked rows, newest first.
    pub async fn cleanup(&self) {
        let rows = self.take_tracked();
        if let Ok(pool) = self.db.provider.get_connection().await {
            delete_rows(&pool, rows).await;
        }
        self.db.close().await;
    }
}

impl Drop for TestDatabase {
    /// Delete whatever `cleanup` did not get to, on a dedicated runtime so
    /// it also works while a panicking test unwinds.
    fn drop(&mut self) {
        let rows = self.take_tracked();
        if rows.is_empty() {
            return;
        }
        let url = self.url.clone();
        let _ = std::thread::spawn(move || {
            let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            else {
                return;
            };
            runtime.block_on(async move {
                if let Ok(pool) = MySqlPool::connect(&url).await {
                    delete_rows(&pool, rows).await;
                    pool.close().await;
                }
            });
        })
        .join();
    }
}

async fn delete_rows(pool: &MySqlPool, rows: Vec<TrackedRow>) {
    for (table, column, id) in rows {
        let _ = sqlx::query(&format!("DELETE FROM {} WHERE {} = ?", table, column))
            .bind(id)
            .execute(pool)
            .await;
    }
}
