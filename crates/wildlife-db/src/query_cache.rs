//! Short-lived memoization of read-only queries.
//!
//! Several panels ask for the same reference lists on every refresh. The
//! cache keeps each query's result for a freshness window (60 seconds by
//! default) keyed by the exact query text. Failed queries are never cached
//! and degrade to an empty table plus an error notice.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `QUERY_CACHE_TTL_SECS`: Freshness window in seconds (default: 60)
//! - `QUERY_CACHE_CAPACITY`: Maximum number of cached queries (default: 128)

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

use wildlife_core::defaults::{QUERY_CACHE_CAPACITY, QUERY_CACHE_TTL_SECS};
use wildlife_core::{Notice, Reported, Result, Table, TabularSource};

struct CachedTable {
    table: Arc<Table>,
    stored_at: Instant,
}

/// Time-bounded cache in front of a [`TabularSource`].
pub struct QueryCache {
    source: Arc<dyn TabularSource>,
    entries: Mutex<LruCache<String, CachedTable>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(source: Arc<dyn TabularSource>, ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Cache with the default freshness window and capacity.
    pub fn with_defaults(source: Arc<dyn TabularSource>) -> Self {
        Self::new(
            source,
            Duration::from_secs(QUERY_CACHE_TTL_SECS),
            QUERY_CACHE_CAPACITY,
        )
    }

    /// Cache configured from the environment.
    pub fn from_env(source: Arc<dyn TabularSource>) -> Self {
        let ttl_secs = std::env::var("QUERY_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(QUERY_CACHE_TTL_SECS);
        let capacity = std::env::var("QUERY_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(QUERY_CACHE_CAPACITY);
        Self::new(source, Duration::from_secs(ttl_secs), capacity)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Run a read-only query, degrading to an empty table on failure.
    pub async fn run_query(&self, sql: &str) -> Reported<Arc<Table>> {
        match self.try_query(sql).await {
            Ok(table) => Reported::clean(table),
            Err(e) => {
                error!(
                    subsystem = "database",
                    component = "query_cache",
                    op = "run_query",
                    query = sql,
                    error = %e,
                    "Query failed"
                );
                Reported::with_notice(
                    Arc::new(Table::empty()),
                    Notice::error(format!("Error running query '{}': {}", sql, e)),
                )
            }
        }
    }

    /// Run a read-only query, returning the error instead of degrading.
    pub async fn try_query(&self, sql: &str) -> Result<Arc<Table>> {
        if let Some(table) = self.lookup(sql).await {
            debug!(
                subsystem = "database",
                component = "query_cache",
                query = sql,
                cache_hit = true,
                "Cache HIT"
            );
            return Ok(table);
        }

        debug!(
            subsystem = "database",
            component = "query_cache",
            query = sql,
            cache_hit = false,
            "Cache MISS"
        );
        let table = Arc::new(self.source.fetch_table(sql).await?);
        self.entries.lock().await.put(
            sql.to_string(),
            CachedTable {
                table: table.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(table)
    }

    async fn lookup(&self, sql: &str) -> Option<Arc<Table>> {
        let mut entries = self.entries.lock().await;
        let fresh = entries
            .get(sql)
            .map(|entry| (entry.stored_at.elapsed() < self.ttl, entry.table.clone()));
        match fresh {
            Some((true, table)) => Some(table),
            Some((false, _)) => {
                entries.pop(sql);
                None
            }
            None => None,
        }
    }

    /// Drop every cached result.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        let dropped = entries.len();
        entries.clear();
        debug!(
            subsystem = "database",
            component = "query_cache",
            op = "invalidate_all",
            result_count = dropped,
            "Cache cleared"
        );
    }

    /// Number of cached queries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wildlife_core::{Error, NoticeLevel};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl TabularSource for CountingSource {
        async fn fetch_table(&self, sql: &str) -> Result<Table> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Unavailable("connection refused".to_string()));
            }
            Ok(Table::new(
                vec!["QUERY".to_string(), "CALL".to_string()],
                vec![vec![json!(sql), json!(n)]],
            ))
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    fn cache(source: &Arc<CountingSource>) -> QueryCache {
        QueryCache::new(source.clone(), Duration::from_secs(60), 4)
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_query_is_served_from_cache() {
        let source = Arc::new(CountingSource::default());
        let cache = cache(&source);

        let first = cache.run_query("SELECT SP_ID, SP_NAME FROM species").await;
        let second = cache.run_query("SELECT SP_ID, SP_NAME FROM species").await;

        assert!(first.notices.is_empty());
        assert_eq!(first.value, second.value);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let source = Arc::new(CountingSource::default());
        let cache = cache(&source);

        cache.run_query("SELECT 1").await;
        tokio::time::advance(Duration::from_secs(59)).await;
        cache.run_query("SELECT 1").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        let refreshed = cache.run_query("SELECT 1").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed.value.text(0, "CALL").as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_query_text_is_a_different_key() {
        let source = Arc::new(CountingSource::default());
        let cache = cache(&source);

        cache.run_query("SELECT * FROM species").await;
        cache.run_query("SELECT *  FROM species").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_degrades_to_empty_and_is_not_cached() {
        let source = Arc::new(CountingSource::default());
        source.fail.store(true, Ordering::SeqCst);
        let cache = cache(&source);

        let result = cache.run_query("SELECT * FROM Alerts").await;
        assert!(result.value.is_empty());
        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.notices[0].level, NoticeLevel::Error);
        assert!(result.notices[0]
            .message
            .starts_with("Error running query 'SELECT * FROM Alerts'"));

        source.fail.store(false, Ordering::SeqCst);
        let recovered = cache.run_query("SELECT * FROM Alerts").await;
        assert!(recovered.notices.is_empty());
        assert_eq!(recovered.value.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_all_forces_refetch() {
        let source = Arc::new(CountingSource::default());
        let cache = cache(&source);

        cache.run_query("SELECT 1").await;
        cache.invalidate_all().await;
        assert!(cache.is_empty().await);
        cache.run_query("SELECT 1").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_least_recently_used() {
        let source = Arc::new(CountingSource::default());
        let cache = QueryCache::new(source.clone(), Duration::from_secs(60), 2);

        cache.run_query("A").await;
        cache.run_query("B").await;
        cache.run_query("C").await;
        assert_eq!(cache.len().await, 2);

        cache.run_query("A").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }
}
