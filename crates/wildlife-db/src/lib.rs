//! # wildlife-db
//!
//! MySQL data layer for the wildlife workbench.
//!
//! This crate provides:
//! - The lazily created shared connection ([`ConnectionProvider`])
//! - A time-bounded cache for read-only queries ([`QueryCache`])
//! - Reference option loading for selection inputs ([`ReferenceLoader`])
//! - The transactional command dispatcher, dashboard procedure access and
//!   scalar report functions, all on [`MySqlStore`]
//! - An in-memory emulation of `wild_db` behind the `memory` feature
//!
//! ## Example
//!
//! ```rust,ignore
//! use wildlife_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("mysql://root@localhost/wild_db").await?;
//!
//!     let species = db.reference.species().await;
//!     for option in species.value {
//!         println!("{}", option.label());
//!     }
//!     Ok(())
//! }
//! ```
pub mod classify;
pub mod dashboard;
pub mod dispatch;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod pool;
pub mod queries;
pub mod query_cache;
pub mod reference;
pub mod rows;
pub mod store;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::sync::Arc;

// Re-export core types
pub use wildlife_core::*;

pub use classify::classify;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryStore;
pub use pool::{create_pool_with_config, log_pool_metrics, ConnectionProvider, PoolConfig};
pub use query_cache::QueryCache;
pub use reference::{options_from_table, ReferenceLoader};
pub use store::MySqlStore;

/// Combined database context: the store, its read cache and the reference
/// loader built on that cache.
#[derive(Clone)]
pub struct Database {
    /// Lazily created shared connection.
    pub provider: Arc<ConnectionProvider>,
    /// Store implementing every workflow trait.
    pub store: Arc<dyn WildlifeStore>,
    /// Read cache in front of the store.
    pub cache: Arc<QueryCache>,
    /// Species, preserve and plan options.
    pub reference: ReferenceLoader,
}

impl Database {
    /// Wire a cache and loader around any store.
    ///
    /// The provider is only used for `close`; stores that are not MySQL
    /// backed can pass a provider that was never connected.
    pub fn with_store(
        provider: Arc<ConnectionProvider>,
        store: Arc<dyn WildlifeStore>,
        cache: QueryCache,
    ) -> Self {
        let cache = Arc::new(cache);
        Self {
            provider,
            store,
            reference: ReferenceLoader::new(cache.clone()),
            cache,
        }
    }

    /// Build the MySQL-backed context without connecting yet.
    pub fn lazy(
        provider: Arc<ConnectionProvider>,
        cache_ttl: std::time::Duration,
        cache_capacity: usize,
    ) -> Self {
        let store = Arc::new(MySqlStore::new(provider.clone()));
        let cache = QueryCache::new(store.clone(), cache_ttl, cache_capacity);
        Self::with_store(provider, store, cache)
    }

    /// Connect with default pool and cache settings.
    ///
    /// Fails with [`Error::Unavailable`] when the server cannot be reached.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_config(database_url, PoolConfig::default()).await
    }

    /// Connect with a custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let provider = Arc::new(ConnectionProvider::new(database_url, config));
        provider.get_connection().await?;
        let store = Arc::new(MySqlStore::new(provider.clone()));
        let cache = QueryCache::with_defaults(store.clone());
        Ok(Self::with_store(provider, store, cache))
    }

    /// Release the shared connection.
    pub async fn close(&self) {
        self.provider.close().await;
    }
}
