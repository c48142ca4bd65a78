//! Server configuration from the environment.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use wildlife_core::defaults::{
    DATABASE_URL, DB_CONNECT_TIMEOUT_SECS, DB_MAX_CONNECTIONS, QUERY_CACHE_CAPACITY,
    QUERY_CACHE_TTL_SECS, SERVER_PORT,
};
use wildlife_db::PoolConfig;
use wildlife_geocode::GeocoderConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool: PoolConfig,
    pub host: String,
    pub port: u16,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub geocoder: GeocoderConfig,
    /// CORS origin whitelist, `ALLOWED_ORIGINS` split on commas.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok());
        config.geocoder = GeocoderConfig::from_env();
        config
    }

    /// Build from any variable lookup; unset or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pool = PoolConfig::default()
            .max_connections(parse_or(&lookup, "DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS))
            .connect_timeout(Duration::from_secs(parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                DB_CONNECT_TIMEOUT_SECS,
            )));

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DATABASE_URL.to_string()),
            pool,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", SERVER_PORT),
            cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "QUERY_CACHE_TTL_SECS",
                QUERY_CACHE_TTL_SECS,
            )),
            cache_capacity: parse_or(&lookup, "QUERY_CACHE_CAPACITY", QUERY_CACHE_CAPACITY),
            geocoder: GeocoderConfig::default(),
            allowed_origins,
        }
    }
}

/// Parse straight into the target type so out-of-range values fall back too.
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Ignoring unparsable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.database_url, "mysql://root@localhost/wild_db");
        assert_eq!(config.pool.max_connections, 1);
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "mysql://app@db/wild_db"),
            ("PORT", "8080"),
            ("QUERY_CACHE_TTL_SECS", "5"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]);
        assert_eq!(config.database_url, "mysql://app@db/wild_db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        assert_eq!(config(&[("PORT", "eighty")]).port, 3000);
    }

    #[test]
    fn test_out_of_range_value_falls_back() {
        assert_eq!(config(&[("PORT", "70000")]).port, 3000);
        assert_eq!(config(&[("DB_MAX_CONNECTIONS", "-1")]).pool.max_connections, 1);
        assert_eq!(
            config(&[("DB_MAX_CONNECTIONS", "4294967296")]).pool.max_connections,
            1
        );
    }
}
