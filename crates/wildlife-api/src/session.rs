//! Per-session interaction state.
//!
//! The only state a session carries across requests is the list of location
//! candidates from its last geocoding search. It is replaced by the next
//! search and discarded by a successful observation submission. Sessions
//! that never submit are evicted least-recently-used first once the store
//! is full.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;

/// Sessions holding candidates at any one time.
pub const SESSION_CAPACITY: usize = 10_000;

/// Identifier of the session a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    location_candidates: Vec<String>,
}

/// Session state keyed by session id.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<LruCache<String, SessionState>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Candidates from the session's last search, empty if none.
    pub async fn candidates(&self, session: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .get(session)
            .map(|s| s.location_candidates.clone())
            .unwrap_or_default()
    }

    /// Store the result of a new search. An empty result forgets the session.
    pub async fn replace_candidates(&self, session: &str, candidates: Vec<String>) {
        let mut sessions = self.inner.lock().await;
        if candidates.is_empty() {
            sessions.pop(session);
        } else {
            sessions.put(
                session.to_string(),
                SessionState {
                    location_candidates: candidates,
                },
            );
        }
    }

    pub async fn clear_candidates(&self, session: &str) {
        self.inner.lock().await.pop(session);
    }

    /// Discard the session's candidates only if they are still `expected`.
    /// A search that replaced them in the meantime is kept.
    pub async fn clear_candidates_if(&self, session: &str, expected: &[String]) -> bool {
        let mut sessions = self.inner.lock().await;
        let unchanged = sessions
            .peek(session)
            .is_some_and(|s| s.location_candidates == expected);
        if unchanged {
            sessions.pop(session);
        }
        unchanged
    }

    /// Number of sessions currently holding candidates.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unknown_session_has_no_candidates() {
        let store = SessionStore::new();
        assert!(store.candidates("nobody").await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_replace_then_clear() {
        let store = SessionStore::new();
        store.replace_candidates("s1", names(&["A", "B"])).await;
        assert_eq!(store.candidates("s1").await, vec!["A", "B"]);

        store.replace_candidates("s1", names(&["C"])).await;
        assert_eq!(store.candidates("s1").await, vec!["C"]);

        store.clear_candidates("s1").await;
        assert!(store.candidates("s1").await.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.replace_candidates("s1", names(&["A"])).await;
        store.replace_candidates("s2", names(&["B"])).await;
        store.clear_candidates("s1").await;
        assert!(store.candidates("s1").await.is_empty());
        assert_eq!(store.candidates("s2").await, vec!["B"]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_cleared_sessions_are_forgotten() {
        let store = SessionStore::new();
        for i in 0..1000 {
            let session = format!("s{}", i);
            store.replace_candidates(&session, names(&["Nairobi, Kenya"])).await;
            store.clear_candidates(&session).await;
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_search_result_is_not_stored() {
        let store = SessionStore::new();
        store.replace_candidates("s1", names(&["A"])).await;
        store.replace_candidates("s1", Vec::new()).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_abandoned_sessions_are_evicted_at_capacity() {
        let store = SessionStore::with_capacity(2);
        store.replace_candidates("s1", names(&["A"])).await;
        store.replace_candidates("s2", names(&["B"])).await;
        store.replace_candidates("s3", names(&["C"])).await;
        assert_eq!(store.len().await, 2);
        assert!(store.candidates("s1").await.is_empty());
        assert_eq!(store.candidates("s3").await, vec!["C"]);
    }

    #[tokio::test]
    async fn test_conditional_clear_keeps_newer_search() {
        let store = SessionStore::new();
        store.replace_candidates("s1", names(&["A"])).await;
        let seen = store.candidates("s1").await;
        store.replace_candidates("s1", names(&["B"])).await;

        assert!(!store.clear_candidates_if("s1", &seen).await);
        assert_eq!(store.candidates("s1").await, vec!["B"]);

        let seen = store.candidates("s1").await;
        assert!(store.clear_candidates_if("s1", &seen).await);
        assert!(store.is_empty().await);
    }
}
