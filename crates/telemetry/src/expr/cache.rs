//! Content-addressed cache for compiled expressions.

use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use super::CompiledExpression;

/// The cache key for an expression source: lowercase-hex SHA-256 of the
/// source bytes.
///
/// Keying by hash rather than source text bounds memory and keeps
/// user-authored source out of the shared cache. Collision resistance
/// across every vendor sharing one cache is assumed from the hash, not
/// proven - an accepted limitation.
pub fn content_key(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// Cache capability for compiled expressions.
///
/// A pure memoization layer: absence of a cache must not change results,
/// only performance. No eviction policy is mandated.
pub trait CompiledExpressionCache: Send + Sync {
    /// Look up a compiled expression by content key.
    fn get(&self, key: &str) -> Option<Arc<dyn CompiledExpression>>;

    /// Store a compiled expression under its content key.
    fn insert(&self, key: String, compiled: Arc<dyn CompiledExpression>);
}

/// Process-wide shared cache, safe for concurrent compile/evaluate callers.
///
/// Reads vastly outnumber writes, so the map is a [`DashMap`] - the read
/// path takes no global lock. Duplicate compilation of the same uncached
/// source under contention is acceptable; both results are identical and
/// the last insert wins.
#[derive(Default)]
pub struct SharedExpressionCache {
    entries: DashMap<String, Arc<dyn CompiledExpression>>,
}

impl SharedExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompiledExpressionCache for SharedExpressionCache {
    fn get(&self, key: &str) -> Option<Arc<dyn CompiledExpression>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn insert(&self, key: String, compiled: Arc<dyn CompiledExpression>) {
        self.entries.insert(key, compiled);
    }
}

/// Always-miss cache, so running without caching is a configuration choice
/// rather than a null check at every call site.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopExpressionCache;

impl CompiledExpressionCache for NoopExpressionCache {
    fn get(&self, _key: &str) -> Option<Arc<dyn CompiledExpression>> {
        None
    }

    fn insert(&self, _key: String, _compiled: Arc<dyn CompiledExpression>) {
        // Intentionally empty - nothing is retained
    }
}
