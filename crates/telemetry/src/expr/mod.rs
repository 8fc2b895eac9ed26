//! Cached expression compilation and evaluation.
//!
//! This module contains:
//! - The [`ExpressionEvaluator`] capability the core consumes
//! - The content-addressed [`CompiledExpressionCache`] and its
//!   shared/no-op implementations
//! - [`ExpressionService`], the compile-through-cache front door
//! - [`JsonPathEvaluator`], the bundled evaluator implementation
//!
//! Compilation is memoized by a one-way hash of the source text so the same
//! user-authored expression is parsed once per process, not once per data
//! point. Evaluation failures are never cached: a transient failure for one
//! payload must not poison the cache for later payloads.

mod cache;
mod jsonpath;

pub use cache::{content_key, CompiledExpressionCache, NoopExpressionCache, SharedExpressionCache};
pub use jsonpath::{JsonPathEvaluator, JsonPathExpression};

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::TelemetryError;

/// The result shape an expression is expected to produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultKind {
    /// A numeric value; numeric strings are acceptable.
    Number,
    /// A textual value; scalars coerce.
    Text,
    /// A boolean value.
    Boolean,
    /// Any JSON value, unchecked.
    Json,
}

/// An opaque compiled expression, produced and consumed by one evaluator.
pub trait CompiledExpression: Send + Sync {
    /// Content hash of the source this expression was compiled from.
    fn source_hash(&self) -> &str;

    /// Downcast hook for the owning evaluator.
    fn as_any(&self) -> &dyn Any;
}

/// Expression evaluator capability.
///
/// The core treats parsing and evaluation as an external service; the
/// bundled [`JsonPathEvaluator`] covers plain field extraction and hosts
/// can inject richer evaluators for derived-value expressions.
pub trait ExpressionEvaluator: Send + Sync {
    /// Parse source text into a compiled expression.
    fn parse(&self, source: &str) -> Result<Arc<dyn CompiledExpression>, TelemetryError>;

    /// Evaluate a compiled expression against a payload root and an ambient
    /// variable map.
    fn evaluate(
        &self,
        compiled: &dyn CompiledExpression,
        root: &Value,
        variables: &BTreeMap<String, Value>,
        expected: ResultKind,
    ) -> Result<Value, TelemetryError>;
}

/// Compile-through-cache front door used by the mapping layer.
#[derive(Clone)]
pub struct ExpressionService {
    evaluator: Arc<dyn ExpressionEvaluator>,
    cache: Arc<dyn CompiledExpressionCache>,
}

impl ExpressionService {
    /// Create a service over an evaluator and a cache capability.
    pub fn new(
        evaluator: Arc<dyn ExpressionEvaluator>,
        cache: Arc<dyn CompiledExpressionCache>,
    ) -> Self {
        Self { evaluator, cache }
    }

    /// A service with the bundled JSONPath evaluator and a fresh shared cache.
    pub fn with_shared_cache(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self::new(evaluator, Arc::new(SharedExpressionCache::new()))
    }

    /// Compile source text, reusing the cached compiled form when the
    /// content hash is already present.
    ///
    /// Concurrent calls for the same uncached source may both compile;
    /// correctness only requires consistent final cache content.
    pub fn compile(&self, source: &str) -> Result<Arc<dyn CompiledExpression>, TelemetryError> {
        let key = content_key(source);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let compiled = self.evaluator.parse(source)?;
        self.cache.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Evaluate a compiled expression. Failures propagate and are never
    /// cached.
    pub fn evaluate(
        &self,
        compiled: &dyn CompiledExpression,
        root: &Value,
        variables: &BTreeMap<String, Value>,
        expected: ResultKind,
    ) -> Result<Value, TelemetryError> {
        self.evaluator.evaluate(compiled, root, variables, expected)
    }
}
