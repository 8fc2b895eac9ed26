//! Audit event sink trait and implementations.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A structured audit record describing one noteworthy occurrence,
/// typically one vendor call.
///
/// Detail payloads are assembled by the emitter and must never contain
/// decrypted credential material.
#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    /// When the event was recorded.
    pub created: DateTime<Utc>,
    /// Classification tags, e.g. the vendor id and `"error"`.
    pub tags: Vec<String>,
    /// Human-readable description of what happened.
    pub message: String,
    /// Structured context for troubleshooting.
    pub detail: serde_json::Value,
}

impl AuditEvent {
    /// Create an event with no detail payload.
    pub fn new(tags: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            created: Utc::now(),
            tags,
            message: message.into(),
            detail: serde_json::Value::Null,
        }
    }

    /// Attach a structured detail payload.
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }

    /// Whether the event carries a given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Trait for receiving audit events.
///
/// # Design Rules
///
/// - `record()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue events for async processing
/// - Failure to record must not affect the operation being audited (best-effort)
pub trait AuditEventSink: Send + Sync {
    /// Record a single audit event.
    fn record(&self, event: AuditEvent);
}

/// No-op implementation for tests or contexts that don't need auditing.
#[derive(Clone, Default)]
pub struct NoOpAuditSink;

impl AuditEventSink for NoOpAuditSink {
    fn record(&self, _event: AuditEvent) {
        // Intentionally empty - events are discarded
    }
}

/// Mock sink for testing - collects recorded events.
#[derive(Clone, Default)]
pub struct MockAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl AuditEventSink for MockAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpAuditSink;
        sink.record(AuditEvent::new(vec!["SOLAR_EDGE".to_string()], "poll ok"));
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockAuditSink::new();
        assert!(sink.is_empty());

        sink.record(
            AuditEvent::new(
                vec!["SOLAR_EDGE".to_string(), "error".to_string()],
                "site energy",
            )
            .with_detail(json!({"status": 503})),
        );

        assert_eq!(sink.len(), 1);
        let events = sink.events();
        assert!(events[0].has_tag("error"));
        assert_eq!(events[0].detail["status"], 503);

        sink.clear();
        assert!(sink.is_empty());
    }
}
