//! The per-integration poll cycle.
//!
//! Windows within one integration are processed sequentially and in order -
//! vendor APIs are rate-sensitive, and resumption bookkeeping depends on
//! ticks completing front to back. Integrations themselves run on
//! independent workers; nothing here blocks another integration's poll.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use gridflux_telemetry::errors::{FailureScope, TelemetryError};
use gridflux_telemetry::expr::ExpressionService;
use gridflux_telemetry::fetch::{FetchTarget, Fetcher};
use gridflux_telemetry::models::Datum;
use gridflux_telemetry::tick::windows_since;

use crate::adapter::VendorAdapter;
use crate::integration::IntegrationConfig;
use crate::projection::project_datum;

/// What one poll cycle produced.
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// Datum records gathered across the completed windows.
    pub datums: Vec<Datum>,
    /// The end of the last fully processed window. Feed this back as
    /// `last_tick` on the next poll; an aborted window leaves it unadvanced
    /// so that tick is retried.
    pub last_completed_tick: Option<DateTime<Utc>>,
    /// Window- and data-point-scoped failures encountered along the way.
    pub errors: Vec<TelemetryError>,
}

/// Drives the poll cycle: plan windows, fetch each one authenticated,
/// project payloads into datums through the shared expression cache.
#[derive(Clone)]
pub struct PollService {
    fetcher: Fetcher,
    expressions: ExpressionService,
}

impl PollService {
    pub fn new(fetcher: Fetcher, expressions: ExpressionService) -> Self {
        Self {
            fetcher,
            expressions,
        }
    }

    /// Run one poll for one integration.
    ///
    /// Cancellation is cooperative: the flag is checked between windows,
    /// never mid-flight. A window fetch failure stops the cycle at the last
    /// fully processed tick and is reported in the outcome; the next
    /// scheduled poll retries from there. Configuration-scoped failures
    /// (corrupt credentials, unparseable mappings, unknown granularity)
    /// surface immediately as the cycle's error.
    pub async fn run_poll(
        &self,
        adapter: &dyn VendorAdapter,
        integration: &IntegrationConfig,
        last_tick: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        cancel: &AtomicBool,
    ) -> Result<PollOutcome, TelemetryError> {
        let granularity = integration.granularity()?;
        let auth = integration.vendor.auth_scheme();
        let vendor = integration.vendor.id();

        let mut outcome = PollOutcome {
            last_completed_tick: last_tick,
            ..PollOutcome::default()
        };

        for window in windows_since(
            last_tick,
            now,
            &granularity,
            integration.zone,
            integration.lookback(),
        ) {
            if cancel.load(Ordering::Relaxed) {
                debug!("{vendor} {}: poll cancelled between windows", integration.id);
                break;
            }

            let target = FetchTarget {
                vendor,
                auth: &auth,
                credentials: &integration.credentials,
            };
            let fetched = self
                .fetcher
                .get(
                    &integration.source_id,
                    target,
                    || adapter.build_request(integration, &window),
                    |response| adapter.decode(response),
                )
                .await;

            let nodes = match fetched {
                Ok(nodes) => nodes,
                Err(err) if err.failure_scope() == FailureScope::Configuration => return Err(err),
                Err(err) => {
                    warn!("{vendor} {}: window aborted: {err}", integration.id);
                    outcome.errors.push(err);
                    break;
                }
            };

            for node in nodes {
                let (datum, errors) = project_datum(
                    node.timestamp,
                    &integration.source_id,
                    &node.root,
                    &integration.mappings,
                    &integration.variables,
                    &self.expressions,
                )?;
                if !datum.is_empty() {
                    outcome.datums.push(datum);
                }
                outcome.errors.extend(errors);
            }

            outcome.last_completed_tick = Some(window.end());
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::tests::solar_edge_integration;
    use crate::vendor::solar_edge::SolarEdgeAdapter;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use gridflux_telemetry::events::MockAuditSink;
    use gridflux_telemetry::expr::JsonPathEvaluator;
    use gridflux_telemetry::fetch::{HttpRequest, HttpResponse, HttpTransport};
    use gridflux_telemetry::secrets::{ChaChaCipher, SecretStore};
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct QueuedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, TelemetryError>>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl QueuedTransport {
        fn new(replies: Vec<Result<HttpResponse, TelemetryError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for QueuedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TelemetryError> {
            self.sent.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::ok(r#"{"measurements": []}"#)))
        }
    }

    fn secret_store() -> SecretStore {
        SecretStore::new(Arc::new(ChaChaCipher::new([5u8; 32])))
    }

    fn service(transport: Arc<QueuedTransport>, sink: &MockAuditSink) -> PollService {
        let fetcher = Fetcher::new(transport, secret_store(), Arc::new(sink.clone()));
        let expressions = ExpressionService::with_shared_cache(Arc::new(JsonPathEvaluator::new()));
        PollService::new(fetcher, expressions)
    }

    fn measurements(ts: i64, power: f64) -> String {
        format!(r#"{{"measurements": [{{"ts": {ts}, "power": {power}}}]}}"#)
    }

    fn stored_integration() -> IntegrationConfig {
        let mut integration = solar_edge_integration();
        integration.credentials = secret_store().encrypt(&integration.credentials).unwrap();
        integration
    }

    #[tokio::test]
    async fn test_poll_projects_datums_across_windows() {
        // Two complete 15-minute ticks between last_tick 00:30 and now 01:05.
        let transport = QueuedTransport::new(vec![
            Ok(HttpResponse::ok(measurements(1704069000, 850.0))), // 00:30
            Ok(HttpResponse::ok(measurements(1704069900, 900.0))), // 00:45
        ]);
        let sink = MockAuditSink::new();
        let service = service(transport.clone(), &sink);
        let integration = stored_integration();

        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 1, 5, 0).unwrap();
        let outcome = service
            .run_poll(
                &SolarEdgeAdapter,
                &integration,
                Some(last),
                now,
                &AtomicBool::new(false),
            )
            .await
            .unwrap();

        assert_eq!(outcome.datums.len(), 2);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.datums[0].instantaneous.get("watts"), Some(&dec!(850.0)));
        assert_eq!(
            outcome.last_completed_tick,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap())
        );
        assert_eq!(transport.sent_count(), 2);
        // One audit event per dispatched call.
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_window_failure_stops_at_last_completed_tick() {
        let transport = QueuedTransport::new(vec![
            Ok(HttpResponse::ok(measurements(1704069000, 850.0))),
            Err(TelemetryError::Transport("connection reset".to_string())),
        ]);
        let sink = MockAuditSink::new();
        let service = service(transport.clone(), &sink);
        let integration = stored_integration();

        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 1, 5, 0).unwrap();
        let outcome = service
            .run_poll(
                &SolarEdgeAdapter,
                &integration,
                Some(last),
                now,
                &AtomicBool::new(false),
            )
            .await
            .unwrap();

        // The first window landed; the failed second window left the tick
        // unadvanced so the next poll retries it.
        assert_eq!(outcome.datums.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.last_completed_tick,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 45, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_cancellation_checked_before_each_window() {
        let transport = QueuedTransport::new(vec![]);
        let sink = MockAuditSink::new();
        let service = service(transport.clone(), &sink);
        let integration = stored_integration();

        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 1, 5, 0).unwrap();
        let outcome = service
            .run_poll(
                &SolarEdgeAdapter,
                &integration,
                Some(last),
                now,
                &AtomicBool::new(true),
            )
            .await
            .unwrap();

        assert!(outcome.datums.is_empty());
        assert_eq!(outcome.last_completed_tick, Some(last));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_credentials_abort_the_cycle() {
        let transport = QueuedTransport::new(vec![]);
        let sink = MockAuditSink::new();
        let service = service(transport.clone(), &sink);
        let mut integration = solar_edge_integration();
        integration.credentials = gridflux_telemetry::models::CredentialSet::new()
            .with_secret(crate::vendor::solar_edge::API_KEY, "enc:v1:AAAA");

        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 1, 5, 0).unwrap();
        let err = service
            .run_poll(
                &SolarEdgeAdapter,
                &integration,
                Some(last),
                now,
                &AtomicBool::new(false),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TelemetryError::Decryption { .. }));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_first_poll_uses_default_lookback() {
        let transport = QueuedTransport::new(vec![Ok(HttpResponse::ok(
            r#"{"measurements": []}"#.to_string(),
        ))]);
        let sink = MockAuditSink::new();
        let service = service(transport.clone(), &sink);
        let integration = stored_integration();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 47, 0).unwrap();
        let outcome = service
            .run_poll(
                &SolarEdgeAdapter,
                &integration,
                None,
                now,
                &AtomicBool::new(false),
            )
            .await
            .unwrap();

        // One bulk window covering the vendor's one-hour lookback.
        assert_eq!(transport.sent_count(), 1);
        assert_eq!(
            outcome.last_completed_tick,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 45, 0).unwrap())
        );
    }
}
