//! Gridflux Telemetry Crate
//!
//! Vendor-neutral plumbing for pulling telemetry ("datum") data from
//! third-party cloud energy-monitoring APIs into a normalized time-series
//! model.
//!
//! # Overview
//!
//! Every vendor portal differs in authentication, pagination, reporting
//! granularity, and payload conventions. This crate factors out the three
//! genuinely reusable pieces:
//!
//! - Granularity-aware time bucketing across time zones
//! - Credential-aware authenticated retrieval with secrets encrypted at rest
//! - Cached expression-based field mapping into typed datum properties
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   PollPlanner    | --> |   TickWindow     |  (aligned fetch buckets)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Fetcher      |  (auth + dispatch + audit)
//!                          +------------------+
//!                            |              |
//!                            v              v
//!                   +-------------+  +-------------+
//!                   | AuthScheme  |  | SecretStore |  (transient decryption)
//!                   +-------------+  +-------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ExpressionService|  (content-addressed cache)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |      Datum       |  (normalized time series)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Granularity`] - A named bucketing unit with a fixed or calendar tick
//! - [`TickWindow`] - A `[start, end)` reporting bucket
//! - [`CredentialSet`] - Flat properties with sensitive-key flags
//! - [`PropertyMapping`] - One payload field to one typed datum property
//! - [`Datum`] - The normalized time-series record

pub mod auth;
pub mod errors;
pub mod events;
pub mod expr;
pub mod fetch;
pub mod models;
pub mod secrets;
pub mod tick;

// Re-export all public types from models
pub use models::{
    CalendarPeriod, CredentialSet, Datum, Granularity, PropertyKind, PropertyMapping, TickAmount,
    TickWindow, SECRET_PLACEHOLDER,
};

// Re-export the component entry points
pub use auth::{AuthScheme, HeaderCredential};
pub use errors::{FailureScope, TelemetryError};
pub use events::{AuditEvent, AuditEventSink, MockAuditSink, NoOpAuditSink};
pub use expr::{
    CompiledExpression, CompiledExpressionCache, ExpressionEvaluator, ExpressionService,
    JsonPathEvaluator, NoopExpressionCache, ResultKind, SharedExpressionCache,
};
pub use fetch::{FetchTarget, Fetcher, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use secrets::{ChaChaCipher, SecretStore, SymmetricCipher};
pub use tick::{next_tick, prev_tick, truncate, windows_since, TickWindows};
