//! Error types and failure-scope classification for the telemetry crate.
//!
//! This module provides:
//! - [`TelemetryError`]: The main error enum for all telemetry operations
//! - [`FailureScope`]: Classification for determining how far a failure reaches

mod scope;

pub use scope::FailureScope;

use thiserror::Error;

/// Errors that can occur while bucketing, fetching, or mapping telemetry.
///
/// Each variant is classified into a [`FailureScope`] via the
/// [`failure_scope`](Self::failure_scope) method, which determines how much of
/// a poll cycle the failure invalidates.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A granularity definition was malformed or unknown.
    /// Fatal to that one configuration, not the process.
    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    /// Tick navigation was requested for a granularity that cannot support it,
    /// or the arithmetic left the representable date range.
    #[error("Tick navigation failed for granularity '{granularity}': {message}")]
    TickNavigation {
        /// The granularity key the navigation was attempted on
        granularity: String,
        /// What went wrong
        message: String,
    },

    /// An expression source failed to parse.
    /// Fatal to the configuration that authored the expression.
    #[error("Expression parse failed: {message}")]
    ExpressionParse {
        /// The parser's diagnostic
        message: String,
    },

    /// An expression failed at evaluation time (missing field, type mismatch).
    /// Reported per data point; the rest of the batch continues.
    #[error("Expression evaluation failed: {message}")]
    ExpressionEvaluation {
        /// The evaluator's diagnostic
        message: String,
    },

    /// The cipher capability rejected an encrypt/decrypt operation.
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// Stored cipher-text for one credential could not be decrypted.
    /// Indicates configuration corruption, never a transient condition.
    #[error("Decryption failed for credential '{key}': {message}")]
    Decryption {
        /// The credential key whose value was malformed (never the value itself)
        key: String,
        /// What went wrong
        message: String,
    },

    /// A network-level failure while talking to a vendor, timeouts included.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A vendor call failed with a non-2xx response or a transport fault.
    /// Retryable by the caller's polling schedule, never retried internally.
    #[error("Remote call failed: {vendor} {description} (status {status:?})")]
    RemoteCall {
        /// The vendor the call was issued against
        vendor: String,
        /// Caller-supplied description of the call
        description: String,
        /// HTTP status, when the vendor responded at all
        status: Option<u16>,
        /// Transport or vendor diagnostic
        message: String,
    },

    /// A vendor response body could not be decoded into the expected shape.
    #[error("Invalid payload: {message}")]
    InvalidPayload {
        /// The decoder's diagnostic
        message: String,
    },
}

impl TelemetryError {
    /// Returns the failure scope for this error.
    ///
    /// The scope determines how much work a failure invalidates:
    ///
    /// - [`FailureScope::Configuration`]: surface to the operator, skip nothing silently
    /// - [`FailureScope::Window`]: abort the current window, resume from the unadvanced tick
    /// - [`FailureScope::DataPoint`]: report and continue with the rest of the batch
    ///
    /// # Examples
    ///
    /// ```
    /// use gridflux_telemetry::errors::{FailureScope, TelemetryError};
    ///
    /// let error = TelemetryError::Transport("connection reset".to_string());
    /// assert_eq!(error.failure_scope(), FailureScope::Window);
    ///
    /// let error = TelemetryError::ExpressionEvaluation { message: "missing field".to_string() };
    /// assert_eq!(error.failure_scope(), FailureScope::DataPoint);
    /// ```
    pub fn failure_scope(&self) -> FailureScope {
        match self {
            // Configuration corruption - surface immediately
            Self::InvalidGranularity(_)
            | Self::TickNavigation { .. }
            | Self::ExpressionParse { .. }
            | Self::Cipher(_)
            | Self::Decryption { .. } => FailureScope::Configuration,

            // One window's fetch - the next scheduled poll retries the same tick
            Self::Transport(_) | Self::RemoteCall { .. } | Self::InvalidPayload { .. } => {
                FailureScope::Window
            }

            // One property of one datum - batch continues
            Self::ExpressionEvaluation { .. } => FailureScope::DataPoint,
        }
    }
}

impl From<reqwest::Error> for TelemetryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
