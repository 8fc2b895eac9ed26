//! The seam a vendor integration plugs into.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use gridflux_telemetry::errors::TelemetryError;
use gridflux_telemetry::fetch::{HttpRequest, HttpResponse};
use gridflux_telemetry::models::TickWindow;

use crate::integration::IntegrationConfig;

/// One timestamped payload node extracted from a vendor response.
///
/// The node's `root` is whatever JSON the vendor put in that row; property
/// mappings extract from it.
#[derive(Clone, Debug, PartialEq)]
pub struct PayloadNode {
    pub timestamp: DateTime<Utc>,
    pub root: Value,
}

impl PayloadNode {
    pub fn new(timestamp: DateTime<Utc>, root: Value) -> Self {
        Self { timestamp, root }
    }

    /// Build a node from a row whose timestamp sits in an epoch-seconds
    /// field. Returns `None` when the field is absent or not an integer.
    pub fn from_epoch_field(row: &Value, field: &str) -> Option<Self> {
        let secs = row.get(field)?.as_i64()?;
        let timestamp = Utc.timestamp_opt(secs, 0).single()?;
        Some(Self::new(timestamp, row.clone()))
    }
}

/// Trait for vendor adapters.
///
/// Implement this trait to add support for a new vendor integration. The
/// poll cycle drives it once per tick window: `build_request` shapes the
/// window into the vendor's wire format, `decode` turns the raw response
/// into timestamped payload nodes. Authentication is not the adapter's
/// concern - the fetcher injects credentials per the vendor's scheme.
pub trait VendorAdapter: Send + Sync {
    /// Build the base request for one tick window.
    fn build_request(
        &self,
        integration: &IntegrationConfig,
        window: &TickWindow,
    ) -> Result<HttpRequest, TelemetryError>;

    /// Decode a successful response into payload nodes.
    fn decode(&self, response: &HttpResponse) -> Result<Vec<PayloadNode>, TelemetryError>;
}
