//! Per-integration configuration.

use std::collections::BTreeMap;

use chrono::Duration;
use chrono_tz::Tz;
use serde_json::Value;

use gridflux_telemetry::errors::TelemetryError;
use gridflux_telemetry::models::{CredentialSet, Granularity, PropertyMapping};
use gridflux_telemetry::secrets::SecretStore;

use crate::vendor::Vendor;

/// Everything one vendor integration needs to poll: identity, endpoint,
/// credentials at rest, reporting granularity, and the property mappings
/// that project payloads into datum streams.
///
/// Constructed once per integration setup and treated as immutable by the
/// poll cycle.
#[derive(Clone, Debug)]
pub struct IntegrationConfig {
    /// Stable identifier of this integration.
    pub id: String,
    /// The vendor family this integration talks to.
    pub vendor: Vendor,
    /// The datum stream produced records belong to.
    pub source_id: String,
    /// Endpoint the adapter builds requests against.
    pub endpoint: String,
    /// Credentials at rest; sensitive values hold cipher-text.
    pub credentials: CredentialSet,
    /// Key into the vendor's granularity catalog.
    pub granularity_key: String,
    /// Zone for calendar-period bucketing.
    pub zone: Tz,
    /// Override of the vendor's default first-poll lookback.
    pub lookback: Option<Duration>,
    /// Field-to-property projection rules.
    pub mappings: Vec<PropertyMapping>,
    /// Ambient variables handed to converting expressions.
    pub variables: BTreeMap<String, Value>,
}

impl IntegrationConfig {
    /// Resolve the configured granularity against the vendor catalog.
    pub fn granularity(&self) -> Result<Granularity, TelemetryError> {
        self.vendor.granularity(&self.granularity_key).ok_or_else(|| {
            TelemetryError::InvalidGranularity(format!(
                "'{}' is not in the {} catalog",
                self.granularity_key,
                self.vendor.id()
            ))
        })
    }

    /// The first-poll lookback: the configured override, or the vendor default.
    pub fn lookback(&self) -> Duration {
        self.lookback.unwrap_or_else(|| self.vendor.default_lookback())
    }

    /// The credential set in display form, sensitive values masked.
    pub fn display_credentials(&self, secrets: &SecretStore) -> CredentialSet {
        secrets.mask(&self.credentials)
    }
}
