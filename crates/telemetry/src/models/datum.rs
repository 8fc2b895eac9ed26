use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One normalized time-series record produced by mapping vendor fields.
///
/// Properties are split by kind: instantaneous and accumulating values are
/// numeric, status values are text. A datum with no properties at all is
/// considered empty and is not worth emitting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    /// Timestamp of the reading.
    pub timestamp: DateTime<Utc>,

    /// The datum stream this record belongs to.
    pub source_id: String,

    /// Point-in-time readings.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub instantaneous: BTreeMap<String, Decimal>,

    /// Meter-style running totals.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub accumulating: BTreeMap<String, Decimal>,

    /// Textual state values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub status: BTreeMap<String, String>,
}

impl Datum {
    /// Create a datum with no properties yet.
    pub fn new(timestamp: DateTime<Utc>, source_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            source_id: source_id.into(),
            instantaneous: BTreeMap::new(),
            accumulating: BTreeMap::new(),
            status: BTreeMap::new(),
        }
    }

    /// Set an instantaneous reading.
    pub fn set_instantaneous(&mut self, property: impl Into<String>, value: Decimal) {
        self.instantaneous.insert(property.into(), value);
    }

    /// Set an accumulating reading.
    pub fn set_accumulating(&mut self, property: impl Into<String>, value: Decimal) {
        self.accumulating.insert(property.into(), value);
    }

    /// Set a status value.
    pub fn set_status(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.status.insert(property.into(), value.into());
    }

    /// Whether no property of any kind was mapped.
    pub fn is_empty(&self) -> bool {
        self.instantaneous.is_empty() && self.accumulating.is_empty() && self.status.is_empty()
    }
}
