use serde::{Deserialize, Serialize};

/// Classification of a datum property.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// A point-in-time reading, e.g. watts.
    Instantaneous,
    /// A meter-style running total, e.g. watt hours.
    Accumulating,
    /// A textual state value, e.g. an operating mode.
    Status,
}

/// Maps one vendor payload field into one typed datum property.
///
/// The `path` extracts a raw value from the payload root; the optional
/// `expression` derives the final value from the extracted one. Both are
/// user-authored source text compiled through the shared expression cache.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Target property name on the datum.
    pub property: String,
    /// Which property map of the datum the value lands in.
    pub kind: PropertyKind,
    /// Extraction path into the vendor payload.
    pub path: String,
    /// Optional converting expression applied to the extracted value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl PropertyMapping {
    /// Mapping for an instantaneous numeric property.
    pub fn instantaneous(property: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            kind: PropertyKind::Instantaneous,
            path: path.into(),
            expression: None,
        }
    }

    /// Mapping for an accumulating numeric property.
    pub fn accumulating(property: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            kind: PropertyKind::Accumulating,
            path: path.into(),
            expression: None,
        }
    }

    /// Mapping for a status text property.
    pub fn status(property: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            kind: PropertyKind::Status,
            path: path.into(),
            expression: None,
        }
    }

    /// Attach a converting expression.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}
