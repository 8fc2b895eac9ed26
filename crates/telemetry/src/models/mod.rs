//! Core value types shared across the telemetry crate.
//!
//! This module contains:
//! - [`Granularity`] and its tick amounts, the named bucketing units
//! - [`TickWindow`], the `[start, end)` buckets produced by planning
//! - [`CredentialSet`], the flat property map with sensitive-key flags
//! - [`PropertyMapping`], the field-to-property projection rules
//! - [`Datum`], the normalized time-series record

mod credentials;
mod datum;
mod granularity;
mod mapping;
mod window;

pub use credentials::{CredentialSet, SECRET_PLACEHOLDER};
pub use datum::Datum;
pub use granularity::{CalendarPeriod, Granularity, TickAmount};
pub use mapping::{PropertyKind, PropertyMapping};
pub use window::TickWindow;
