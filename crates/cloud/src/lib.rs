//! Gridflux Cloud Crate
//!
//! Vendor integration layer over `gridflux-telemetry`: the vendor family
//! catalog, per-integration configuration, payload-to-datum projection, and
//! the sequential windowed poll cycle.
//!
//! # Overview
//!
//! A poll runs one integration at a time, one window at a time:
//!
//! 1. The planner turns `last_tick` + `now` into aligned tick windows
//! 2. Each window is fetched with the vendor family's auth scheme, the
//!    integration's credentials decrypted only for the duration of the call
//! 3. The adapter decodes the response into timestamped payload nodes
//! 4. Property mappings project each node into a normalized [`Datum`],
//!    expressions compiled once through the shared cache
//!
//! Adding a vendor integration means implementing [`VendorAdapter`] and
//! cataloging the family in [`Vendor`]; the cycle itself never changes.
//!
//! [`Datum`]: gridflux_telemetry::models::Datum

pub mod adapter;
pub mod integration;
pub mod poll;
pub mod projection;
pub mod vendor;

// Re-exports
pub use adapter::{PayloadNode, VendorAdapter};
pub use integration::IntegrationConfig;
pub use poll::{PollOutcome, PollService};
pub use projection::{project_datum, RAW_VALUE_VARIABLE};
pub use vendor::solar_edge::SolarEdgeAdapter;
pub use vendor::Vendor;
