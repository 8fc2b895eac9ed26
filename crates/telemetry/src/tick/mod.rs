//! Granularity-aware time bucketing.
//!
//! This module contains:
//! - The tick clock: [`truncate`], [`next_tick`], [`prev_tick`]
//! - The poll planner: [`windows_since`] and its [`TickWindows`] iterator
//!
//! Vendors report in mixed fixed-duration and calendar-based periods across
//! time zones; everything here exists so queries ask for exactly the windows
//! vendors expect and results from different granularities can be chained.

mod clock;
mod planner;

pub use clock::{next_tick, prev_tick, truncate};
pub use planner::{windows_since, TickWindows};
