/// Classification for how far a failure reaches.
///
/// Used to decide how much of a poll cycle an error invalidates.
///
/// # Behavior Summary
///
/// | Scope | Abort Poll Cycle? | Surfaced To |
/// |-------|-------------------|-------------|
/// | `Configuration` | Yes | Operator |
/// | `Window` | Remaining windows only | Poll schedule (retries same tick) |
/// | `DataPoint` | No | Per-point error list |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureScope {
    /// The integration's configuration is broken - corrupt credentials,
    /// an unparseable expression, an unknown granularity.
    ///
    /// Retrying cannot help until an operator fixes the configuration,
    /// so these are surfaced immediately and never silently skipped.
    Configuration,

    /// One window's fetch failed - network fault or a non-2xx vendor response.
    ///
    /// Processing stops at the last fully completed tick so the next
    /// scheduled poll retries the same window. Nothing is retried internally.
    Window,

    /// One property of one data point failed to map.
    ///
    /// The failure is recorded and the rest of the batch continues.
    DataPoint,
}
