use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A `[start, end)` reporting bucket produced by tick bucketing.
///
/// `start` is always a valid tick boundary for the granularity that produced
/// the window, so re-truncating it is a no-op.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TickWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TickWindow {
    /// Create a window. `start` must not be after `end`; the arguments are
    /// swapped if it is, so the ordering invariant always holds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Inclusive start of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The span covered by the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}
