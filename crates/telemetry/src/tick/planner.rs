//! Poll planning: turning "last seen tick" + "now" into fetch windows.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::models::{Granularity, TickWindow};

use super::clock;

/// Compute the windows a poll should request.
///
/// Yields consecutive, non-overlapping `[start, end)` windows starting at
/// `last_tick` and ending at the most recent complete tick at-or-before
/// `now`. The sequence is empty when no new complete tick exists yet, so
/// partial buckets are never fetched.
///
/// On a first poll (`last_tick` is `None`) the result is a single bulk
/// window `[truncate(truncate(now) - lookback), truncate(now))` covering the
/// vendor-configured default lookback.
///
/// An unbucketed granularity yields no windows: it has no complete ticks.
pub fn windows_since(
    last_tick: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    granularity: &Granularity,
    zone: Tz,
    default_lookback: Duration,
) -> TickWindows {
    let horizon = clock::truncate(now, granularity, zone);

    let (cursor, pending) = if !granularity.is_bucketed() {
        (None, None)
    } else {
        match last_tick {
            Some(tick) => (Some(clock::truncate(tick, granularity, zone)), None),
            None => {
                let start = clock::truncate(horizon - default_lookback, granularity, zone);
                let pending =
                    (default_lookback > Duration::zero() && start < horizon).then(|| TickWindow::new(start, horizon));
                (None, pending)
            }
        }
    };

    TickWindows {
        granularity: *granularity,
        zone,
        horizon,
        cursor,
        pending,
    }
}

/// Lazy, finite iterator over the windows of one poll.
///
/// Windows are strictly increasing and contiguous: each window's end is the
/// next window's start.
#[derive(Debug)]
pub struct TickWindows {
    granularity: Granularity,
    zone: Tz,
    horizon: DateTime<Utc>,
    cursor: Option<DateTime<Utc>>,
    pending: Option<TickWindow>,
}

impl Iterator for TickWindows {
    type Item = TickWindow;

    fn next(&mut self) -> Option<TickWindow> {
        if let Some(window) = self.pending.take() {
            return Some(window);
        }

        let start = self.cursor?;
        if start >= self.horizon {
            self.cursor = None;
            return None;
        }

        let end = match clock::next_tick(start, &self.granularity, self.zone) {
            Ok(end) if end > start && end <= self.horizon => end,
            _ => {
                self.cursor = None;
                return None;
            }
        };

        self.cursor = Some(end);
        Some(TickWindow::new(start, end))
    }
}
