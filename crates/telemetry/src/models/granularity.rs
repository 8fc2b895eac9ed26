use chrono::Duration;

/// A calendar-based tick amount.
///
/// Calendar periods are zone-dependent: month and year lengths vary, and
/// bucket boundaries fall on local calendar fields rather than fixed offsets
/// from the epoch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CalendarPeriod {
    /// One week, starting Monday (ISO convention).
    Week,
    /// One calendar month, starting on the 1st at local midnight.
    Month,
    /// One calendar year, starting January 1st at local midnight.
    Year,
}

/// The tick amount of a granularity.
///
/// Exactly one of the two shapes applies: a fixed duration (zone-independent
/// epoch arithmetic) or a calendar period (zone-dependent field rounding).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickAmount {
    /// Fixed-length ticks: minutes, hours, days.
    Fixed(Duration),
    /// Calendar ticks: weeks, months, years.
    Calendar(CalendarPeriod),
}

/// A named bucketing unit for vendor reporting periods.
///
/// Granularities are constructed once at startup from a fixed catalog per
/// vendor family and are immutable thereafter. A granularity without a tick
/// amount means "no bucketing" - instants pass through truncation unchanged
/// and tick navigation is undefined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Granularity {
    key: &'static str,
    tick: Option<TickAmount>,
}

impl Granularity {
    /// A granularity with fixed-duration ticks.
    pub fn fixed(key: &'static str, duration: Duration) -> Self {
        Self {
            key,
            tick: Some(TickAmount::Fixed(duration)),
        }
    }

    /// A granularity with calendar-period ticks.
    pub fn calendar(key: &'static str, period: CalendarPeriod) -> Self {
        Self {
            key,
            tick: Some(TickAmount::Calendar(period)),
        }
    }

    /// A granularity with no bucketing at all.
    pub fn passthrough(key: &'static str) -> Self {
        Self { key, tick: None }
    }

    /// Convenience constructor for minute-based ticks.
    pub fn minutes(key: &'static str, count: i64) -> Self {
        Self::fixed(key, Duration::minutes(count))
    }

    /// Convenience constructor for hour-based ticks.
    pub fn hours(key: &'static str, count: i64) -> Self {
        Self::fixed(key, Duration::hours(count))
    }

    /// Convenience constructor for day-based ticks.
    pub fn days(key: &'static str, count: i64) -> Self {
        Self::fixed(key, Duration::days(count))
    }

    /// The stable identifier for this granularity.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The tick amount, if this granularity buckets at all.
    pub fn tick(&self) -> Option<TickAmount> {
        self.tick
    }

    /// Whether instants are bucketed by this granularity.
    pub fn is_bucketed(&self) -> bool {
        self.tick.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_granularity_carries_duration() {
        let g = Granularity::minutes("15min", 15);
        assert_eq!(g.key(), "15min");
        assert_eq!(g.tick(), Some(TickAmount::Fixed(Duration::minutes(15))));
        assert!(g.is_bucketed());
    }

    #[test]
    fn test_calendar_granularity_carries_period() {
        let g = Granularity::calendar("month", CalendarPeriod::Month);
        assert_eq!(g.tick(), Some(TickAmount::Calendar(CalendarPeriod::Month)));
    }

    #[test]
    fn test_passthrough_granularity_has_no_tick() {
        let g = Granularity::passthrough("latest");
        assert_eq!(g.tick(), None);
        assert!(!g.is_bucketed());
    }
}
