//! Pure tick-boundary math: truncation and tick navigation.
//!
//! Fixed-duration granularities use epoch-based arithmetic and are
//! zone-independent: a duration that evenly divides a day aligns to UTC
//! midnight, anything else aligns to the epoch. Calendar granularities
//! round local calendar fields in the configured zone, because month and
//! year lengths vary and naive duration arithmetic would drift.

use chrono::{DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::errors::TelemetryError;
use crate::models::{CalendarPeriod, Granularity, TickAmount};

/// Round an instant down to the most recent tick boundary.
///
/// A granularity without a tick amount returns the instant unchanged.
/// Truncation is idempotent: re-truncating a boundary yields itself.
pub fn truncate(instant: DateTime<Utc>, granularity: &Granularity, zone: Tz) -> DateTime<Utc> {
    match granularity.tick() {
        None => instant,
        Some(TickAmount::Fixed(duration)) => truncate_fixed(instant, duration),
        Some(TickAmount::Calendar(period)) => truncate_calendar(instant, period, zone),
    }
}

/// The tick boundary immediately after `tick_start`.
///
/// Fails for a granularity with no tick amount, and on the (practically
/// unreachable) edge of the representable date range.
pub fn next_tick(
    tick_start: DateTime<Utc>,
    granularity: &Granularity,
    zone: Tz,
) -> Result<DateTime<Utc>, TelemetryError> {
    step(tick_start, granularity, zone, 1)
}

/// The tick boundary immediately before `tick_start`.
pub fn prev_tick(
    tick_start: DateTime<Utc>,
    granularity: &Granularity,
    zone: Tz,
) -> Result<DateTime<Utc>, TelemetryError> {
    step(tick_start, granularity, zone, -1)
}

fn step(
    tick_start: DateTime<Utc>,
    granularity: &Granularity,
    zone: Tz,
    direction: i64,
) -> Result<DateTime<Utc>, TelemetryError> {
    let tick = granularity.tick().ok_or_else(|| TelemetryError::TickNavigation {
        granularity: granularity.key().to_string(),
        message: "granularity has no tick amount".to_string(),
    })?;

    match tick {
        TickAmount::Fixed(duration) => tick_start
            .checked_add_signed(duration * direction as i32)
            .ok_or_else(|| out_of_range(granularity)),
        TickAmount::Calendar(period) => {
            let local = tick_start.with_timezone(&zone).naive_local();
            let stepped = match (period, direction >= 0) {
                (CalendarPeriod::Week, true) => local.checked_add_signed(Duration::weeks(1)),
                (CalendarPeriod::Week, false) => local.checked_sub_signed(Duration::weeks(1)),
                (CalendarPeriod::Month, true) => local.checked_add_months(Months::new(1)),
                (CalendarPeriod::Month, false) => local.checked_sub_months(Months::new(1)),
                (CalendarPeriod::Year, true) => local.checked_add_months(Months::new(12)),
                (CalendarPeriod::Year, false) => local.checked_sub_months(Months::new(12)),
            };
            stepped
                .map(|naive| resolve_local(naive, zone))
                .ok_or_else(|| out_of_range(granularity))
        }
    }
}

fn out_of_range(granularity: &Granularity) -> TelemetryError {
    TelemetryError::TickNavigation {
        granularity: granularity.key().to_string(),
        message: "tick arithmetic left the representable date range".to_string(),
    }
}

fn truncate_fixed(instant: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    let millis = duration.num_milliseconds();
    if millis <= 0 {
        return instant;
    }
    let epoch_millis = instant.timestamp_millis();
    let floored = epoch_millis - epoch_millis.rem_euclid(millis);
    Utc.timestamp_millis_opt(floored).single().unwrap_or(instant)
}

fn truncate_calendar(instant: DateTime<Utc>, period: CalendarPeriod, zone: Tz) -> DateTime<Utc> {
    let local_date = instant.with_timezone(&zone).date_naive();
    let origin: NaiveDate = match period {
        CalendarPeriod::Week => local_date.week(Weekday::Mon).first_day(),
        CalendarPeriod::Month => local_date.with_day(1).unwrap_or(local_date),
        CalendarPeriod::Year => {
            NaiveDate::from_ymd_opt(local_date.year(), 1, 1).unwrap_or(local_date)
        }
    };
    resolve_local(origin.and_time(chrono::NaiveTime::MIN), zone)
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous local times (DST fall-back) take the earlier offset. A local
/// time inside a DST gap takes the earliest valid instant after it.
fn resolve_local(naive: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let mut probe = naive;
            for _ in 0..12 {
                probe = probe + Duration::minutes(30);
                if let Some(dt) = zone.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            Utc.from_utc_datetime(&naive)
        }
    }
}
