//! # Reporting Math
//!
//! Pure aggregation arithmetic for the Reporting Engine: percent changes,
//! profit margins, and local-calendar-day window computation. The SQL side
//! of reporting lives in brioche-db; everything here is deterministic and
//! division-by-zero safe.
//!
//! ## Percent Semantics
//! Two distinct contracts exist in the dashboard, and they are NOT the same:
//!
//! - `percent_change` returns `None` when the comparison value is zero -
//!   the period report serializes this as `null`, which downstream consumers
//!   must distinguish from "0% change".
//! - `percent_change_or_zero` collapses that `None` to `0.0` - the
//!   today-vs-yesterday stat renders "0%" when yesterday had no revenue.
//!
//! Neither ever yields NaN or infinity.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::money::Money;

// =============================================================================
// Percentages
// =============================================================================

/// Percent change from `previous` to `current`:
/// `(current - previous) / previous * 100`.
///
/// Returns `None` when `previous` is zero (no meaningful comparison), never
/// NaN or infinity.
pub fn percent_change(current: Money, previous: Money) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }
    let cur = current.cents() as f64;
    let prev = previous.cents() as f64;
    Some((cur - prev) / prev * 100.0)
}

/// Percent change for count metrics (transaction counts).
pub fn percent_change_counts(current: i64, previous: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current - previous) as f64 / previous as f64 * 100.0)
}

/// [`percent_change`] with the zero-comparison case collapsed to `0.0`.
pub fn percent_change_or_zero(current: Money, previous: Money) -> f64 {
    percent_change(current, previous).unwrap_or(0.0)
}

/// Profit margin: `net_profit / revenue * 100`, `None` on zero revenue.
pub fn profit_margin(net_profit: Money, revenue: Money) -> Option<f64> {
    if revenue.is_zero() {
        return None;
    }
    Some(net_profit.cents() as f64 / revenue.cents() as f64 * 100.0)
}

/// Average order value in cents: revenue / count, zero when there were no
/// orders. Integer division; sub-cent precision is intentionally dropped.
pub fn average_order_value(revenue: Money, transaction_count: i64) -> Money {
    if transaction_count == 0 {
        return Money::zero();
    }
    Money::from_cents(revenue.cents() / transaction_count)
}

// =============================================================================
// Local-Day Windows
// =============================================================================

/// The calendar date of `instant` in the store's local time, expressed as a
/// fixed UTC offset in minutes.
///
/// Stores keep an IANA timezone label for display, but reporting math runs
/// on the fixed offset; DST transitions shift a day boundary by an hour at
/// most, which the dashboard accepts as approximate.
pub fn local_date(instant: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    (instant + Duration::minutes(utc_offset_minutes as i64)).date_naive()
}

/// Half-open UTC window `[start, end)` covering one local calendar day.
pub fn local_day_window(day: NaiveDate, utc_offset_minutes: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let start = Utc.from_utc_datetime(&midnight) - Duration::minutes(utc_offset_minutes as i64);
    (start, start + Duration::days(1))
}

/// Half-open UTC window covering the trailing `days` local calendar days,
/// ending at the end of today. `days = 1` is just today.
pub fn trailing_days_window(
    now: DateTime<Utc>,
    utc_offset_minutes: i32,
    days: u32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = local_date(now, utc_offset_minutes);
    let first_day = today - Duration::days(days.saturating_sub(1) as i64);
    let (start, _) = local_day_window(first_day, utc_offset_minutes);
    let (_, end) = local_day_window(today, utc_offset_minutes);
    (start, end)
}

/// The window of equal length immediately preceding `[start, end]`.
///
/// The current window is inclusive on both ends; the preceding window is
/// half-open, ending exactly where the current one begins, so no instant is
/// ever counted in both.
pub fn preceding_period(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let length = end - start;
    (start - length, start)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_percent_change_basic() {
        let change = percent_change(cents(15000), cents(10000)).unwrap();
        assert!((change - 50.0).abs() < 1e-9);

        let drop = percent_change(cents(5000), cents(10000)).unwrap();
        assert!((drop + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_zero_previous_is_none() {
        assert_eq!(percent_change(cents(15000), cents(0)), None);
        assert_eq!(percent_change_or_zero(cents(15000), cents(0)), 0.0);
    }

    #[test]
    fn test_percent_change_counts() {
        assert_eq!(percent_change_counts(4, 0), None);
        assert!((percent_change_counts(6, 4).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_profit_margin_guarded() {
        let margin = profit_margin(cents(4000), cents(10000)).unwrap();
        assert!((margin - 40.0).abs() < 1e-9);
        assert_eq!(profit_margin(cents(4000), cents(0)), None);
    }

    #[test]
    fn test_average_order_value() {
        assert_eq!(average_order_value(cents(10000), 4).cents(), 2500);
        assert_eq!(average_order_value(cents(10000), 0).cents(), 0);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 2026-03-10 23:30 UTC at +90 minutes is already March 11 locally.
        let instant = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(
            local_date(instant, 90),
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
        );
        assert_eq!(
            local_date(instant, 0),
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_local_day_window_offset() {
        // Local day at +420 minutes (UTC+7) starts at 17:00 UTC the day before.
        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        let (start, end) = local_day_window(day, 420);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 10, 17, 0, 0).unwrap());
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_trailing_days_window_length() {
        let now = Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap();
        let (start, end) = trailing_days_window(now, 0, 7);
        assert_eq!(end - start, Duration::days(7));
        // Window ends at the end of today, which contains `now`.
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_preceding_period_equal_length_no_overlap() {
        let start = Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        let (prev_start, prev_end) = preceding_period(start, end);

        assert_eq!(prev_end, start);
        assert_eq!(end - start, prev_end - prev_start);
    }
}
