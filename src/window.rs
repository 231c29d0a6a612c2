//! Publication-window resolution for the time-series providers.
//!
//! Each provider family publishes on its own fixed cadence and becomes
//! queryable only some minutes after publication. Given the current KST
//! wall-clock time these resolvers pick the newest window that is already
//! available; repeated calls inside one publication interval return the
//! identical window.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Asia::Seoul;

/// The "as-of" parameter pair sent to a time-series provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastWindow {
    pub base_date: NaiveDate,
    pub base_time: String,
}

impl ForecastWindow {
    /// Query value for the `base_date` parameter (`yyyyMMdd`).
    #[must_use]
    pub fn date_param(&self) -> String {
        self.base_date.format("%Y%m%d").to_string()
    }

    /// Query value for the `base_time` parameter.
    #[must_use]
    pub fn time_param(&self) -> &str {
        &self.base_time
    }

    /// Combined stamp used by the living-index providers (`yyyyMMddHH`).
    #[must_use]
    pub fn stamp_param(&self) -> String {
        format!("{}{}", self.date_param(), self.base_time)
    }
}

/// Current wall-clock time in the provider's zone.
#[must_use]
pub fn now_seoul() -> NaiveDateTime {
    Utc::now().with_timezone(&Seoul).naive_local()
}

/// Short-range forecast publication hours (KST).
const VILLAGE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Window for the short-range (village) forecast.
///
/// Published at the fixed hours above, queryable roughly ten minutes later.
/// Before 02:00 the previous day's 23:00 issue is the newest one available.
#[must_use]
pub fn village_window(now: NaiveDateTime) -> ForecastWindow {
    let now = if now.minute() < 10 {
        now - Duration::hours(1)
    } else {
        now
    };

    let hour = now.hour();
    if hour < 2 {
        return ForecastWindow {
            base_date: now.date() - Duration::days(1),
            base_time: "2300".to_string(),
        };
    }

    let base_hour = VILLAGE_HOURS
        .iter()
        .rev()
        .find(|&&h| hour >= h)
        .copied()
        .unwrap_or(23);

    ForecastWindow {
        base_date: now.date(),
        base_time: format!("{base_hour:02}00"),
    }
}

/// Window for the ultra-short-range forecast.
///
/// Published every hour at minute 30, queryable shortly after minute 45.
#[must_use]
pub fn ultra_window(now: NaiveDateTime) -> ForecastWindow {
    let now = if now.minute() < 45 {
        now - Duration::hours(1)
    } else {
        now
    };

    ForecastWindow {
        base_date: now.date(),
        base_time: format!("{:02}30", now.hour()),
    }
}

/// Window for the living-index providers (UV, pollen).
///
/// Published twice daily at 06 and 18 KST; before 06:00 the newest issue is
/// the previous evening's.
#[must_use]
pub fn index_window(now: NaiveDateTime) -> ForecastWindow {
    if now.hour() < 6 {
        ForecastWindow {
            base_date: now.date() - Duration::days(1),
            base_time: "18".to_string(),
        }
    } else if now.hour() < 18 {
        ForecastWindow {
            base_date: now.date(),
            base_time: "06".to_string(),
        }
    } else {
        ForecastWindow {
            base_date: now.date(),
            base_time: "18".to_string(),
        }
    }
}

/// Window for the supplementary daily min/max backfill query.
///
/// Only the 02:00 issue carries both TMN and TMX for the whole day.
#[must_use]
pub fn daily_range_window(now: NaiveDateTime) -> ForecastWindow {
    ForecastWindow {
        base_date: now.date(),
        base_time: "0200".to_string(),
    }
}

/// Day-of-year for the calendar day after `now`, used by the irradiance model.
#[must_use]
pub fn tomorrow_ordinal(now: NaiveDateTime) -> (NaiveDate, u32) {
    let date = now.date() + Duration::days(1);
    (date, date.ordinal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(date: (i32, u32, u32), hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[rstest]
    #[case(11, 10, "1100")]
    #[case(12, 0, "1100")]
    #[case(13, 59, "1100")]
    #[case(14, 9, "1100")]
    #[case(14, 10, "1400")]
    #[case(23, 30, "2300")]
    fn test_village_window_is_stable_within_interval(
        #[case] hour: u32,
        #[case] minute: u32,
        #[case] expected: &str,
    ) {
        let window = village_window(at((2025, 7, 14), hour, minute));
        assert_eq!(window.base_time, expected);
        assert_eq!(window.date_param(), "20250714");
    }

    #[rstest]
    #[case(0, 30)]
    #[case(1, 45)]
    #[case(2, 5)]
    fn test_village_window_rolls_date_before_two(#[case] hour: u32, #[case] minute: u32) {
        let window = village_window(at((2025, 7, 14), hour, minute));
        assert_eq!(window.base_time, "2300");
        assert_eq!(window.date_param(), "20250713");
    }

    #[test]
    fn test_village_window_rolls_across_month_boundary() {
        let window = village_window(at((2025, 3, 1), 0, 30));
        assert_eq!(window.date_param(), "20250228");
        assert_eq!(window.base_time, "2300");
    }

    #[rstest]
    #[case(10, 44, "0930")]
    #[case(10, 45, "1030")]
    #[case(11, 20, "1030")]
    fn test_ultra_window(#[case] hour: u32, #[case] minute: u32, #[case] expected: &str) {
        let window = ultra_window(at((2025, 7, 14), hour, minute));
        assert_eq!(window.base_time, expected);
    }

    #[test]
    fn test_ultra_window_rolls_date_at_midnight() {
        let window = ultra_window(at((2025, 7, 14), 0, 10));
        assert_eq!(window.date_param(), "20250713");
        assert_eq!(window.base_time, "2330");
    }

    #[rstest]
    #[case(5, "20250713", "18")]
    #[case(6, "20250714", "06")]
    #[case(17, "20250714", "06")]
    #[case(18, "20250714", "18")]
    #[case(23, "20250714", "18")]
    fn test_index_window(#[case] hour: u32, #[case] date: &str, #[case] time: &str) {
        let window = index_window(at((2025, 7, 14), hour, 0));
        assert_eq!(window.date_param(), date);
        assert_eq!(window.base_time, time);
        assert_eq!(window.stamp_param(), format!("{date}{time}"));
    }

    #[test]
    fn test_daily_range_window_pins_two_am() {
        let window = daily_range_window(at((2025, 7, 14), 16, 40));
        assert_eq!(window.date_param(), "20250714");
        assert_eq!(window.base_time, "0200");
    }

    #[test]
    fn test_tomorrow_ordinal() {
        let (date, ordinal) = tomorrow_ordinal(at((2025, 12, 31), 9, 0));
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(ordinal, 1);
    }
}
