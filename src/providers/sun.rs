//! Sunrise/sunset adapter with day/night progress.
//!
//! The remote provider answers in UTC; times are converted to KST before the
//! progress computation. When the provider is unreachable the times are
//! computed locally from solar geometry, and only if the coordinates are
//! unusable does the adapter fall back to fixed defaults. Either way the
//! caller always gets a usable value.

use chrono::{DateTime, Duration, NaiveDateTime};
use chrono_tz::Asia::Seoul;
use serde::Deserialize;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::warn;

use crate::error::{FetchError, FetchResult};
use crate::geo::GeoPoint;

use super::ProviderClient;

#[derive(Debug)]
pub struct SunTimes {
    /// Local sunrise, `HH:MM`.
    pub sunrise: String,
    /// Local sunset, `HH:MM`.
    pub sunset: String,
    pub is_daytime: bool,
    /// Progress through the current sun or moon cycle, 0..=100.
    pub progress: f64,
}

#[derive(Debug, Deserialize)]
struct SunEnvelope {
    status: String,
    #[serde(default)]
    results: Option<SunResults>,
}

#[derive(Debug, Deserialize)]
struct SunResults {
    sunrise: String,
    sunset: String,
}

pub async fn fetch(client: &ProviderClient, point: GeoPoint, now: NaiveDateTime) -> SunTimes {
    match fetch_remote(client, point, now).await {
        Ok(times) => times,
        Err(err) => {
            warn!("sunrise/sunset provider: {err}, computing locally");
            local_fallback(point, now)
        }
    }
}

async fn fetch_remote(
    client: &ProviderClient,
    point: GeoPoint,
    now: NaiveDateTime,
) -> FetchResult<SunTimes> {
    let query = [
        ("lat", point.latitude.to_string()),
        ("lng", point.longitude.to_string()),
        ("formatted", "0".to_string()),
        ("date", "today".to_string()),
    ];

    let envelope: SunEnvelope = client
        .get_json(&client.endpoints.sun_url, &query)
        .await?;
    if envelope.status != "OK" {
        return Err(FetchError::ProviderEmpty);
    }
    let results = envelope.results.ok_or(FetchError::ProviderEmpty)?;

    let sunrise = parse_utc(&results.sunrise)?;
    let sunset = parse_utc(&results.sunset)?;
    Ok(build(now, sunrise, sunset))
}

fn parse_utc(raw: &str) -> FetchResult<NaiveDateTime> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| FetchError::Parse(format!("bad sun timestamp '{raw}': {e}")))?;
    Ok(parsed.with_timezone(&Seoul).naive_local())
}

/// Local solar-geometry substitute for the remote provider.
fn local_fallback(point: GeoPoint, now: NaiveDateTime) -> SunTimes {
    let Some(coordinates) = Coordinates::new(point.latitude, point.longitude) else {
        return fixed_fallback();
    };

    let solar_day = SolarDay::new(coordinates, now.date());
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .with_timezone(&Seoul)
        .naive_local();
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .with_timezone(&Seoul)
        .naive_local();

    build(now, sunrise, sunset)
}

fn fixed_fallback() -> SunTimes {
    SunTimes {
        sunrise: "06:00".to_string(),
        sunset: "19:30".to_string(),
        is_daytime: true,
        progress: 50.0,
    }
}

/// Day/night determination and cycle progress.
///
/// Daytime runs sunrise to sunset; the night cycle runs sunset to the next
/// sunrise, using the same-day event times shifted by one day on the far
/// side of midnight.
fn build(now: NaiveDateTime, sunrise: NaiveDateTime, sunset: NaiveDateTime) -> SunTimes {
    let is_daytime = now > sunrise && now < sunset;

    let (start, end) = if is_daytime {
        (sunrise, sunset)
    } else if now < sunrise {
        (sunset - Duration::days(1), sunrise)
    } else {
        (sunset, sunrise + Duration::days(1))
    };

    let total = (end - start).num_seconds();
    let progress = if total <= 0 {
        50.0
    } else {
        let elapsed = (now - start).num_seconds();
        (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    };

    SunTimes {
        sunrise: sunrise.format("%H:%M").to_string(),
        sunset: sunset.format("%H:%M").to_string(),
        is_daytime,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_midday_is_daytime_with_midpoint_progress() {
        let times = build(dt(12, 45), dt(5, 30), dt(20, 0));
        assert!(times.is_daytime);
        assert!((times.progress - 50.0).abs() < 1.0);
        assert_eq!(times.sunrise, "05:30");
        assert_eq!(times.sunset, "20:00");
    }

    #[test]
    fn test_before_sunrise_is_night_cycle() {
        let times = build(dt(3, 0), dt(5, 30), dt(20, 0));
        assert!(!times.is_daytime);
        // Night runs from yesterday's sunset (20:00) to 05:30: 9.5h total,
        // 7h elapsed at 03:00.
        assert!((times.progress - 73.7).abs() < 1.0);
    }

    #[test]
    fn test_after_sunset_is_night_cycle() {
        let times = build(dt(21, 0), dt(5, 30), dt(20, 0));
        assert!(!times.is_daytime);
        assert!(times.progress < 15.0);
        assert!(times.progress > 0.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        let times = build(dt(20, 0), dt(5, 30), dt(20, 0));
        assert!((0.0..=100.0).contains(&times.progress));
    }

    #[test]
    fn test_fixed_fallback_defaults() {
        let times = fixed_fallback();
        assert_eq!(times.sunrise, "06:00");
        assert_eq!(times.sunset, "19:30");
        assert!(times.is_daytime);
        assert_eq!(times.progress, 50.0);
    }

    #[test]
    fn test_parse_utc_converts_to_kst() {
        let parsed = parse_utc("2025-07-13T20:30:00+00:00").unwrap();
        assert_eq!(parsed.format("%m-%d %H:%M").to_string(), "07-14 05:30");
    }

    #[test]
    fn test_parse_utc_rejects_garbage() {
        assert!(parse_utc("yesterday").is_err());
    }
}
