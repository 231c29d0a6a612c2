//! Astronomical solar-irradiance model and tomorrow's outlook.
//!
//! No provider supplies measured irradiance, so the estimate comes from
//! solar geometry: declination by day of year, hour angle, elevation, then a
//! clear-sky value attenuated by a cloud factor. The same model backs both
//! the live estimate and the next-day outlook handed to the downstream
//! generation estimator.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::FetchResult;
use crate::geo::{GeoPoint, GridPoint};
use crate::providers::{
    ForecastItem, PartialResult, ProviderClient, parse_numeric, parse_precipitation, village,
};
use crate::window;

/// First and last hour of the generation window.
const GENERATION_HOURS: std::ops::RangeInclusive<u32> = 6..=19;

/// Solar elevation above the horizon, degrees; never negative.
#[must_use]
pub fn solar_elevation(latitude: f64, day_of_year: u32, hour: u32) -> f64 {
    let declination = 23.45 * (360.0 * (284.0 + f64::from(day_of_year)) / 365.0).to_radians().sin();
    let hour_angle = (f64::from(hour) - 12.0) * 15.0;

    let lat_rad = latitude.to_radians();
    let dec_rad = declination.to_radians();
    let ha_rad = hour_angle.to_radians();

    let sin_elevation = lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    sin_elevation.max(0.0).asin().to_degrees()
}

/// Clear-sky irradiance attenuated by cloudiness.
///
/// Cloud score is 0 (clear), 5 (partly cloudy) or 10 (overcast); the factor
/// runs from 1.0 down to 0.3.
#[must_use]
pub fn irradiance(latitude: f64, day_of_year: u32, hour: u32, cloud_score: f64) -> f64 {
    let elevation = solar_elevation(latitude, day_of_year, hour);
    if elevation <= 0.0 {
        return 0.0;
    }
    let clear_sky = 3.6 * elevation.to_radians().sin();
    let cloud_factor = 1.0 - (cloud_score / 10.0) * 0.7;
    clear_sky * cloud_factor
}

/// One hour of the next-day irradiance profile.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyIrradiance {
    pub hour: u32,
    pub irradiance: f64,
}

/// Irradiance profile across the generation window.
#[must_use]
pub fn hourly_irradiance(latitude: f64, day_of_year: u32, cloud_score: f64) -> Vec<HourlyIrradiance> {
    GENERATION_HOURS
        .map(|hour| HourlyIrradiance {
            hour,
            irradiance: round2(irradiance(latitude, day_of_year, hour, cloud_score)),
        })
        .collect()
}

/// SKY code value to cloud score.
#[must_use]
pub fn cloud_score(sky_value: f64) -> f64 {
    if (sky_value - 1.0).abs() < f64::EPSILON {
        0.0
    } else if (sky_value - 3.0).abs() < f64::EPSILON {
        5.0
    } else if sky_value >= 4.0 {
        10.0
    } else {
        0.0
    }
}

/// Tomorrow's conditions distilled for the generation estimator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TomorrowOutlook {
    pub fcst_date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Average of min and max, the estimator's representative temperature.
    pub temp_avg: f64,
    pub cloud_score: f64,
    pub rain_mm: f64,
    pub snow_mm: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precip_prob: f64,
    /// Noon irradiance estimate, absent when the noon slice is missing.
    pub irradiance: Option<f64>,
    /// 1.0 when the sky is at most partly cloudy, else 0.0.
    pub sunshine: Option<f64>,
    pub hourly: Vec<HourlyIrradiance>,
}

/// Fetch tomorrow's forecast and distill the noon slice.
pub async fn tomorrow_outlook(
    client: &ProviderClient,
    grid: GridPoint,
    point: GeoPoint,
    now: NaiveDateTime,
) -> PartialResult<TomorrowOutlook> {
    PartialResult::settle(
        "tomorrow outlook",
        tomorrow_outlook_inner(client, grid, point, now).await,
    )
}

async fn tomorrow_outlook_inner(
    client: &ProviderClient,
    grid: GridPoint,
    point: GeoPoint,
    now: NaiveDateTime,
) -> FetchResult<TomorrowOutlook> {
    let window = window::village_window(now);
    let items = village::request(client, grid, &window).await?;
    let (date, day_of_year) = window::tomorrow_ordinal(now);
    let tomorrow = date.format("%Y%m%d").to_string();
    Ok(parse_outlook(&items, &tomorrow, day_of_year, point.latitude))
}

fn parse_outlook(
    items: &[ForecastItem],
    tomorrow: &str,
    day_of_year: u32,
    latitude: f64,
) -> TomorrowOutlook {
    let mut temp_min = None;
    let mut temp_max = None;
    let mut cloud = 0.0;
    let mut rain_mm = 0.0;
    let mut snow_mm = 0.0;
    let mut humidity = 0.0;
    let mut wind_speed = 0.0;
    let mut precip_prob = 0.0;
    let mut found_noon = false;

    for item in items {
        if item.fcst_date != tomorrow {
            continue;
        }

        match item.category.as_str() {
            "TMN" => temp_min = Some(parse_numeric(&item.fcst_value)),
            "TMX" => temp_max = Some(parse_numeric(&item.fcst_value)),
            _ => {}
        }

        // Noon is the peak-generation hour and stands in for the day.
        if item.fcst_time == "1200" {
            match item.category.as_str() {
                "SKY" => {
                    cloud = cloud_score(parse_numeric(&item.fcst_value));
                    found_noon = true;
                }
                "PCP" => {
                    rain_mm = parse_precipitation(&item.fcst_value);
                    found_noon = true;
                }
                "SNO" => {
                    snow_mm = parse_precipitation(&item.fcst_value);
                    found_noon = true;
                }
                "REH" => {
                    humidity = parse_numeric(&item.fcst_value);
                    found_noon = true;
                }
                "WSD" => {
                    wind_speed = parse_numeric(&item.fcst_value);
                    found_noon = true;
                }
                "POP" => {
                    precip_prob = parse_numeric(&item.fcst_value);
                    found_noon = true;
                }
                _ => {}
            }
        }
    }

    let temp_min = temp_min.unwrap_or(0.0);
    let temp_max = temp_max.unwrap_or(20.0);

    let (noon_irradiance, sunshine, hourly) = if found_noon {
        (
            Some(round2(irradiance(latitude, day_of_year, 12, cloud))),
            Some(if cloud <= 5.0 { 1.0 } else { 0.0 }),
            hourly_irradiance(latitude, day_of_year, cloud),
        )
    } else {
        (None, None, Vec::new())
    };

    TomorrowOutlook {
        fcst_date: tomorrow.to_string(),
        temp_min,
        temp_max,
        temp_avg: (temp_min + temp_max) / 2.0,
        cloud_score: cloud,
        rain_mm,
        snow_mm,
        humidity,
        wind_speed,
        precip_prob,
        irradiance: noon_irradiance,
        sunshine,
        hourly,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
