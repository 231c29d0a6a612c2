//! Short-range ("village") forecast adapter.
//!
//! One query returns a few days of `(category, value)` pairs. The adapter
//! keeps the newest forecast slice as the current conditions, picks today's
//! daily min/max, and builds hourly series for tomorrow and the day after.
//! When the current issue omits the daily range, a one-off supplementary
//! query against the 02:00 issue backfills it.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use tracing::warn;

use crate::error::FetchResult;
use crate::geo::GridPoint;
use crate::record::HourlyForecast;
use crate::window::{self, ForecastWindow};

use super::{
    ForecastItem, KmaEnvelope, PartialResult, ProviderClient, parse_numeric, pty_label, sky_label,
};

const PATH: &str = "/VilageFcstInfoService_2.0/getVilageFcst";

/// Categories carried into the per-day hourly series.
const HOURLY_CATEGORIES: [&str; 5] = ["TMP", "SKY", "PTY", "POP", "REH"];

#[derive(Debug, Default)]
pub struct VillageForecast {
    pub base_date: String,
    pub base_time: String,
    pub fcst_date: Option<String>,
    pub fcst_time: Option<String>,

    pub temperature: Option<f64>,
    pub sky: Option<String>,
    pub precip_prob: Option<f64>,
    pub precip_type: Option<String>,
    pub precip_amount: Option<String>,
    pub snow_amount: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_u: Option<f64>,
    pub wind_v: Option<f64>,
    pub wave_height: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,

    pub tomorrow_date: String,
    pub tomorrow: Vec<HourlyForecast>,
    pub tomorrow_temp_min: Option<f64>,
    pub tomorrow_temp_max: Option<f64>,
    pub day_after_date: String,
    pub day_after: Vec<HourlyForecast>,
    pub day_after_temp_min: Option<f64>,
    pub day_after_temp_max: Option<f64>,
}

pub async fn fetch(
    client: &ProviderClient,
    grid: GridPoint,
    now: NaiveDateTime,
) -> PartialResult<VillageForecast> {
    let window = window::village_window(now);
    let mut settled = PartialResult::settle(
        "village forecast",
        fetch_window(client, grid, &window, now).await,
    );

    if let PartialResult::Data(forecast) = &mut settled
        && (forecast.temp_min.is_none() || forecast.temp_max.is_none())
    {
        backfill_daily_range(client, grid, now, forecast).await;
    }

    settled
}

async fn fetch_window(
    client: &ProviderClient,
    grid: GridPoint,
    window: &ForecastWindow,
    now: NaiveDateTime,
) -> FetchResult<VillageForecast> {
    let items = request(client, grid, window).await?;
    Ok(parse_items(&items, window, now))
}

/// Raw item query, shared with the tomorrow-outlook computation.
pub(crate) async fn request(
    client: &ProviderClient,
    grid: GridPoint,
    window: &ForecastWindow,
) -> FetchResult<Vec<ForecastItem>> {
    let url = client.kma_url(PATH);
    let query = [
        ("serviceKey", client.service_key().to_string()),
        ("pageNo", "1".to_string()),
        ("numOfRows", "1000".to_string()),
        ("dataType", "JSON".to_string()),
        ("base_date", window.date_param()),
        ("base_time", window.time_param().to_string()),
        ("nx", grid.x.to_string()),
        ("ny", grid.y.to_string()),
    ];

    let envelope: KmaEnvelope<ForecastItem> = client.get_json(&url, &query).await?;
    envelope.into_items()
}

fn parse_items(
    items: &[ForecastItem],
    window: &ForecastWindow,
    now: NaiveDateTime,
) -> VillageForecast {
    let mut forecast = VillageForecast {
        base_date: window.date_param(),
        base_time: window.time_param().to_string(),
        tomorrow_date: (now.date() + Duration::days(1)).format("%Y%m%d").to_string(),
        day_after_date: (now.date() + Duration::days(2)).format("%Y%m%d").to_string(),
        ..Default::default()
    };

    let Some(first) = items.first() else {
        return forecast;
    };
    let target_date = first.fcst_date.clone();
    let target_time = first.fcst_time.clone();
    forecast.fcst_date = Some(target_date.clone());
    forecast.fcst_time = Some(target_time.clone());

    let mut tomorrow_map: BTreeMap<String, HourlyForecast> = BTreeMap::new();
    let mut day_after_map: BTreeMap<String, HourlyForecast> = BTreeMap::new();

    for item in items {
        if item.fcst_date == target_date && item.fcst_time == target_time {
            match item.category.as_str() {
                "TMP" => forecast.temperature = Some(parse_numeric(&item.fcst_value)),
                "SKY" => forecast.sky = Some(sky_label(&item.fcst_value)),
                "POP" => forecast.precip_prob = Some(parse_numeric(&item.fcst_value)),
                "PTY" => forecast.precip_type = Some(pty_label(&item.fcst_value)),
                "PCP" => forecast.precip_amount = Some(item.fcst_value.clone()),
                "SNO" => forecast.snow_amount = Some(item.fcst_value.clone()),
                "REH" => forecast.humidity = Some(parse_numeric(&item.fcst_value)),
                "WSD" => forecast.wind_speed = Some(parse_numeric(&item.fcst_value)),
                "VEC" => forecast.wind_direction = Some(parse_numeric(&item.fcst_value)),
                "UUU" => forecast.wind_u = Some(parse_numeric(&item.fcst_value)),
                "VVV" => forecast.wind_v = Some(parse_numeric(&item.fcst_value)),
                "WAV" => forecast.wave_height = Some(parse_numeric(&item.fcst_value)),
                _ => {}
            }
        }

        if item.fcst_date == forecast.base_date {
            match item.category.as_str() {
                "TMX" => forecast.temp_max = Some(parse_numeric(&item.fcst_value)),
                "TMN" => forecast.temp_min = Some(parse_numeric(&item.fcst_value)),
                _ => {}
            }
        }

        if item.fcst_date == forecast.tomorrow_date {
            collect_hourly(&mut tomorrow_map, item);
            match item.category.as_str() {
                "TMN" => forecast.tomorrow_temp_min = Some(parse_numeric(&item.fcst_value)),
                "TMX" => forecast.tomorrow_temp_max = Some(parse_numeric(&item.fcst_value)),
                _ => {}
            }
        }
        if item.fcst_date == forecast.day_after_date {
            collect_hourly(&mut day_after_map, item);
            match item.category.as_str() {
                "TMN" => forecast.day_after_temp_min = Some(parse_numeric(&item.fcst_value)),
                "TMX" => forecast.day_after_temp_max = Some(parse_numeric(&item.fcst_value)),
                _ => {}
            }
        }
    }

    forecast.tomorrow = tomorrow_map.into_values().collect();
    forecast.day_after = day_after_map.into_values().collect();
    forecast
}

fn collect_hourly(map: &mut BTreeMap<String, HourlyForecast>, item: &ForecastItem) {
    if !HOURLY_CATEGORIES.contains(&item.category.as_str()) {
        return;
    }
    let slot = map
        .entry(item.fcst_time.clone())
        .or_insert_with(|| HourlyForecast {
            fcst_date: Some(item.fcst_date.clone()),
            fcst_time: item.fcst_time.clone(),
            ..Default::default()
        });
    slot.set_category(&item.category, &item.fcst_value);
}

/// Supplementary TMN/TMX query against the 02:00 issue, which is the only
/// one that carries the full daily range.
async fn backfill_daily_range(
    client: &ProviderClient,
    grid: GridPoint,
    now: NaiveDateTime,
    forecast: &mut VillageForecast,
) {
    let window = window::daily_range_window(now);
    match request(client, grid, &window).await {
        Ok(items) => {
            let today = window.date_param();
            for item in &items {
                if item.fcst_date != today {
                    continue;
                }
                match item.category.as_str() {
                    "TMN" if forecast.temp_min.is_none() => {
                        forecast.temp_min = Some(parse_numeric(&item.fcst_value));
                    }
                    "TMX" if forecast.temp_max.is_none() => {
                        forecast.temp_max = Some(parse_numeric(&item.fcst_value));
                    }
                    _ => {}
                }
            }
        }
        Err(err) => warn!("daily temperature range backfill failed: {err}"),
    }
}
