//! Ultra-short-range forecast adapter: the next six hours, hourly.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::FetchResult;
use crate::geo::GridPoint;
use crate::record::HourlyForecast;
use crate::window;

use super::{ForecastItem, KmaEnvelope, PartialResult, ProviderClient};

const PATH: &str = "/VilageFcstInfoService_2.0/getUltraSrtFcst";

const HOURLY_CATEGORIES: [&str; 7] = ["T1H", "RN1", "SKY", "PTY", "LGT", "REH", "WSD"];

#[derive(Debug, Default)]
pub struct UltraForecast {
    pub hourly: Vec<HourlyForecast>,
}

pub async fn fetch(
    client: &ProviderClient,
    grid: GridPoint,
    now: NaiveDateTime,
) -> PartialResult<UltraForecast> {
    PartialResult::settle(
        "ultra-short-range forecast",
        fetch_inner(client, grid, now).await,
    )
}

async fn fetch_inner(
    client: &ProviderClient,
    grid: GridPoint,
    now: NaiveDateTime,
) -> FetchResult<UltraForecast> {
    let window = window::ultra_window(now);
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
    Ok(parse_items(&envelope.into_items()?))
}

fn parse_items(items: &[ForecastItem]) -> UltraForecast {
    let mut map: BTreeMap<String, HourlyForecast> = BTreeMap::new();
    for item in items {
        if !HOURLY_CATEGORIES.contains(&item.category.as_str()) {
            continue;
        }
        map.entry(item.fcst_time.clone())
            .or_insert_with(|| HourlyForecast {
                fcst_date: Some(item.fcst_date.clone()),
                fcst_time: item.fcst_time.clone(),
                ..Default::default()
            })
            .set_category(&item.category, &item.fcst_value);
    }

    UltraForecast {
        hourly: map.into_values().collect(),
    }
}
