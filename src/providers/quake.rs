//! Seismic-event adapter: most recent notice plus a recent-event list.

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use tracing::warn;

use crate::error::FetchResult;
use crate::record::EarthquakeEvent;

use super::{KmaEnvelope, PartialResult, ProviderClient, format_notice_time, parse_numeric};

const PATH: &str = "/EqkInfoService/getEqkMsgList";

/// The most recent seismic notice, enough for the proximity narrative.
#[derive(Debug)]
pub struct QuakeNotice {
    pub time: String,
    pub location: String,
    pub magnitude: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct QuakeItem {
    #[serde(rename = "tmFc", default, deserialize_with = "super::de_text")]
    tm_fc: String,
    #[serde(rename = "tmEqk", default, deserialize_with = "super::de_text")]
    tm_eqk: String,
    #[serde(default, deserialize_with = "super::de_text")]
    lat: String,
    #[serde(default, deserialize_with = "super::de_text")]
    lon: String,
    #[serde(default, deserialize_with = "super::de_text")]
    loc: String,
    #[serde(default, deserialize_with = "super::de_text")]
    mt: String,
    #[serde(default, deserialize_with = "super::de_text")]
    rem: String,
    #[serde(default, deserialize_with = "super::de_text")]
    img: String,
}

/// Most recent event announced within the last week.
pub async fn latest(client: &ProviderClient, now: NaiveDateTime) -> PartialResult<QuakeNotice> {
    PartialResult::settle("earthquake notice", latest_inner(client, now).await)
}

async fn latest_inner(client: &ProviderClient, now: NaiveDateTime) -> FetchResult<QuakeNotice> {
    let items = request(client, now, 7, 1).await?;
    let item = &items[0];
    Ok(QuakeNotice {
        time: format_notice_time(&item.tm_fc),
        location: item.loc.clone(),
        magnitude: item.mt.clone(),
        latitude: parse_numeric(&item.lat),
        longitude: parse_numeric(&item.lon),
    })
}

/// Events announced within the last 30 days, newest first as delivered.
/// Degrades to an empty list, never an error.
pub async fn recent_events(client: &ProviderClient, now: NaiveDateTime) -> Vec<EarthquakeEvent> {
    match request(client, now, 30, 100).await {
        Ok(items) => items
            .into_iter()
            .map(|item| EarthquakeEvent {
                announced_at: format_notice_time(&item.tm_fc),
                occurred_at: format_notice_time(&item.tm_eqk),
                latitude: item.lat,
                longitude: item.lon,
                location: item.loc,
                magnitude: item.mt,
                note: item.rem,
                map_image: item.img,
            })
            .collect(),
        Err(err) => {
            warn!("earthquake list: {err}");
            Vec::new()
        }
    }
}

async fn request(
    client: &ProviderClient,
    now: NaiveDateTime,
    days_back: i64,
    rows: u32,
) -> FetchResult<Vec<QuakeItem>> {
    let url = client.kma_url(PATH);
    let query = [
        ("serviceKey", client.service_key().to_string()),
        ("pageNo", "1".to_string()),
        ("numOfRows", rows.to_string()),
        ("dataType", "JSON".to_string()),
        (
            "fromTmFc",
            (now.date() - Duration::days(days_back))
                .format("%Y%m%d")
                .to_string(),
        ),
        ("toTmFc", now.date().format("%Y%m%d").to_string()),
    ];

    let envelope: KmaEnvelope<QuakeItem> = client.get_json(&url, &query).await?;
    envelope.into_items()
}
