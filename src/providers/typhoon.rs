//! Tropical-cyclone adapter: active advisory plus a recent-advisory list.

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use tracing::warn;

use crate::error::FetchResult;
use crate::record::TyphoonEvent;

use super::{KmaEnvelope, PartialResult, ProviderClient, format_notice_time, parse_numeric};

const PATH: &str = "/TyphoonInfoService/getTyphoonInfoList";

/// The active cyclone advisory, enough for the proximity narrative.
#[derive(Debug)]
pub struct TyphoonNotice {
    /// Display name, e.g. `제5호 장미`.
    pub name: String,
    pub status: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum wind speed in m/s; 0.0 when the field is malformed.
    pub wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct TyphoonItem {
    #[serde(rename = "tmFc", default, deserialize_with = "super::de_text")]
    tm_fc: String,
    #[serde(rename = "typSeq", default, deserialize_with = "super::de_text")]
    typ_seq: String,
    #[serde(rename = "typName", default, deserialize_with = "super::de_text")]
    typ_name: String,
    #[serde(rename = "typEn", default, deserialize_with = "super::de_text")]
    typ_en: String,
    #[serde(rename = "manFc", default, deserialize_with = "super::de_text")]
    man_fc: String,
    #[serde(rename = "typLoc", default, deserialize_with = "super::de_text")]
    typ_loc: String,
    #[serde(default, deserialize_with = "super::de_text")]
    lat: String,
    #[serde(default, deserialize_with = "super::de_text")]
    lon: String,
    #[serde(rename = "typDir", default, deserialize_with = "super::de_text")]
    typ_dir: String,
    #[serde(rename = "typSp", default, deserialize_with = "super::de_text")]
    typ_sp: String,
    #[serde(rename = "typPs", default, deserialize_with = "super::de_text")]
    typ_ps: String,
    #[serde(rename = "typWs", default, deserialize_with = "super::de_text")]
    typ_ws: String,
}

/// Most recent advisory issued within the last five days.
pub async fn latest(client: &ProviderClient, now: NaiveDateTime) -> PartialResult<TyphoonNotice> {
    PartialResult::settle("typhoon advisory", latest_inner(client, now).await)
}

async fn latest_inner(client: &ProviderClient, now: NaiveDateTime) -> FetchResult<TyphoonNotice> {
    let items = request(client, now, 5, 1).await?;
    let item = &items[0];
    Ok(TyphoonNotice {
        name: format!("제{}호 {}", item.typ_seq, item.typ_name),
        status: format!("현재 활동 중 ({})", item.typ_loc),
        time: format_notice_time(&item.tm_fc),
        latitude: parse_numeric(&item.lat),
        longitude: parse_numeric(&item.lon),
        wind_speed: parse_wind_speed(&item.typ_ws),
    })
}

/// Advisories issued within the last 30 days. Degrades to an empty list.
pub async fn recent_events(client: &ProviderClient, now: NaiveDateTime) -> Vec<TyphoonEvent> {
    match request(client, now, 30, 100).await {
        Ok(items) => items
            .into_iter()
            .map(|item| TyphoonEvent {
                announced_at: format_notice_time(&item.tm_fc),
                seq: item.typ_seq,
                name: item.typ_name,
                name_en: item.typ_en,
                office: item.man_fc,
                location: or_dash(item.typ_loc),
                latitude: item.lat,
                longitude: item.lon,
                direction: or_dash(item.typ_dir),
                speed: or_dash(item.typ_sp),
                pressure: or_dash(item.typ_ps),
                max_wind: or_dash(item.typ_ws),
            })
            .collect(),
        Err(err) => {
            warn!("typhoon list: {err}");
            Vec::new()
        }
    }
}

async fn request(
    client: &ProviderClient,
    now: NaiveDateTime,
    days_back: i64,
    rows: u32,
) -> FetchResult<Vec<TyphoonItem>> {
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

    let envelope: KmaEnvelope<TyphoonItem> = client.get_json(&url, &query).await?;
    envelope.into_items()
}

/// Wind speed strings sometimes carry a unit suffix.
fn parse_wind_speed(raw: &str) -> f64 {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wind_speed_strips_units() {
        assert_eq!(parse_wind_speed("35"), 35.0);
        assert_eq!(parse_wind_speed("35m/s"), 35.0);
        assert_eq!(parse_wind_speed("약 24.5 m/s"), 24.5);
        assert_eq!(parse_wind_speed("-"), 0.0);
    }

    #[test]
    fn test_notice_fields_from_item() {
        let json = r#"{
            "tmFc": "202508051000", "typSeq": "5", "typName": "장미", "typEn": "JANGMI",
            "manFc": "기상청", "typLoc": "제주 서귀포 남쪽 약 300km 부근 해상",
            "lat": "31.2", "lon": "126.1", "typDir": "북북동", "typSp": "23",
            "typPs": "985", "typWs": "27"
        }"#;
        let item: TyphoonItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.typ_seq, "5");
        assert_eq!(parse_wind_speed(&item.typ_ws), 27.0);
    }
}
