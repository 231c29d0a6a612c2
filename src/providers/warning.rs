//! Official weather-advisory adapter.

use serde::Deserialize;

use crate::error::{FetchError, FetchResult};

use super::{KmaEnvelope, PartialResult, ProviderClient};

const PATH: &str = "/WthrWrnInfoService/getWthrWrnList";

#[derive(Debug)]
pub struct WeatherWarning {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct WarningItem {
    #[serde(default, deserialize_with = "super::de_text")]
    title: String,
    #[serde(default, deserialize_with = "super::de_text")]
    t1: String,
}

/// Latest advisory for a station. `Missing` means nothing is in force;
/// lifted or expired advisories count as nothing.
pub async fn fetch(client: &ProviderClient, station_id: i32) -> PartialResult<WeatherWarning> {
    PartialResult::settle("weather advisory", fetch_inner(client, station_id).await)
}

async fn fetch_inner(client: &ProviderClient, station_id: i32) -> FetchResult<WeatherWarning> {
    let url = client.kma_url(PATH);
    let query = [
        ("serviceKey", client.service_key().to_string()),
        ("pageNo", "1".to_string()),
        ("numOfRows", "5".to_string()),
        ("dataType", "JSON".to_string()),
        ("stnId", station_id.to_string()),
    ];

    let envelope: KmaEnvelope<WarningItem> = client.get_json(&url, &query).await?;
    let items = envelope.into_items()?;
    active_warning(&items[0]).ok_or(FetchError::ProviderEmpty)
}

fn active_warning(item: &WarningItem) -> Option<WeatherWarning> {
    if item.title.contains("해제") || item.title.contains("종료") {
        return None;
    }
    if item.t1.is_empty() {
        return None;
    }
    Some(WeatherWarning {
        message: item.t1.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, t1: &str) -> WarningItem {
        WarningItem {
            title: title.to_string(),
            t1: t1.to_string(),
        }
    }

    #[test]
    fn test_active_warning_passes_content() {
        let warning = active_warning(&item("폭염주의보 발표", "o 폭염주의보 : 서울특별시"));
        assert_eq!(warning.unwrap().message, "o 폭염주의보 : 서울특별시");
    }

    #[test]
    fn test_lifted_warning_counts_as_none() {
        assert!(active_warning(&item("폭염주의보 해제", "o 폭염주의보 : 서울특별시")).is_none());
        assert!(active_warning(&item("특보 종료 안내", "내용")).is_none());
    }

    #[test]
    fn test_empty_content_counts_as_none() {
        assert!(active_warning(&item("폭염주의보 발표", "")).is_none());
    }
}
