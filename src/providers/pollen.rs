//! Pollen risk adapters (oak, pine, weeds).
//!
//! The species indices are seasonal: oak and pine run April through June,
//! weeds August through October. Out of season the species fields stay
//! absent and the aggregate comment reads as no risk.

use chrono::{Datelike, NaiveDateTime};
use futures::future::join_all;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchResult;
use crate::window::{self, ForecastWindow};

use super::{KmaEnvelope, PartialResult, ProviderClient, safe_area};

const OAK_PATH: &str = "/HealthWthrIdxServiceV4/getOakPollenRiskIdxV4";
const PINE_PATH: &str = "/HealthWthrIdxServiceV4/getPinePollenRiskIdxV4";
const WEEDS_PATH: &str = "/HealthWthrIdxServiceV4/getWeedsPollenRiskIdxV4";

#[derive(Debug, Default)]
pub struct PollenReport {
    pub oak: Option<String>,
    pub pine: Option<String>,
    pub weeds: Option<String>,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct PollenItem {
    #[serde(default, deserialize_with = "super::de_text")]
    h0: String,
}

pub async fn fetch(
    client: &ProviderClient,
    area_no: &str,
    now: NaiveDateTime,
) -> PartialResult<PollenReport> {
    let month = now.month();
    let is_spring = (4..=6).contains(&month);
    let is_autumn = (8..=10).contains(&month);

    let window = window::index_window(now);
    let area = safe_area(area_no);

    let (oak, pine) = if is_spring {
        let mut results = join_all([
            species(client, OAK_PATH, area, &window),
            species(client, PINE_PATH, area, &window),
        ])
        .await;
        let pine = results.pop().unwrap_or_default();
        let oak = results.pop().unwrap_or_default();
        (oak, pine)
    } else {
        (None, None)
    };

    let weeds = if is_autumn {
        species(client, WEEDS_PATH, area, &window).await
    } else {
        None
    };

    let comment = risk_comment(oak.as_deref(), pine.as_deref(), weeds.as_deref());
    PartialResult::Data(PollenReport {
        oak,
        pine,
        weeds,
        comment,
    })
}

/// One species query; any failure reads as "no value" for that species.
async fn species(
    client: &ProviderClient,
    path: &str,
    area: &str,
    window: &ForecastWindow,
) -> Option<String> {
    match species_inner(client, path, area, window).await {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("pollen index {path}: {err}");
            None
        }
    }
}

async fn species_inner(
    client: &ProviderClient,
    path: &str,
    area: &str,
    window: &ForecastWindow,
) -> FetchResult<String> {
    let url = client.kma_url(path);
    let query = [
        ("serviceKey", client.service_key().to_string()),
        ("pageNo", "1".to_string()),
        ("numOfRows", "10".to_string()),
        ("dataType", "JSON".to_string()),
        ("areaNo", area.to_string()),
        ("time", window.stamp_param()),
    ];

    let envelope: KmaEnvelope<PollenItem> = client.get_json(&url, &query).await?;
    let items = envelope.into_items()?;
    Ok(items
        .first()
        .map(|item| item.h0.trim().to_string())
        .unwrap_or_default())
}

/// Aggregate advisory keyed off the worst species risk.
fn risk_comment(oak: Option<&str>, pine: Option<&str>, weeds: Option<&str>) -> String {
    let mut max_risk = 0;
    let mut kind = "";
    for (value, name) in [(oak, "참나무"), (pine, "소나무"), (weeds, "잡초류")] {
        if let Some(raw) = value
            && let Ok(risk) = raw.trim().parse::<i32>()
            && risk > max_risk
        {
            max_risk = risk;
            kind = name;
        }
    }

    match max_risk {
        0 => "꽃가루 위험이 없습니다.".to_string(),
        1 => "꽃가루 농도가 낮습니다.".to_string(),
        2 => format!("{kind} 꽃가루가 날릴 수 있습니다. 환기에 주의하세요."),
        _ => format!("🚨 {kind} 꽃가루 농도 위험! 마스크를 꼭 착용하세요."),
    }
}
