//! UV living-index adapter.

use chrono::NaiveDateTime;

use crate::error::FetchResult;
use crate::window;

use super::{KmaEnvelope, PartialResult, ProviderClient, safe_area};

use serde::Deserialize;

const PATH: &str = "/LivingWthrIdxServiceV4/getUVIdxV4";

#[derive(Debug)]
pub struct UvReading {
    pub index: String,
    pub stage: &'static str,
    pub comment: &'static str,
}

#[derive(Debug, Deserialize)]
struct LivingItem {
    #[serde(default, deserialize_with = "super::de_text")]
    h0: String,
}

pub async fn fetch(
    client: &ProviderClient,
    area_no: &str,
    now: NaiveDateTime,
) -> PartialResult<UvReading> {
    PartialResult::settle("UV index", fetch_inner(client, area_no, now).await)
}

async fn fetch_inner(
    client: &ProviderClient,
    area_no: &str,
    now: NaiveDateTime,
) -> FetchResult<UvReading> {
    let window = window::index_window(now);
    let url = client.kma_url(PATH);
    let query = [
        ("serviceKey", client.service_key().to_string()),
        ("pageNo", "1".to_string()),
        ("numOfRows", "10".to_string()),
        ("dataType", "JSON".to_string()),
        ("areaNo", safe_area(area_no).to_string()),
        ("time", window.stamp_param()),
    ];

    let envelope: KmaEnvelope<LivingItem> = client.get_json(&url, &query).await?;
    let items = envelope.into_items()?;
    let h0 = items
        .first()
        .map(|item| item.h0.trim().to_string())
        .unwrap_or_default();
    let index = if h0.is_empty() { "0".to_string() } else { h0 };

    Ok(classify(index))
}

fn classify(index: String) -> UvReading {
    let value: i32 = index.parse().unwrap_or(0);
    let (stage, comment) = match value {
        ..=2 => ("낮음", "자외선 걱정 없이 야외활동 가능해요."),
        3..=5 => ("보통", "외출 시 선글라스나 모자를 쓰면 좋아요."),
        6..=7 => ("높음", "낮 시간대에는 그늘에 머무르세요."),
        8..=10 => ("매우높음", "외출을 피하고 자외선 차단제를 꼼꼼히!"),
        _ => ("위험", "가능하면 실내에 머무르는 게 좋습니다."),
    };

    UvReading {
        index,
        stage,
        comment,
    }
}
