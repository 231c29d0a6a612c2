//! Particulate-matter adapter (AirKorea real-time sido averages).

use serde::Deserialize;

use crate::error::FetchResult;

use super::{AirEnvelope, PartialResult, ProviderClient};

const PATH: &str = "/ArpltnInforInqireSvc/getCtprvnRltmMesureDnsty";

/// Advisory shown while no measurement is available.
pub const MEASURING_COMMENT: &str = "미세먼지 측정 중...";

#[derive(Debug)]
pub struct DustReading {
    pub pm10_value: String,
    pub pm10_grade: String,
    pub pm25_value: String,
    pub pm25_grade: String,
    pub khai_grade: String,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct DustItem {
    #[serde(rename = "pm10Value", default, deserialize_with = "super::de_text")]
    pm10_value: String,
    #[serde(rename = "pm10Grade", default, deserialize_with = "super::de_text")]
    pm10_grade: String,
    #[serde(rename = "pm25Value", default, deserialize_with = "super::de_text")]
    pm25_value: String,
    #[serde(rename = "pm25Grade", default, deserialize_with = "super::de_text")]
    pm25_grade: String,
    #[serde(rename = "khaiGrade", default, deserialize_with = "super::de_text")]
    khai_grade: String,
}

pub async fn fetch(client: &ProviderClient, sido_name: &str) -> PartialResult<DustReading> {
    PartialResult::settle("particulate matter", fetch_inner(client, sido_name).await)
}

async fn fetch_inner(client: &ProviderClient, sido_name: &str) -> FetchResult<DustReading> {
    // AirKorea rejects the raw Korean sido name, so encode it into the URL
    // directly instead of through the query builder.
    let url = format!(
        "{}{}?serviceKey={}&returnType=json&numOfRows=1&pageNo=1&sidoName={}&ver=1.0",
        client.endpoints.air_base,
        PATH,
        client.service_key(),
        urlencoding::encode(sido_name)
    );

    let envelope: AirEnvelope<DustItem> = client.get_json(&url, &[]).await?;
    let items = envelope.into_items()?;
    let item = &items[0];

    let or_default = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    let pm10_grade = or_default(&item.pm10_grade, "0");
    Ok(DustReading {
        pm10_value: or_default(&item.pm10_value, "-"),
        pm25_value: or_default(&item.pm25_value, "-"),
        pm25_grade: or_default(&item.pm25_grade, "0"),
        khai_grade: or_default(&item.khai_grade, "0"),
        comment: grade_comment(&pm10_grade).to_string(),
        pm10_grade,
    })
}

/// Advisory sentence per PM10 grade; anything unknown reads as measuring.
#[must_use]
pub fn grade_comment(pm10_grade: &str) -> &'static str {
    match pm10_grade {
        "1" => "공기가 상쾌해요! 환기하세요.",
        "2" => "평범한 대기질입니다.",
        "3" => "미세먼지 나쁨. 마스크 필수!",
        "4" => "최악의 공기. 외출 자제!",
        _ => MEASURING_COMMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_comment_bands() {
        assert_eq!(grade_comment("1"), "공기가 상쾌해요! 환기하세요.");
        assert_eq!(grade_comment("3"), "미세먼지 나쁨. 마스크 필수!");
        assert_eq!(grade_comment("4"), "최악의 공기. 외출 자제!");
    }

    #[test]
    fn test_unknown_grade_reads_as_measuring() {
        assert_eq!(grade_comment("0"), MEASURING_COMMENT);
        assert_eq!(grade_comment(""), MEASURING_COMMENT);
        assert_eq!(grade_comment("9"), MEASURING_COMMENT);
    }

    #[test]
    fn test_dust_item_accepts_mixed_types() {
        let json = r#"{"pm10Value": 35, "pm10Grade": "2", "pm25Value": "12", "pm25Grade": 1, "khaiGrade": null}"#;
        let item: DustItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.pm10_value, "35");
        assert_eq!(item.pm25_grade, "1");
        assert_eq!(item.khai_grade, "");
    }
}
