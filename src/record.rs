//! Merged per-request output and the transient hazard/event models.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One hourly slot of a forecast series.
///
/// Values stay in provider encoding: the short-range series carries `TMP`,
/// the ultra-short-range series carries `T1H`, and the category codes are
/// passed through untranslated.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    pub fcst_date: Option<String>,
    pub fcst_time: String,
    /// TMP, short-range hourly temperature.
    pub temperature: Option<String>,
    /// T1H, ultra-short-range hourly temperature.
    pub temperature_1h: Option<String>,
    /// POP, precipitation probability.
    pub precip_prob: Option<String>,
    /// SKY code.
    pub sky: Option<String>,
    /// PTY code.
    pub precip_type: Option<String>,
    /// REH, relative humidity.
    pub humidity: Option<String>,
    /// WSD, wind speed.
    pub wind_speed: Option<String>,
    /// RN1, one-hour precipitation (ultra-short-range).
    pub rain_1h: Option<String>,
    /// PCP, one-hour precipitation (short-range).
    pub precip_amount: Option<String>,
    /// LGT, lightning.
    pub lightning: Option<String>,
}

impl HourlyForecast {
    /// Store one `(category, value)` pair; unknown categories are dropped.
    pub fn set_category(&mut self, category: &str, value: &str) {
        let slot = match category {
            "TMP" => &mut self.temperature,
            "T1H" => &mut self.temperature_1h,
            "POP" => &mut self.precip_prob,
            "SKY" => &mut self.sky,
            "PTY" => &mut self.precip_type,
            "REH" => &mut self.humidity,
            "WSD" => &mut self.wind_speed,
            "RN1" => &mut self.rain_1h,
            "PCP" => &mut self.precip_amount,
            "LGT" => &mut self.lightning,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    /// Temperature for display, whichever series populated this slot.
    #[must_use]
    pub fn temp(&self) -> &str {
        self.temperature
            .as_deref()
            .or(self.temperature_1h.as_deref())
            .unwrap_or("-")
    }
}

/// Kind of proximity hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HazardKind {
    Seismic,
    Cyclone,
}

/// A located hazard, alive only for one request's narrative computation.
#[derive(Debug, Clone)]
pub struct HazardEvent {
    pub kind: HazardKind,
    pub location: GeoPoint,
    /// Magnitude for seismic events, maximum wind speed (m/s) for cyclones.
    pub intensity: f64,
    pub issued: String,
}

/// One row of the seismic event list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeEvent {
    pub announced_at: String,
    pub occurred_at: String,
    pub latitude: String,
    pub longitude: String,
    pub location: String,
    pub magnitude: String,
    pub note: String,
    pub map_image: String,
}

/// One row of the cyclone advisory list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyphoonEvent {
    pub announced_at: String,
    pub seq: String,
    pub name: String,
    pub name_en: String,
    pub office: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub direction: String,
    pub speed: String,
    pub pressure: String,
    pub max_wind: String,
}

/// The unified per-request record.
///
/// Every field is independently present or absent; absence is a value, not
/// an error. The record is built once per aggregation run and never shared
/// across requests.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub base_date: Option<String>,
    pub base_time: Option<String>,
    pub fcst_date: Option<String>,
    pub fcst_time: Option<String>,

    // Current-slice short-range values.
    pub temperature: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub sky: Option<String>,
    pub precip_prob: Option<f64>,
    pub precip_type: Option<String>,
    /// Raw PCP text, e.g. `강수없음` or `1mm`.
    pub precip_amount: Option<String>,
    /// Raw SNO text.
    pub snow_amount: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_u: Option<f64>,
    pub wind_v: Option<f64>,
    pub wave_height: Option<f64>,

    // Hourly series.
    pub hourly: Vec<HourlyForecast>,
    pub tomorrow_date: Option<String>,
    pub tomorrow: Vec<HourlyForecast>,
    pub tomorrow_temp_min: Option<f64>,
    pub tomorrow_temp_max: Option<f64>,
    pub day_after_date: Option<String>,
    pub day_after: Vec<HourlyForecast>,
    pub day_after_temp_min: Option<f64>,
    pub day_after_temp_max: Option<f64>,

    // Living indices.
    pub uv_index: Option<String>,
    pub uv_stage: Option<String>,
    pub uv_comment: Option<String>,

    pub oak_pollen_risk: Option<String>,
    pub pine_pollen_risk: Option<String>,
    pub weeds_pollen_risk: Option<String>,
    pub pollen_comment: Option<String>,

    // Particulates.
    pub pm10_value: Option<String>,
    pub pm10_grade: Option<String>,
    pub pm25_value: Option<String>,
    pub pm25_grade: Option<String>,
    pub khai_grade: Option<String>,
    pub dust_comment: Option<String>,

    // Official advisories.
    pub has_warning: bool,
    pub warning_msg: Option<String>,

    // Most recent seismic event.
    pub has_earthquake: bool,
    pub eq_time: Option<String>,
    pub eq_location: Option<String>,
    pub eq_magnitude: Option<String>,
    pub eq_distance: Option<String>,
    pub eq_safety_msg: Option<String>,

    // Active cyclone.
    pub has_typhoon: bool,
    pub typhoon_name: Option<String>,
    pub typhoon_status: Option<String>,
    pub typhoon_time: Option<String>,
    pub typhoon_distance: Option<String>,
    pub typhoon_safety_msg: Option<String>,

    // Solar day cycle.
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub is_daytime: bool,
    pub sun_progress: Option<f64>,

    // Derived values.
    pub sensible_temp: Option<String>,
    pub discomfort_index: Option<String>,
    pub discomfort_stage: Option<String>,
    pub discomfort_comment: Option<String>,

    pub clothing_recommendation: Option<String>,
    pub outfit_icon: Option<String>,
    pub briefing: Option<String>,
    pub music_comment: Option<String>,
    pub youtube_video_id: Option<String>,
    pub bg_image_url: Option<String>,
}

impl WeatherRecord {
    /// One-sentence synthesis of the merged record for the presentation layer.
    #[must_use]
    pub fn weather_summary(&self) -> String {
        let mut out = String::new();

        if self.has_typhoon {
            if let Some(name) = &self.typhoon_name {
                out.push_str(&format!(
                    "🌪️ 현재 태풍 [{name}]가 북상 중입니다. 경로를 확인하세요! "
                ));
            }
        } else if self.has_warning {
            if let Some(msg) = &self.warning_msg {
                let title = msg.split(':').next().unwrap_or("").replace('o', "");
                out.push_str(&format!(
                    "🚨 현재 [{}]가 발효 중입니다. 안전에 유의하세요! ",
                    title.trim()
                ));
            }
        }

        let precip_type = self.precip_type.as_deref();
        if let Some(pty) = precip_type.filter(|p| *p != "강수없음" && *p != "0") {
            out.push_str(match pty {
                "비" => "우산을 챙기세요, 비가 내리고 있습니다.",
                "비/눈" => "비와 눈이 섞여 내리는 궂은 날씨입니다.",
                "눈" => "함박눈이 내리고 있습니다. 미끄러움에 주의하세요.",
                "소나기" => "갑작스러운 소나기가 내리고 있습니다.",
                "빗방울" => "빗방울이 조금씩 떨어지고 있습니다.",
                _ => "현재 비 또는 눈이 오고 있습니다.",
            });
        } else if let Some(sky) = &self.sky {
            match sky.as_str() {
                "맑음" => out.push_str("햇살이 가득한 맑고 화창한 날씨입니다."),
                "구름많음" => out.push_str("구름이 조금 지나가는 날씨입니다."),
                "흐림" => out.push_str("하늘에 구름이 가득해 흐린 날입니다."),
                other => out.push_str(&format!("현재 날씨는 {other}입니다.")),
            }
        } else {
            out.push_str("현재 날씨 정보를 불러오고 있습니다.");
        }

        if let Some(temp) = self.temperature {
            out.push_str(&format!(" 현재 기온은 {temp}°C"));
        }
        if let (Some(min), Some(max)) = (self.temp_min, self.temp_max) {
            out.push_str(&format!(" (최저 {min}° / 최고 {max}°)"));
        }
        out.push_str(" 입니다.");

        if matches!(
            self.uv_stage.as_deref(),
            Some("높음") | Some("매우높음") | Some("위험")
        ) {
            out.push_str(" 자외선이 강하니 차단제를 바르세요.");
        }
        if matches!(self.pm10_grade.as_deref(), Some("3") | Some("4")) {
            out.push_str(" 미세먼지 농도가 높습니다. 마스크를 착용하세요.");
        }

        out
    }

    /// Grade digit to display text for the particulate scale.
    #[must_use]
    pub fn grade_text(grade: Option<&str>) -> &'static str {
        match grade {
            Some("1") => "좋음",
            Some("2") => "보통",
            Some("3") => "나쁨",
            Some("4") => "매우나쁨",
            Some(_) => "정보없음",
            None => "-",
        }
    }
}
