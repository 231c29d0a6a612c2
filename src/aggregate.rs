//! Aggregation coordinator.
//!
//! One request fans out every provider adapter concurrently, joins on all of
//! them, merges the partial results into a [`WeatherRecord`], then runs the
//! derivation round (apparent temperature, discomfort index, scored
//! briefing/outfit/music with deterministic fallbacks). A request degrades
//! field by field; it only errors when the input coordinates are unusable.

use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};
use tracing::info;

use crate::config::SkycastConfig;
use crate::derive::{briefing, clothing, discomfort, hazard, music, scene, sensible};
use crate::error::{FetchError, FetchResult};
use crate::geo::{self, GeoPoint, GridPoint};
use crate::providers::dust::{self, DustReading};
use crate::providers::living::{self, UvReading};
use crate::providers::pollen::{self, PollenReport};
use crate::providers::quake::{self, QuakeNotice};
use crate::providers::sun::{self, SunTimes};
use crate::providers::typhoon::{self, TyphoonNotice};
use crate::providers::ultra::{self, UltraForecast};
use crate::providers::village::{self, VillageForecast};
use crate::providers::warning::{self, WeatherWarning};
use crate::providers::{PartialResult, ProviderClient};
use crate::record::{EarthquakeEvent, HazardEvent, HazardKind, TyphoonEvent, WeatherRecord};
use crate::scoring::ScoringClient;
use crate::window;

/// Inputs for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    /// Forecast grid cell.
    pub grid: GridPoint,
    /// Administrative area code for the living indices.
    pub area_no: String,
    /// Advisory station id.
    pub station_id: i32,
    /// The user's location, for hazard proximity.
    pub point: GeoPoint,
}

/// Drives the provider fan-out and the derivation round.
///
/// Holds only read-only shared clients; safe to reuse across requests.
pub struct Aggregator {
    providers: ProviderClient,
    scoring: ScoringClient,
    dust_sido: String,
}

impl Aggregator {
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        Ok(Self {
            providers: ProviderClient::new(config)?,
            scoring: ScoringClient::new(config)?,
            dust_sido: config.dust_sido.clone(),
        })
    }

    /// Run one aggregation for the current wall-clock time.
    pub async fn fetch(&self, request: &AggregationRequest) -> FetchResult<WeatherRecord> {
        validate(request)?;
        Ok(self.fetch_at(request, window::now_seoul()).await)
    }

    async fn fetch_at(&self, request: &AggregationRequest, now: NaiveDateTime) -> WeatherRecord {
        info!(
            "aggregating grid ({}, {}) area {} station {}",
            request.grid.x, request.grid.y, request.area_no, request.station_id
        );

        // The sunrise provider wants geographic coordinates for the cell.
        let cell_point = geo::grid_to_geo(&request.grid);

        let (village, ultra, uv, pollen, sun, dust, warning, quake, typhoon) = tokio::join!(
            village::fetch(&self.providers, request.grid, now),
            ultra::fetch(&self.providers, request.grid, now),
            living::fetch(&self.providers, &request.area_no, now),
            pollen::fetch(&self.providers, &request.area_no, now),
            sun::fetch(&self.providers, cell_point, now),
            dust::fetch(&self.providers, &self.dust_sido),
            warning::fetch(&self.providers, request.station_id),
            quake::latest(&self.providers, now),
            typhoon::latest(&self.providers, now),
        );

        let mut record = merge(
            &request.point,
            SettledProviders {
                village,
                ultra,
                uv,
                pollen,
                sun,
                dust,
                warning,
                quake,
                typhoon,
            },
        );

        self.derive(&mut record, now).await;
        record
    }

    /// Second round: derivations that need the merged record, the scored
    /// ones running concurrently behind their own join.
    async fn derive(&self, record: &mut WeatherRecord, now: NaiveDateTime) {
        record.sensible_temp = Some(
            sensible::resolve(
                &self.scoring,
                record.temperature,
                record.humidity,
                record.wind_speed,
            )
            .await,
        );

        discomfort::apply(record);

        let hour = now.hour();
        let (script, pick) = tokio::join!(
            briefing::resolve(
                &self.scoring,
                record.temperature,
                record.sky.as_deref(),
                record.precip_type.as_deref(),
                record.precip_prob,
            ),
            music::resolve(
                &self.scoring,
                record.precip_type.as_deref(),
                record.sky.as_deref(),
                hour,
            ),
        );
        record.briefing = Some(script);
        record.youtube_video_id = Some(pick.video_id);
        record.music_comment = Some(pick.comment);

        let outfit = clothing::resolve(
            &self.scoring,
            record.temperature,
            record.precip_type.as_deref(),
        )
        .await;
        record.clothing_recommendation = Some(outfit.recommendation);
        record.outfit_icon = Some(outfit.icon.to_string());

        record.bg_image_url = Some(
            scene::background_image(record.precip_type.as_deref(), record.sky.as_deref(), hour)
                .to_string(),
        );
    }

    /// Seismic events announced in the last 30 days.
    pub async fn earthquake_list(&self) -> Vec<EarthquakeEvent> {
        quake::recent_events(&self.providers, window::now_seoul()).await
    }

    /// Cyclone advisories issued in the last 30 days.
    pub async fn typhoon_list(&self) -> Vec<TyphoonEvent> {
        typhoon::recent_events(&self.providers, window::now_seoul()).await
    }

    /// Tomorrow's solar outlook for the same grid cell.
    pub async fn tomorrow_outlook(
        &self,
        request: &AggregationRequest,
    ) -> PartialResult<crate::solar::TomorrowOutlook> {
        crate::solar::tomorrow_outlook(
            &self.providers,
            request.grid,
            request.point,
            window::now_seoul(),
        )
        .await
    }
}

fn validate(request: &AggregationRequest) -> FetchResult<()> {
    let GeoPoint {
        latitude,
        longitude,
    } = request.point;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(FetchError::Validation(format!(
            "latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(FetchError::Validation(format!(
            "longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

/// Everything the fan-out settled on, ready to merge.
pub(crate) struct SettledProviders {
    pub village: PartialResult<VillageForecast>,
    pub ultra: PartialResult<UltraForecast>,
    pub uv: PartialResult<UvReading>,
    pub pollen: PartialResult<PollenReport>,
    pub sun: SunTimes,
    pub dust: PartialResult<DustReading>,
    pub warning: PartialResult<WeatherWarning>,
    pub quake: PartialResult<QuakeNotice>,
    pub typhoon: PartialResult<TyphoonNotice>,
}

/// Field-by-field merge. Absence stays absence; merges are commutative
/// except that the short-range forecast owns the current-slice fields.
pub(crate) fn merge(observer: &GeoPoint, settled: SettledProviders) -> WeatherRecord {
    let mut record = WeatherRecord::default();

    if let Some(v) = settled.village.into_option() {
        record.base_date = Some(v.base_date);
        record.base_time = Some(v.base_time);
        record.fcst_date = v.fcst_date;
        record.fcst_time = v.fcst_time;
        record.temperature = v.temperature;
        record.temp_min = v.temp_min;
        record.temp_max = v.temp_max;
        record.sky = v.sky;
        record.precip_prob = v.precip_prob;
        record.precip_type = v.precip_type;
        record.precip_amount = v.precip_amount;
        record.snow_amount = v.snow_amount;
        record.humidity = v.humidity;
        record.wind_speed = v.wind_speed;
        record.wind_direction = v.wind_direction;
        record.wind_u = v.wind_u;
        record.wind_v = v.wind_v;
        record.wave_height = v.wave_height;
        record.tomorrow_date = Some(v.tomorrow_date);
        record.tomorrow = v.tomorrow;
        record.tomorrow_temp_min = v.tomorrow_temp_min;
        record.tomorrow_temp_max = v.tomorrow_temp_max;
        record.day_after_date = Some(v.day_after_date);
        record.day_after = v.day_after;
        record.day_after_temp_min = v.day_after_temp_min;
        record.day_after_temp_max = v.day_after_temp_max;
    }

    if let Some(u) = settled.ultra.into_option() {
        record.hourly = u.hourly;
    }

    match settled.uv {
        PartialResult::Data(uv) => {
            record.uv_index = Some(uv.index);
            record.uv_stage = Some(uv.stage.to_string());
            record.uv_comment = Some(uv.comment.to_string());
        }
        PartialResult::Missing => {}
        PartialResult::Failed(_) => {
            record.uv_index = Some("0".to_string());
            record.uv_stage = Some("정보없음".to_string());
            record.uv_comment = Some("정보를 불러올 수 없습니다.".to_string());
        }
    }

    if let Some(pollen) = settled.pollen.into_option() {
        record.oak_pollen_risk = pollen.oak;
        record.pine_pollen_risk = pollen.pine;
        record.weeds_pollen_risk = pollen.weeds;
        record.pollen_comment = Some(pollen.comment);
    }

    record.sunrise = Some(settled.sun.sunrise);
    record.sunset = Some(settled.sun.sunset);
    record.is_daytime = settled.sun.is_daytime;
    record.sun_progress = Some(settled.sun.progress);

    match settled.dust {
        PartialResult::Data(reading) => {
            record.pm10_value = Some(reading.pm10_value);
            record.pm10_grade = Some(reading.pm10_grade);
            record.pm25_value = Some(reading.pm25_value);
            record.pm25_grade = Some(reading.pm25_grade);
            record.khai_grade = Some(reading.khai_grade);
            record.dust_comment = Some(reading.comment);
        }
        PartialResult::Missing => {
            record.dust_comment = Some(dust::MEASURING_COMMENT.to_string());
        }
        PartialResult::Failed(_) => {
            record.dust_comment = Some("정보 연동 실패".to_string());
        }
    }

    if let Some(warning) = settled.warning.into_option() {
        record.has_warning = true;
        record.warning_msg = Some(warning.message);
    }

    if let Some(notice) = settled.quake.into_option() {
        merge_quake(&mut record, notice, observer);
    }
    if let Some(notice) = settled.typhoon.into_option() {
        merge_typhoon(&mut record, notice, observer);
    }

    record
}

fn merge_quake(record: &mut WeatherRecord, notice: QuakeNotice, observer: &GeoPoint) {
    record.has_earthquake = true;
    record.eq_time = Some(notice.time.clone());
    record.eq_location = Some(notice.location);
    record.eq_magnitude = Some(notice.magnitude.clone());

    if notice.latitude == 0.0 || notice.longitude == 0.0 {
        record.eq_distance = Some("위치불명".to_string());
        record.eq_safety_msg = Some("지진 위치 정보가 정확하지 않습니다.".to_string());
        return;
    }

    match notice.magnitude.trim().parse::<f64>() {
        Ok(magnitude) => {
            let event = HazardEvent {
                kind: HazardKind::Seismic,
                location: GeoPoint::new(notice.latitude, notice.longitude),
                intensity: magnitude,
                issued: notice.time,
            };
            let (distance, narrative) = hazard::assess(&event, observer);
            record.eq_distance = Some(format!("{distance:.1}km"));
            record.eq_safety_msg = Some(narrative.to_string());
        }
        Err(_) => {
            record.eq_distance = Some("-".to_string());
            record.eq_safety_msg = Some("데이터 분석 중 오류 발생".to_string());
        }
    }
}

fn merge_typhoon(record: &mut WeatherRecord, notice: TyphoonNotice, observer: &GeoPoint) {
    record.has_typhoon = true;
    record.typhoon_name = Some(notice.name);
    record.typhoon_status = Some(notice.status);
    record.typhoon_time = Some(notice.time.clone());

    if notice.latitude == 0.0 || notice.longitude == 0.0 {
        record.typhoon_distance = Some("-".to_string());
        record.typhoon_safety_msg = Some("경로 분석 중...".to_string());
        return;
    }

    let event = HazardEvent {
        kind: HazardKind::Cyclone,
        location: GeoPoint::new(notice.latitude, notice.longitude),
        intensity: notice.wind_speed,
        issued: notice.time,
    };
    let (distance, narrative) = hazard::assess(&event, observer);
    record.typhoon_distance = Some(format!("{distance:.0}km"));
    record.typhoon_safety_msg = Some(narrative.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::record::HourlyForecast;

    fn observer() -> GeoPoint {
        GeoPoint::new(37.5665, 126.9780)
    }

    fn empty_settled() -> SettledProviders {
        SettledProviders {
            village: PartialResult::Missing,
            ultra: PartialResult::Missing,
            uv: PartialResult::Missing,
            pollen: PartialResult::Missing,
            sun: SunTimes {
                sunrise: "05:30".to_string(),
                sunset: "19:50".to_string(),
                is_daytime: true,
                progress: 42.0,
            },
            dust: PartialResult::Missing,
            warning: PartialResult::Missing,
            quake: PartialResult::Missing,
            typhoon: PartialResult::Missing,
        }
    }

    #[test]
    fn test_merge_all_missing_still_yields_record() {
        let record = merge(&observer(), empty_settled());
        assert!(record.temperature.is_none());
        assert!(!record.has_warning);
        assert!(!record.has_earthquake);
        assert!(!record.has_typhoon);
        assert_eq!(record.sunrise.as_deref(), Some("05:30"));
        assert_eq!(record.sun_progress, Some(42.0));
        // Absent particulate data resolves to the measuring sentinel.
        assert_eq!(record.dust_comment.as_deref(), Some("미세먼지 측정 중..."));
    }

    #[test]
    fn test_merge_village_owns_current_slice() {
        let mut settled = empty_settled();
        settled.village = PartialResult::Data(VillageForecast {
            base_date: "20250714".to_string(),
            base_time: "1100".to_string(),
            temperature: Some(28.0),
            sky: Some("맑음".to_string()),
            precip_type: Some("강수없음".to_string()),
            humidity: Some(55.0),
            ..Default::default()
        });
        settled.ultra = PartialResult::Data(UltraForecast {
            hourly: vec![HourlyForecast {
                fcst_time: "1500".to_string(),
                ..Default::default()
            }],
        });

        let record = merge(&observer(), settled);
        assert_eq!(record.temperature, Some(28.0));
        assert_eq!(record.sky.as_deref(), Some("맑음"));
        assert_eq!(record.hourly.len(), 1);
        assert_eq!(record.base_time.as_deref(), Some("1100"));
    }

    #[test]
    fn test_merge_uv_failure_is_labeled() {
        let mut settled = empty_settled();
        settled.uv = PartialResult::Failed(FetchError::ProviderUnavailable("down".to_string()));
        let record = merge(&observer(), settled);
        assert_eq!(record.uv_stage.as_deref(), Some("정보없음"));
        assert_eq!(record.uv_index.as_deref(), Some("0"));
    }

    #[test]
    fn test_merge_dust_failure_vs_missing() {
        let mut settled = empty_settled();
        settled.dust = PartialResult::Failed(FetchError::ProviderUnavailable("down".to_string()));
        let record = merge(&observer(), settled);
        assert_eq!(record.dust_comment.as_deref(), Some("정보 연동 실패"));
        assert!(record.pm10_grade.is_none());
    }

    #[test]
    fn test_merge_quake_computes_distance_and_narrative() {
        let mut settled = empty_settled();
        settled.quake = PartialResult::Data(QuakeNotice {
            time: "07.14 11:30".to_string(),
            location: "경북 경주시 남남서쪽".to_string(),
            magnitude: "5.2".to_string(),
            // ~40 km south of the observer.
            latitude: 37.2065,
            longitude: 126.9780,
        });
        let record = merge(&observer(), settled);
        assert!(record.has_earthquake);
        let distance: f64 = record
            .eq_distance
            .as_deref()
            .unwrap()
            .trim_end_matches("km")
            .parse()
            .unwrap();
        assert!((35.0..=45.0).contains(&distance));
        assert_eq!(
            record.eq_safety_msg.as_deref(),
            Some("🚨 위험! 낙하물에 주의하고 즉시 안전한 곳으로 대피하세요.")
        );
    }

    #[test]
    fn test_merge_quake_without_coordinates() {
        let mut settled = empty_settled();
        settled.quake = PartialResult::Data(QuakeNotice {
            time: "07.14 11:30".to_string(),
            location: "동해".to_string(),
            magnitude: "3.1".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        });
        let record = merge(&observer(), settled);
        assert_eq!(record.eq_distance.as_deref(), Some("위치불명"));
        assert_eq!(
            record.eq_safety_msg.as_deref(),
            Some("지진 위치 정보가 정확하지 않습니다.")
        );
    }

    #[test]
    fn test_merge_quake_with_bad_magnitude() {
        let mut settled = empty_settled();
        settled.quake = PartialResult::Data(QuakeNotice {
            time: "07.14 11:30".to_string(),
            location: "동해".to_string(),
            magnitude: "규모미상".to_string(),
            latitude: 36.0,
            longitude: 129.0,
        });
        let record = merge(&observer(), settled);
        assert_eq!(record.eq_distance.as_deref(), Some("-"));
        assert_eq!(
            record.eq_safety_msg.as_deref(),
            Some("데이터 분석 중 오류 발생")
        );
    }

    #[test]
    fn test_merge_typhoon_narrative() {
        let mut settled = empty_settled();
        settled.typhoon = PartialResult::Data(TyphoonNotice {
            name: "제5호 장미".to_string(),
            status: "현재 활동 중 (제주 남쪽 해상)".to_string(),
            time: "08.05 10:00".to_string(),
            latitude: 35.5,
            longitude: 127.5,
            wind_speed: 35.0,
        });
        let record = merge(&observer(), settled);
        assert!(record.has_typhoon);
        assert_eq!(record.typhoon_name.as_deref(), Some("제5호 장미"));
        assert_eq!(
            record.typhoon_safety_msg.as_deref(),
            Some("🚨 태풍의 직접 영향권입니다! 외출을 자제하세요.")
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_coordinates() {
        let request = AggregationRequest {
            grid: GridPoint::new(60, 127),
            area_no: "1100000000".to_string(),
            station_id: 108,
            point: GeoPoint::new(95.0, 126.0),
        };
        assert!(matches!(
            validate(&request),
            Err(FetchError::Validation(_))
        ));

        let request = AggregationRequest {
            point: GeoPoint::new(37.5, 200.0),
            ..request
        };
        assert!(validate(&request).is_err());
    }
}
