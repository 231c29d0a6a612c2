//! End-to-end aggregation with every upstream unreachable.
//!
//! The engine must still return a complete record: provider-backed fields
//! absent, scored derivations replaced by their deterministic fallbacks,
//! sunrise/sunset computed locally. No hard error, ever.

use skycast::providers::PartialResult;
use skycast::{AggregationRequest, Aggregator, GeoPoint, GridPoint, SkycastConfig};

fn dead_end_config() -> SkycastConfig {
    let mut config = SkycastConfig::default();
    // Nothing listens on the discard port; every call fails fast.
    config.endpoints.kma_base = "http://127.0.0.1:9".to_string();
    config.endpoints.air_base = "http://127.0.0.1:9".to_string();
    config.endpoints.sun_url = "http://127.0.0.1:9/json".to_string();
    config.endpoints.scoring_base = "http://127.0.0.1:9".to_string();
    config.timeouts.provider_secs = 2;
    config.timeouts.scoring_secs = 1;
    config.timeouts.max_retries = 0;
    config
}

fn seoul_request() -> AggregationRequest {
    AggregationRequest {
        grid: GridPoint::new(60, 127),
        area_no: "1100000000".to_string(),
        station_id: 108,
        point: GeoPoint::new(37.5665, 126.9780),
    }
}

#[tokio::test]
async fn aggregation_degrades_without_any_upstream() {
    let aggregator = Aggregator::new(&dead_end_config()).unwrap();
    let record = aggregator.fetch(&seoul_request()).await.unwrap();

    // Provider-backed fields are simply absent.
    assert!(record.temperature.is_none());
    assert!(record.sky.is_none());
    assert!(record.hourly.is_empty());
    assert!(!record.has_warning);
    assert!(!record.has_earthquake);
    assert!(!record.has_typhoon);

    // Degraded fields carry their labeled estimates.
    assert_eq!(record.dust_comment.as_deref(), Some("정보 연동 실패"));
    assert_eq!(record.uv_stage.as_deref(), Some("정보없음"));

    // Sunrise/sunset fall back to the local solar computation.
    assert!(record.sunrise.is_some());
    assert!(record.sunset.is_some());
    let progress = record.sun_progress.unwrap();
    assert!((0.0..=100.0).contains(&progress));

    // Scored derivations resolve to their deterministic fallbacks.
    assert_eq!(
        record.clothing_recommendation.as_deref(),
        Some("기온 정보 오류")
    );
    assert_eq!(record.sensible_temp.as_deref(), Some("-2.5"));
    let briefing = record.briefing.as_deref().unwrap();
    assert!(briefing.contains("기상정보"));
    assert!(record.youtube_video_id.is_some());
    assert!(record.music_comment.is_some());
    assert!(record.bg_image_url.is_some());

    // No merged inputs, no discomfort index.
    assert!(record.discomfort_stage.is_none());
}

#[tokio::test]
async fn repeated_degraded_runs_are_deterministic() {
    let aggregator = Aggregator::new(&dead_end_config()).unwrap();
    let request = seoul_request();

    let first = aggregator.fetch(&request).await.unwrap();
    let second = aggregator.fetch(&request).await.unwrap();

    assert_eq!(first.sensible_temp, second.sensible_temp);
    assert_eq!(first.clothing_recommendation, second.clothing_recommendation);
    assert_eq!(first.youtube_video_id, second.youtube_video_id);
    assert_eq!(first.music_comment, second.music_comment);
    assert_eq!(first.dust_comment, second.dust_comment);
}

#[tokio::test]
async fn tomorrow_outlook_degrades_to_failure_value() {
    let aggregator = Aggregator::new(&dead_end_config()).unwrap();
    let outlook = aggregator.tomorrow_outlook(&seoul_request()).await;
    assert!(matches!(outlook, PartialResult::Failed(_)));
}

#[tokio::test]
async fn out_of_range_coordinates_are_the_only_hard_error() {
    let aggregator = Aggregator::new(&dead_end_config()).unwrap();
    let request = AggregationRequest {
        point: GeoPoint::new(123.0, 126.0),
        ..seoul_request()
    };
    assert!(aggregator.fetch(&request).await.is_err());
}
