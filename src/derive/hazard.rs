//! Hazard-proximity safety narratives.
//!
//! A fixed decision tree over (intensity, distance) bands; the output is
//! always one of the canned advisory sentences, never blank.

use crate::geo::{self, GeoPoint};
use crate::record::{HazardEvent, HazardKind};

/// Distance to the event and the narrative for it.
#[must_use]
pub fn assess(event: &HazardEvent, observer: &GeoPoint) -> (f64, &'static str) {
    let distance = geo::distance_km(observer, &event.location);
    let narrative = match event.kind {
        HazardKind::Seismic => earthquake_narrative(event.intensity, distance),
        HazardKind::Cyclone => typhoon_narrative(event.intensity, distance),
    };
    (distance, narrative)
}

#[must_use]
pub fn earthquake_narrative(magnitude: f64, distance_km: f64) -> &'static str {
    if distance_km > 500.0 {
        return "거리가 멀어 영향이 거의 없습니다. 안심하세요.";
    }
    if magnitude >= 5.0 {
        if distance_km < 100.0 {
            "🚨 위험! 낙하물에 주의하고 즉시 안전한 곳으로 대피하세요."
        } else {
            "진동이 느껴질 수 있습니다. 뉴스를 주시하세요."
        }
    } else if magnitude >= 3.0 {
        if distance_km < 50.0 {
            "건물이 흔들릴 수 있습니다. 주의가 필요합니다."
        } else {
            "민감한 분들은 진동을 느낄 수 있습니다."
        }
    } else {
        "규모가 작아 별다른 피해는 없을 것으로 예상됩니다."
    }
}

#[must_use]
pub fn typhoon_narrative(wind_speed: f64, distance_km: f64) -> &'static str {
    if distance_km > 800.0 {
        return "아직 거리가 멉니다. 태풍 정보를 주시하세요.";
    }
    if distance_km < 300.0 {
        if wind_speed > 30.0 {
            "🚨 태풍의 직접 영향권입니다! 외출을 자제하세요."
        } else {
            "태풍이 접근 중입니다. 비바람에 주의하세요."
        }
    } else {
        "태풍의 간접 영향이 있을 수 있습니다. 우산을 챙기세요."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5.2, 40.0, "🚨 위험! 낙하물에 주의하고 즉시 안전한 곳으로 대피하세요.")]
    #[case(5.0, 99.9, "🚨 위험! 낙하물에 주의하고 즉시 안전한 곳으로 대피하세요.")]
    #[case(5.0, 150.0, "진동이 느껴질 수 있습니다. 뉴스를 주시하세요.")]
    #[case(3.5, 40.0, "건물이 흔들릴 수 있습니다. 주의가 필요합니다.")]
    #[case(3.5, 80.0, "민감한 분들은 진동을 느낄 수 있습니다.")]
    #[case(2.0, 20.0, "규모가 작아 별다른 피해는 없을 것으로 예상됩니다.")]
    #[case(7.0, 501.0, "거리가 멀어 영향이 거의 없습니다. 안심하세요.")]
    fn test_earthquake_bands(
        #[case] magnitude: f64,
        #[case] distance: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(earthquake_narrative(magnitude, distance), expected);
    }

    #[rstest]
    #[case(35.0, 200.0, "🚨 태풍의 직접 영향권입니다! 외출을 자제하세요.")]
    #[case(25.0, 200.0, "태풍이 접근 중입니다. 비바람에 주의하세요.")]
    #[case(35.0, 500.0, "태풍의 간접 영향이 있을 수 있습니다. 우산을 챙기세요.")]
    #[case(35.0, 900.0, "아직 거리가 멉니다. 태풍 정보를 주시하세요.")]
    fn test_typhoon_bands(#[case] wind: f64, #[case] distance: f64, #[case] expected: &str) {
        assert_eq!(typhoon_narrative(wind, distance), expected);
    }

    #[test]
    fn test_assess_computes_distance() {
        let observer = GeoPoint::new(37.5665, 126.9780);
        let event = HazardEvent {
            kind: HazardKind::Seismic,
            location: GeoPoint::new(35.1796, 129.0756),
            intensity: 5.2,
            issued: "07.14 11:30".to_string(),
        };
        let (distance, narrative) = assess(&event, &observer);
        assert!((320.0..=330.0).contains(&distance));
        // Strong but far: the watch-the-news branch.
        assert_eq!(narrative, "진동이 느껴질 수 있습니다. 뉴스를 주시하세요.");
    }
}
