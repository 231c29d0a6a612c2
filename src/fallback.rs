//! Deterministic closed-form substitutes for every remotely-scored
//! derivation. These are authoritative results in their own right, not a
//! degraded mode: equal inputs always give equal outputs, and none of them
//! can fail.

use crate::providers::has_precipitation;

/// Apparent temperature.
///
/// Three regimes: wind chill for cold windy conditions, a heat-index
/// approximation for hot conditions, and a linear blend otherwise.
/// Temperature in °C, humidity in %, wind in m/s.
#[must_use]
pub fn sensible_temp(temp: f64, humidity: f64, wind: f64) -> f64 {
    if temp <= 10.0 && wind >= 1.3 {
        let wind_kmh_pow = (wind * 3.6).powf(0.16);
        13.12 + 0.6215 * temp - 11.37 * wind_kmh_pow + 0.3965 * temp * wind_kmh_pow
    } else if temp >= 30.0 {
        temp + (humidity - 30.0) / 10.0
    } else {
        temp - wind * 0.5 + (humidity - 50.0) * 0.05
    }
}

/// Outfit recommendation by temperature band, with a precipitation prefix.
#[must_use]
pub fn outfit(temp: f64, pty: &str) -> String {
    let mut out = String::new();

    if matches!(pty, "비" | "비/눈" | "소나기") {
        out.push_str("☔ <b>비가 옵니다!</b> 장화나 레인부츠를 추천해요. ");
    } else if matches!(pty, "눈" | "진눈깨비") {
        out.push_str("⛄ <b>눈이 옵니다!</b> 미끄러지지 않는 신발을 신으세요. ");
    }

    out.push_str(if temp >= 28.0 {
        "민소매, 반바지, 짧은 치마, 린넨 소재의 시원한 옷"
    } else if temp >= 23.0 {
        "반팔 티셔츠, 얇은 셔츠, 반바지, 면바지"
    } else if temp >= 20.0 {
        "얇은 가디건, 긴팔 티셔츠, 면바지, 청바지"
    } else if temp >= 17.0 {
        "얇은 니트, 맨투맨, 가디건, 청바지"
    } else if temp >= 12.0 {
        "자켓, 가디건, 청자켓, 니트, 스타킹, 청바지"
    } else if temp >= 9.0 {
        "트렌치코트, 야상, 점퍼, 니트, 스타킹"
    } else if temp >= 5.0 {
        "울 코트, 히트텍, 가죽 옷, 기모 소재"
    } else {
        "패딩, 두꺼운 코트, 목도리, 장갑, 기모 바지 (완전 무장 필수!)"
    });

    out
}

/// Icon class hint for the outfit band.
#[must_use]
pub fn outfit_icon(temp: Option<f64>) -> &'static str {
    let Some(t) = temp else {
        return "fas fa-question";
    };
    if t >= 23.0 {
        "fas fa-tshirt text-orange-400"
    } else if t >= 17.0 {
        "fas fa-user-tie text-green-500"
    } else if t >= 9.0 {
        "fas fa-user-secret text-blue-500"
    } else {
        "fas fa-snowman text-blue-300"
    }
}

/// Template briefing assembled from the same inputs the scorer receives.
#[must_use]
pub fn briefing(temp: &str, sky: &str, pty: &str, pop: &str) -> String {
    let mut out = String::from("🎤 안녕하세요! 기상정보입니다.<br>");

    if has_precipitation(pty) {
        out.push_str(&format!(
            "현재 ☔ <b>{pty}</b>가 내리고 있습니다. 우산을 챙기세요!<br>"
        ));
    } else {
        out.push_str(&format!("현재 하늘은 <b>{sky}</b> 상태이며, "));
    }

    out.push_str(&format!(
        "기온은 <b>{temp}도</b>, 강수확률은 {pop}%입니다.<br>"
    ));

    let t: f64 = temp.parse().unwrap_or(0.0);
    out.push_str(if t > 28.0 {
        "폭염에 주의하시고 수분을 충분히 섭취하세요. 🧊"
    } else if t < 5.0 {
        "날씨가 많이 춥습니다. 따뜻하게 입으세요! 🧣"
    } else {
        "오늘도 즐거운 하루 보내세요! 😊"
    });

    out
}

/// Fixed playlist pick keyed by precipitation and sky state:
/// `(video id, comment)`.
#[must_use]
pub fn music(pty: &str, sky: &str) -> (&'static str, &'static str) {
    if has_precipitation(pty) {
        (
            "PTXcP6EvMB0",
            "🌧️ 빗소리와 함께 차분한 음악을 준비했어요. (AI 연결 불안정)",
        )
    } else if sky == "맑음" {
        (
            "DRdAgeHuL_g",
            "☀️ 맑은 날엔 신나는 음악이 딱이죠! (기본 추천)",
        )
    } else {
        (
            "3kZd1kHf8bU",
            "☁️ 흐린 날씨에 어울리는 감성적인 곡입니다. (기본 추천)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_wind_chill_regime() {
        // 5°C, 80%, 2.0 m/s sits in the wind-chill regime.
        let result = sensible_temp(5.0, 80.0, 2.0);
        let pow = (2.0_f64 * 3.6).powf(0.16);
        let expected = 13.12 + 0.6215 * 5.0 - 11.37 * pow + 0.3965 * 5.0 * pow;
        assert!((result - expected).abs() < 1e-9);
        // And not the linear blend, which would read warmer.
        assert!((result - (5.0 - 1.0 + 1.5)).abs() > 0.5);
    }

    #[test]
    fn test_wind_chill_boundary_values() {
        // Exactly 10°C and 1.3 m/s still selects wind chill.
        let pow = (1.3_f64 * 3.6).powf(0.16);
        let expected = 13.12 + 0.6215 * 10.0 - 11.37 * pow + 0.3965 * 10.0 * pow;
        assert!((sensible_temp(10.0, 50.0, 1.3) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_heat_regime() {
        // 30°C at 70% humidity reads four degrees hotter.
        assert!((sensible_temp(30.0, 70.0, 5.0) - 34.0).abs() < 1e-9);
        assert!((sensible_temp(33.0, 30.0, 0.0) - 33.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(20.0, 50.0, 2.0, 19.0)]
    #[case(15.0, 70.0, 0.0, 16.0)]
    #[case(12.0, 50.0, 1.0, 11.5)]
    fn test_blend_regime(
        #[case] temp: f64,
        #[case] humidity: f64,
        #[case] wind: f64,
        #[case] expected: f64,
    ) {
        assert!((sensible_temp(temp, humidity, wind) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_calm_cold_air_uses_blend() {
        // Below 1.3 m/s the wind-chill regime must not trigger.
        let result = sensible_temp(5.0, 50.0, 1.0);
        assert!((result - 4.5).abs() < 1e-9);
    }

    #[rstest]
    #[case(30.0, "민소매")]
    #[case(28.0, "민소매")]
    #[case(25.0, "반팔 티셔츠")]
    #[case(21.0, "얇은 가디건")]
    #[case(18.0, "얇은 니트")]
    #[case(14.0, "자켓")]
    #[case(10.0, "트렌치코트")]
    #[case(6.0, "울 코트")]
    #[case(0.0, "패딩")]
    fn test_outfit_bands(#[case] temp: f64, #[case] expected: &str) {
        assert!(outfit(temp, "강수없음").contains(expected));
    }

    #[test]
    fn test_outfit_rain_prefix() {
        let result = outfit(25.0, "비");
        assert!(result.starts_with("☔"));
        assert!(result.contains("반팔 티셔츠"));

        let result = outfit(0.0, "눈");
        assert!(result.starts_with("⛄"));
    }

    #[test]
    fn test_outfit_is_deterministic() {
        assert_eq!(outfit(25.0, "비"), outfit(25.0, "비"));
    }

    #[test]
    fn test_outfit_icon_bands() {
        assert_eq!(outfit_icon(Some(25.0)), "fas fa-tshirt text-orange-400");
        assert_eq!(outfit_icon(Some(18.0)), "fas fa-user-tie text-green-500");
        assert_eq!(outfit_icon(Some(10.0)), "fas fa-user-secret text-blue-500");
        assert_eq!(outfit_icon(Some(-3.0)), "fas fa-snowman text-blue-300");
        assert_eq!(outfit_icon(None), "fas fa-question");
    }

    #[test]
    fn test_briefing_rain_branch() {
        let script = briefing("18", "맑음", "비", "70");
        assert!(script.contains("비"));
        assert!(script.contains("우산"));
        assert!(script.contains("70%"));
        assert!(!script.contains("하늘은"));
    }

    #[test]
    fn test_briefing_clear_branch_and_temp_tail() {
        let script = briefing("30", "맑음", "강수없음", "0");
        assert!(script.contains("하늘은 <b>맑음</b>"));
        assert!(script.contains("폭염"));

        let script = briefing("2", "흐림", "0", "10");
        assert!(script.contains("춥습니다"));
    }

    #[test]
    fn test_music_is_keyed_by_conditions() {
        assert_eq!(music("비", "맑음").0, "PTXcP6EvMB0");
        assert_eq!(music("0", "맑음").0, "DRdAgeHuL_g");
        assert_eq!(music("강수없음", "흐림").0, "3kZd1kHf8bU");
    }
}
