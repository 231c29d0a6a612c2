//! Background scene selection for the presentation layer.

const DEFAULT_DAY: &str = "https://images.unsplash.com/photo-1622396481328-9b1b78cdd9fd?q=80&w=1974&auto=format&fit=crop";
const RAIN_NIGHT: &str = "https://images.unsplash.com/photo-1702898044318-573fddbea718?q=80&w=1170&auto=format&fit=crop";
const RAIN_DAY: &str = "https://images.unsplash.com/photo-1655271528290-864e38f715d8?q=80&w=1170&auto=format&fit=crop";
const SNOW_NIGHT: &str = "https://images.unsplash.com/photo-1519692933481-e162a57d6721?q=80&w=2070&auto=format&fit=crop";
const SNOW_DAY: &str = "https://images.unsplash.com/photo-1705989277853-e146af1d029a?q=80&w=735&auto=format&fit=crop";
const CLOUDY_NIGHT: &str = "https://images.unsplash.com/photo-1532349150739-cb439f9a34a3?q=80&w=1170&auto=format&fit=crop";
const CLEAR_NIGHT: &str = "https://images.unsplash.com/photo-1509773896068-7fd415d91e2e?q=80&w=2069&auto=format&fit=crop";
const OVERCAST_DAY: &str = "https://images.unsplash.com/photo-1496285181113-d59aaf3ea20f?q=80&w=1170&auto=format&fit=crop";
const CLOUDY_DAY: &str = "https://images.unsplash.com/photo-1501630834273-4b5604d2ee31?q=80&w=1170&auto=format&fit=crop";
const CLEAR_DAY: &str = "https://images.unsplash.com/photo-1601297183305-6df142704ea2?q=80&w=1074&auto=format&fit=crop";

#[must_use]
pub fn is_night(hour: u32) -> bool {
    hour >= 19 || hour <= 6
}

/// Scene URL keyed by precipitation, sky state and the hour of day.
#[must_use]
pub fn background_image(pty: Option<&str>, sky: Option<&str>, hour: u32) -> &'static str {
    let night = is_night(hour);

    if matches!(pty, Some("비" | "비/눈" | "소나기" | "빗방울")) {
        return if night { RAIN_NIGHT } else { RAIN_DAY };
    }
    if matches!(pty, Some("눈" | "진눈깨비" | "눈날림")) {
        return if night { SNOW_NIGHT } else { SNOW_DAY };
    }

    if night {
        match sky {
            Some("흐림" | "구름많음") => CLOUDY_NIGHT,
            _ => CLEAR_NIGHT,
        }
    } else {
        match sky {
            Some("흐림") => OVERCAST_DAY,
            Some("구름많음") => CLOUDY_DAY,
            Some(_) => CLEAR_DAY,
            None => DEFAULT_DAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_night_bounds() {
        assert!(is_night(19));
        assert!(is_night(23));
        assert!(is_night(0));
        assert!(is_night(6));
        assert!(!is_night(7));
        assert!(!is_night(18));
    }

    #[test]
    fn test_rain_beats_sky_state() {
        assert_eq!(background_image(Some("비"), Some("맑음"), 12), RAIN_DAY);
        assert_eq!(background_image(Some("소나기"), Some("맑음"), 22), RAIN_NIGHT);
    }

    #[test]
    fn test_snow_scenes() {
        assert_eq!(background_image(Some("눈"), None, 12), SNOW_DAY);
        assert_eq!(background_image(Some("진눈깨비"), None, 2), SNOW_NIGHT);
    }

    #[test]
    fn test_dry_scenes_follow_sky_and_hour() {
        assert_eq!(background_image(Some("강수없음"), Some("맑음"), 12), CLEAR_DAY);
        assert_eq!(
            background_image(Some("강수없음"), Some("구름많음"), 12),
            CLOUDY_DAY
        );
        assert_eq!(
            background_image(Some("강수없음"), Some("흐림"), 12),
            OVERCAST_DAY
        );
        assert_eq!(
            background_image(Some("강수없음"), Some("흐림"), 22),
            CLOUDY_NIGHT
        );
        assert_eq!(background_image(None, Some("맑음"), 23), CLEAR_NIGHT);
    }

    #[test]
    fn test_no_data_defaults() {
        assert_eq!(background_image(None, None, 12), DEFAULT_DAY);
    }
}
