//! Outfit recommendation: scored first, temperature-banded on failure.

use tracing::warn;

use crate::fallback;
use crate::scoring::ScoringClient;

#[derive(Debug)]
pub struct Outfit {
    pub recommendation: String,
    pub icon: &'static str,
}

pub async fn resolve(
    scoring: &ScoringClient,
    temp: Option<f64>,
    precip_type: Option<&str>,
) -> Outfit {
    let icon = fallback::outfit_icon(temp);
    let Some(temp) = temp else {
        return Outfit {
            recommendation: "기온 정보 오류".to_string(),
            icon,
        };
    };

    let pty = precip_type.unwrap_or("강수없음");
    let recommendation = match scoring.outfit(temp, pty).await {
        Ok(recommendation) => recommendation,
        Err(err) => {
            warn!("outfit scoring unavailable ({err}), using temperature bands");
            fallback::outfit(temp, pty)
        }
    };

    Outfit {
        recommendation,
        icon,
    }
}
