//! Narrative weather briefing: scored first, template on failure.

use tracing::warn;

use crate::fallback;
use crate::scoring::ScoringClient;

pub async fn resolve(
    scoring: &ScoringClient,
    temp: Option<f64>,
    sky: Option<&str>,
    precip_type: Option<&str>,
    precip_prob: Option<f64>,
) -> String {
    let temp = temp.map_or_else(|| "-".to_string(), |t| t.to_string());
    let pop = precip_prob.map_or_else(|| "-".to_string(), |p| p.to_string());
    let sky = sky.unwrap_or("맑음");
    let pty = precip_type.unwrap_or("강수없음");

    match scoring.briefing(&temp, sky, pty, &pop).await {
        Ok(script) => script,
        Err(err) => {
            warn!("briefing scoring unavailable ({err}), using template");
            fallback::briefing(&temp, sky, pty, &pop)
        }
    }
}
