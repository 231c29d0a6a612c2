//! Apparent-temperature resolution: scored first, closed-form on failure.

use tracing::warn;

use crate::fallback;
use crate::scoring::ScoringClient;

/// Missing inputs read as 0.0, mirroring the defensive field parsing.
pub async fn resolve(
    scoring: &ScoringClient,
    temp: Option<f64>,
    humidity: Option<f64>,
    wind: Option<f64>,
) -> String {
    let temp = temp.unwrap_or(0.0);
    let humidity = humidity.unwrap_or(0.0);
    let wind = wind.unwrap_or(0.0);

    match scoring.sensible_temp(temp, humidity, wind).await {
        Ok(value) => value.to_string(),
        Err(err) => {
            warn!("apparent-temperature scoring unavailable ({err}), using formula");
            format!("{:.1}", fallback::sensible_temp(temp, humidity, wind))
        }
    }
}
