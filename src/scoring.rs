//! Client for the remote scoring service.
//!
//! Three independent endpoints score the briefing script, the outfit
//! recommendation and the music pick; a fourth predicts the apparent
//! temperature. Every call is time-boxed; a timeout, transport error, HTTP
//! failure or missing expected key all read as [`FetchError::ScoringUnavailable`]
//! and the caller falls back to the deterministic substitute.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::SkycastConfig;
use crate::error::{FetchError, FetchResult};

pub struct ScoringClient {
    http: Client,
    base: String,
    budget: Duration,
}

#[derive(Debug, Serialize)]
struct SensibleRequest {
    temp: f64,
    hum: f64,
    wind: f64,
}

#[derive(Debug, Deserialize)]
struct SensibleResponse {
    #[serde(default)]
    sensible_temp: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OutfitRequest<'a> {
    temp: f64,
    pty: &'a str,
}

#[derive(Debug, Deserialize)]
struct OutfitResponse {
    #[serde(default)]
    recommendation: Option<String>,
}

#[derive(Debug, Serialize)]
struct BriefingRequest<'a> {
    temp: &'a str,
    sky: &'a str,
    pty: &'a str,
    pop: &'a str,
}

#[derive(Debug, Deserialize)]
struct BriefingResponse {
    #[serde(default)]
    script: Option<String>,
}

#[derive(Debug, Serialize)]
struct DjRequest<'a> {
    pty: &'a str,
    sky: &'a str,
    hour: u32,
}

#[derive(Debug, Deserialize)]
struct DjResponse {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
    #[serde(default)]
    comment: Option<String>,
}

impl ScoringClient {
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let budget = Duration::from_secs(config.timeouts.scoring_secs);
        let http = Client::builder()
            .timeout(budget)
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create scoring HTTP client")?;

        Ok(Self {
            http,
            base: config.endpoints.scoring_base.clone(),
            budget,
        })
    }

    /// Predicted apparent temperature for the given conditions.
    pub async fn sensible_temp(&self, temp: f64, humidity: f64, wind: f64) -> FetchResult<f64> {
        let response: SensibleResponse = self
            .post(
                "/sensible",
                &SensibleRequest {
                    temp,
                    hum: humidity,
                    wind,
                },
            )
            .await?;
        response
            .sensible_temp
            .ok_or_else(|| FetchError::ScoringUnavailable("missing sensible_temp".to_string()))
    }

    /// Scored outfit recommendation.
    pub async fn outfit(&self, temp: f64, pty: &str) -> FetchResult<String> {
        let response: OutfitResponse = self.post("/predict", &OutfitRequest { temp, pty }).await?;
        response
            .recommendation
            .filter(|r| !r.is_empty())
            .ok_or_else(|| FetchError::ScoringUnavailable("missing recommendation".to_string()))
    }

    /// Scored narrative weather briefing.
    pub async fn briefing(
        &self,
        temp: &str,
        sky: &str,
        pty: &str,
        pop: &str,
    ) -> FetchResult<String> {
        let response: BriefingResponse = self
            .post(
                "/briefing",
                &BriefingRequest {
                    temp,
                    sky,
                    pty,
                    pop,
                },
            )
            .await?;
        response
            .script
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::ScoringUnavailable("missing script".to_string()))
    }

    /// Scored music pick: `(video id, comment)`.
    pub async fn music(&self, pty: &str, sky: &str, hour: u32) -> FetchResult<(String, String)> {
        let response: DjResponse = self.post("/dj", &DjRequest { pty, sky, hour }).await?;
        let video_id = response
            .video_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| FetchError::ScoringUnavailable("missing videoId".to_string()))?;
        let comment = response
            .comment
            .filter(|c| !c.is_empty())
            .ok_or_else(|| FetchError::ScoringUnavailable("missing comment".to_string()))?;
        Ok((video_id, comment))
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> FetchResult<R> {
        let url = format!("{}{path}", self.base);
        let send = self.http.post(&url).json(body).send();

        let response = tokio::time::timeout(self.budget, send)
            .await
            .map_err(|_| FetchError::ScoringUnavailable(format!("{path} timed out")))?
            .map_err(|e| FetchError::ScoringUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ScoringUnavailable(format!(
                "{path} answered HTTP {status}"
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| FetchError::ScoringUnavailable(e.to_string()))
    }
}
