//! Provider adapters and their shared plumbing.
//!
//! Every adapter issues one bounded-time query, parses the provider's nested
//! success/error envelope and settles into a [`PartialResult`]: a typed
//! payload, an explicit absence, or a local failure. Adapters never raise to
//! the caller; a dead upstream degrades one field group, not the request.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::config::{EndpointConfig, SkycastConfig};
use crate::error::{FetchError, FetchResult};

pub mod dust;
pub mod living;
pub mod pollen;
pub mod quake;
pub mod sun;
pub mod typhoon;
pub mod ultra;
pub mod village;
pub mod warning;

/// Success code shared by the KMA and AirKorea envelopes.
pub const KMA_SUCCESS: &str = "00";

/// Fallback administrative area (Seoul) for the living-index providers.
pub const DEFAULT_AREA: &str = "1100000000";

/// Outcome of one adapter call. Always a value, never an unhandled error.
#[derive(Debug)]
pub enum PartialResult<T> {
    /// The provider answered with usable data.
    Data(T),
    /// The provider answered but has nothing for this window.
    Missing,
    /// The call failed locally (transport, timeout, malformed payload).
    Failed(FetchError),
}

impl<T> PartialResult<T> {
    /// Settle a fetch outcome, logging the degraded paths.
    pub fn settle(source: &str, result: FetchResult<T>) -> Self {
        match result {
            Ok(value) => PartialResult::Data(value),
            Err(FetchError::ProviderEmpty) => {
                debug!("{source}: no data for the current window");
                PartialResult::Missing
            }
            Err(err) => {
                warn!("{source}: {err}");
                PartialResult::Failed(err)
            }
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            PartialResult::Data(value) => Some(value),
            _ => None,
        }
    }
}

/// Shared HTTP client for the upstream providers.
///
/// Built once per process and injected into the coordinator; carries no
/// per-request state.
pub struct ProviderClient {
    http: ClientWithMiddleware,
    service_key: String,
    pub(crate) endpoints: EndpointConfig,
}

impl ProviderClient {
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeouts.provider_secs))
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.timeouts.max_retries);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            service_key: config.service_key.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    pub(crate) fn kma_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoints.kma_base)
    }

    pub(crate) fn service_key(&self) -> &str {
        &self.service_key
    }

    /// One bounded GET, decoded as JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> FetchResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ProviderUnavailable(format!("HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Nested envelope of the KMA public-data APIs:
/// `response.header.resultCode` + `response.body.items.item[]`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct KmaEnvelope<T> {
    pub response: KmaResponse<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct KmaResponse<T> {
    pub header: KmaHeader,
    #[serde(default)]
    pub body: Option<KmaBody<T>>,
}

#[derive(Debug, Deserialize)]
pub struct KmaHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct KmaBody<T> {
    #[serde(default, deserialize_with = "de_items")]
    pub items: Option<KmaItemList<T>>,
}

#[derive(Debug, Deserialize)]
pub struct KmaItemList<T> {
    #[serde(default)]
    pub item: Vec<T>,
}

impl<T> KmaEnvelope<T> {
    /// Items of a successful response. A non-success result code or an empty
    /// item list means the provider has nothing for this window.
    pub fn into_items(self) -> FetchResult<Vec<T>> {
        let header = self.response.header;
        if header.result_code != KMA_SUCCESS {
            debug!(
                "provider result code {} ({})",
                header.result_code, header.result_msg
            );
            return Err(FetchError::ProviderEmpty);
        }

        let items = self
            .response
            .body
            .and_then(|body| body.items)
            .map(|list| list.item)
            .unwrap_or_default();
        if items.is_empty() {
            return Err(FetchError::ProviderEmpty);
        }
        Ok(items)
    }
}

/// AirKorea envelope; same header, but `body.items` is a flat array.
#[derive(Debug, Deserialize)]
pub struct AirEnvelope<T> {
    pub response: AirResponse<T>,
}

#[derive(Debug, Deserialize)]
pub struct AirResponse<T> {
    pub header: KmaHeader,
    #[serde(default)]
    pub body: Option<AirBody<T>>,
}

#[derive(Debug, Deserialize)]
pub struct AirBody<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> AirEnvelope<T> {
    pub fn into_items(self) -> FetchResult<Vec<T>> {
        let header = self.response.header;
        if header.result_code != KMA_SUCCESS {
            debug!(
                "provider result code {} ({})",
                header.result_code, header.result_msg
            );
            return Err(FetchError::ProviderEmpty);
        }

        let items = self.response.body.map(|body| body.items).unwrap_or_default();
        if items.is_empty() {
            return Err(FetchError::ProviderEmpty);
        }
        Ok(items)
    }
}

/// One `(category, value)` pair of a forecast series.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItem {
    #[serde(default)]
    pub category: String,
    #[serde(rename = "fcstDate", default, deserialize_with = "de_text")]
    pub fcst_date: String,
    #[serde(rename = "fcstTime", default, deserialize_with = "de_text")]
    pub fcst_time: String,
    #[serde(rename = "fcstValue", default, deserialize_with = "de_text")]
    pub fcst_value: String,
}

/// Accept a string, number or null where the provider is inconsistent.
pub(crate) fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Some KMA deployments encode an absent item list as `"items": ""`.
fn de_items<'de, D, T>(deserializer: D) -> Result<Option<KmaItemList<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_object() {
        serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Defensive numeric parse; unparsable values resolve to 0.0.
#[must_use]
pub fn parse_numeric(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

/// Precipitation/snowfall text to millimeters.
///
/// The providers mix literal "none" markers with magnitude strings suffixed
/// `mm`/`cm`.
#[must_use]
pub fn parse_precipitation(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.contains("mm") || trimmed.contains("cm") {
        let digits: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        return digits.parse().unwrap_or(0.0);
    }
    if matches!(trimmed, "강수없음" | "적설없음" | "없음") {
        return 0.0;
    }
    trimmed.parse().unwrap_or(0.0)
}

const SKY_LABELS: &[(&str, &str)] = &[("1", "맑음"), ("3", "구름많음"), ("4", "흐림")];

const PTY_LABELS: &[(&str, &str)] = &[
    ("0", "강수없음"),
    ("1", "비"),
    ("2", "비/눈"),
    ("3", "눈"),
    ("4", "소나기"),
];

fn label_for(table: &[(&str, &str)], code: &str) -> String {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map_or_else(|| code.to_string(), |(_, label)| (*label).to_string())
}

/// Sky-state code to display label; unknown codes pass through unchanged.
#[must_use]
pub fn sky_label(code: &str) -> String {
    label_for(SKY_LABELS, code)
}

/// Precipitation-type code to display label; unknown codes pass through.
#[must_use]
pub fn pty_label(code: &str) -> String {
    label_for(PTY_LABELS, code)
}

/// Whether a precipitation-type label (or code) denotes active precipitation.
#[must_use]
pub fn has_precipitation(pty: &str) -> bool {
    !matches!(pty, "0" | "강수없음" | "정보 없음")
}

/// `yyyyMMddHHmm...` notice stamp to the `MM.dd HH:mm` display form.
#[must_use]
pub fn format_notice_time(raw: &str) -> String {
    if raw.len() < 12 || !raw.is_ascii() {
        return raw.to_string();
    }
    format!(
        "{}.{} {}:{}",
        &raw[4..6],
        &raw[6..8],
        &raw[8..10],
        &raw[10..12]
    )
}

/// Administrative area code, falling back to Seoul when malformed.
#[must_use]
pub fn safe_area(area_no: &str) -> &str {
    if area_no.len() == 10 {
        area_no
    } else {
        DEFAULT_AREA
    }
}
