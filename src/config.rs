//! Configuration for the aggregation engine.
//!
//! Settings come from an optional TOML file with environment overrides for
//! the service key; every field has a sensible default so the engine runs
//! with no file at all.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Environment variable override for the public-data service key.
pub const SERVICE_KEY_ENV: &str = "SKYCAST_SERVICE_KEY";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Service key issued by the public-data portal.
    #[serde(default)]
    pub service_key: String,
    /// Sido name used for the particulate query.
    #[serde(default = "default_dust_sido")]
    pub dust_sido: String,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Log level (error, warn, info, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Upstream endpoint bases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// KMA public-data API base.
    #[serde(default = "default_kma_base")]
    pub kma_base: String,
    /// AirKorea particulate API base.
    #[serde(default = "default_air_base")]
    pub air_base: String,
    /// Sunrise/sunset provider endpoint.
    #[serde(default = "default_sun_url")]
    pub sun_url: String,
    /// Remote scoring server base.
    #[serde(default = "default_scoring_base")]
    pub scoring_base: String,
}

/// Time budgets for network-bound operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Per-call budget for provider queries, seconds.
    #[serde(default = "default_provider_timeout")]
    pub provider_secs: u64,
    /// Per-call budget for scoring queries, seconds.
    #[serde(default = "default_scoring_timeout")]
    pub scoring_secs: u64,
    /// Transient-failure retries on provider calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_dust_sido() -> String {
    "서울".to_string()
}

fn default_kma_base() -> String {
    "http://apis.data.go.kr/1360000".to_string()
}

fn default_air_base() -> String {
    "http://apis.data.go.kr/B552584".to_string()
}

fn default_sun_url() -> String {
    "https://api.sunrise-sunset.org/json".to_string()
}

fn default_scoring_base() -> String {
    "http://localhost:5000".to_string()
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_scoring_timeout() -> u64 {
    3
}

fn default_max_retries() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            kma_base: default_kma_base(),
            air_base: default_air_base(),
            sun_url: default_sun_url(),
            scoring_base: default_scoring_base(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            provider_secs: default_provider_timeout(),
            scoring_secs: default_scoring_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            service_key: String::new(),
            dust_sido: default_dust_sido(),
            endpoints: EndpointConfig::default(),
            timeouts: TimeoutConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl SkycastConfig {
    /// Load from `config.toml` in the working directory, if present, then
    /// apply environment overrides and validate.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load from an explicit path; a missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(SERVICE_KEY_ENV) {
            config.service_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate numeric ranges and endpoint shapes.
    pub fn validate(&self) -> Result<()> {
        if self.timeouts.provider_secs == 0 || self.timeouts.provider_secs > 120 {
            return Err(FetchError::Validation(
                "provider timeout must be between 1 and 120 seconds".to_string(),
            )
            .into());
        }
        if self.timeouts.scoring_secs == 0 || self.timeouts.scoring_secs > 60 {
            return Err(FetchError::Validation(
                "scoring timeout must be between 1 and 60 seconds".to_string(),
            )
            .into());
        }
        if self.timeouts.max_retries > 10 {
            return Err(
                FetchError::Validation("max retries cannot exceed 10".to_string()).into(),
            );
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(FetchError::Validation(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ))
            .into());
        }

        for url in [
            &self.endpoints.kma_base,
            &self.endpoints.air_base,
            &self.endpoints.sun_url,
            &self.endpoints.scoring_base,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FetchError::Validation(format!(
                    "endpoint '{url}' must be an HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SkycastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dust_sido, "서울");
        assert_eq!(config.endpoints.kma_base, "http://apis.data.go.kr/1360000");
        assert_eq!(config.timeouts.provider_secs, 10);
        assert_eq!(config.timeouts.scoring_secs, 3);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = SkycastConfig::load_from_path("does-not-exist.toml").unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: SkycastConfig = toml::from_str(
            r#"
            service_key = "abc"

            [timeouts]
            provider_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(parsed.service_key, "abc");
        assert_eq!(parsed.timeouts.provider_secs, 5);
        assert_eq!(parsed.timeouts.scoring_secs, 3);
        assert_eq!(parsed.endpoints.scoring_base, "http://localhost:5000");
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = SkycastConfig {
            timeouts: TimeoutConfig {
                provider_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let config = SkycastConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn test_validation_rejects_non_http_endpoint() {
        let mut config = SkycastConfig::default();
        config.endpoints.scoring_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
