use thiserror::Error;

/// Error taxonomy for provider and scoring calls.
///
/// Every variant is recovered at its point of origin: adapters turn these
/// into an absent field, derivations turn them into a deterministic
/// fallback value. Only `Validation` can surface to a caller.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("provider returned no data")]
    ProviderEmpty,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("scoring service unavailable: {0}")]
    ScoringUnavailable(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::ProviderUnavailable(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for FetchError {
    fn from(err: reqwest_middleware::Error) -> Self {
        FetchError::ProviderUnavailable(err.to_string())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
