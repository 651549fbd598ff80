use serde::Deserialize;
use thiserror::Error;

// Error body shape shared by OSRM (`{"code": "NoRoute", "message": ".."}`).
#[derive(Deserialize, Debug)]
pub struct ProviderErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    /// Transport failure or timeout talking to an external provider.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    // The provider answered but reported a non-success status
    #[error("API Error (Code {code}): {message}")]
    ApiError { code: String, message: String },

    #[error("Not enough POIs for a scenic route: found {found}, need at least {required}")]
    InsufficientData { found: usize, required: usize },

    #[error("Could not build route: {0}")]
    RouteUnavailable(String),

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Cache I/O failed: {0}")]
    CacheIo(#[from] std::io::Error),
}

impl RoutingError {
    /// Maps a reqwest failure onto the provider taxonomy; timeouts and
    /// connection errors mean the provider is unavailable.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            RoutingError::ProviderUnavailable(err.to_string())
        } else {
            RoutingError::RequestError(err)
        }
    }
}
