use std::time::Duration;

use thiserror::Error;

/// Failure of a single provider call.
///
/// Every variant names the provider so callers can log and report it
/// without extra context. None of these abort a lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: timed out after {after:?}")]
    Timeout {
        provider: &'static str,
        after: Duration,
    },

    #[error("{provider}: unexpected HTTP status {status}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    #[error("{provider}: API key rejected")]
    Unauthorized { provider: &'static str },

    #[error("{provider}: credits exhausted ({detail})")]
    QuotaExhausted {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider}: account not found")]
    NotFound { provider: &'static str },

    #[error("{provider}: API error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    #[error("{provider}: no data: {reason}")]
    NoData {
        provider: &'static str,
        reason: String,
    },

    #[error("JSON deserialization error from {provider}: {source}")]
    Deserialize {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider}: lookup requires a {field}")]
    MissingInput {
        provider: &'static str,
        field: &'static str,
    },

    #[error("{provider}: invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl {
        provider: &'static str,
        base_url: String,
        reason: String,
    },
}

impl ProviderError {
    /// Wrap a `reqwest` failure, folding client-side timeouts into
    /// [`ProviderError::Timeout`].
    pub(crate) fn http(provider: &'static str, timeout: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                provider,
                after: timeout,
            }
        } else {
            Self::Http { provider, source }
        }
    }

    /// Name of the provider that failed.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Http { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::UnexpectedStatus { provider, .. }
            | Self::Unauthorized { provider }
            | Self::QuotaExhausted { provider, .. }
            | Self::NotFound { provider }
            | Self::Api { provider, .. }
            | Self::NoData { provider, .. }
            | Self::Deserialize { provider, .. }
            | Self::MissingInput { provider, .. }
            | Self::InvalidBaseUrl { provider, .. } => provider,
        }
    }

    /// True when the provider refused the call because the account ran out
    /// of credits.
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Self::QuotaExhausted { .. })
    }
}
