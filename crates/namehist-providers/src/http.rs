//! Shared HTTP plumbing for provider clients.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

pub(crate) const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Builds a `reqwest::Client` whose every request is bounded by `timeout`.
pub(crate) fn build_client(
    provider: &'static str,
    timeout: Duration,
    user_agent: &str,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(user_agent)
        .build()
        .map_err(|source| ProviderError::Http { provider, source })
}

/// Parses a base URL, normalised to end with exactly one slash so that
/// appended path segments land under it instead of replacing its last
/// segment.
pub(crate) fn parse_base_url(provider: &'static str, base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        provider,
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ProviderError::InvalidBaseUrl {
            provider,
            base_url: base_url.to_owned(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Decodes a response body, tagging decode failures with the provider.
pub(crate) fn decode_json<T: DeserializeOwned>(
    provider: &'static str,
    body: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|source| ProviderError::Deserialize { provider, source })
}

/// Treats blank strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
