//! Client for the LolArchiver Twitter history lookup (keyed, credit-metered).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, decode_json, endpoint, parse_base_url};
use crate::traits::{HistoryProvider, HistoryQuery, ReportedName};

const PROVIDER: &str = "lolarchiver";
const DEFAULT_BASE_URL: &str = "https://lolarchiver.com/";

/// LolArchiver signals exhausted credits with this non-standard status.
const CREDITS_EXHAUSTED_STATUS: u16 = 416;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    success: bool,
    data: Option<LookupData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    username_history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    username: String,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Username history from LolArchiver's archive (roughly 2011–2023).
///
/// The API key and handle travel as request headers, not in the body.
pub struct LolArchiverClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl LolArchiverClient {
    /// Creates a client pointed at the production host.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(timeout_secs);
        Ok(Self {
            client: build_client(PROVIDER, timeout, user_agent)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(PROVIDER, base_url)?,
            timeout,
        })
    }
}

#[async_trait]
impl HistoryProvider for LolArchiverClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<ReportedName>, ProviderError> {
        let handle = query.require_username(PROVIDER)?;
        let url = endpoint(&self.base_url, &["twitter_history_lookup"]);

        let mut request = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .header("handle", handle)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(id) = query.user_id.as_deref() {
            request = request.header("id", id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized { provider: PROVIDER });
        }
        if status.as_u16() == CREDITS_EXHAUSTED_STATUS {
            return Err(ProviderError::QuotaExhausted {
                provider: PROVIDER,
                detail: format!("HTTP {CREDITS_EXHAUSTED_STATUS}"),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let parsed: LookupResponse = decode_json(PROVIDER, &body)?;

        if !parsed.success {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: parsed
                    .error
                    .unwrap_or_else(|| "lookup unsuccessful".to_string()),
            });
        }

        let entries = parsed
            .data
            .and_then(|d| d.username_history)
            .ok_or_else(|| ProviderError::NoData {
                provider: PROVIDER,
                reason: "response has no username_history".to_string(),
            })?;

        Ok(entries
            .into_iter()
            .filter(|e| !e.username.trim().is_empty())
            .map(|e| ReportedName::new(&e.username, e.start_date, e.end_date))
            .collect())
    }
}
