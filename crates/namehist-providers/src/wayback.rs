//! Wayback Machine CDX probe, the history source of last resort.
//!
//! The CDX index lists archived snapshots of a profile URL but says nothing
//! about which handle the account used at the time, so this provider can
//! only confirm that snapshots exist. It always reports
//! [`ProviderError::NoData`]; the reason carries the snapshot count for
//! diagnostics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{build_client, decode_json, endpoint, parse_base_url};
use crate::traits::{HistoryProvider, HistoryQuery, ReportedName};

const PROVIDER: &str = "wayback";
const DEFAULT_BASE_URL: &str = "https://web.archive.org/";
const SNAPSHOT_LIMIT: u32 = 10;

pub struct WaybackClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl WaybackClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(timeout_secs);
        Ok(Self {
            client: build_client(PROVIDER, timeout, user_agent)?,
            base_url: parse_base_url(PROVIDER, base_url)?,
            timeout,
        })
    }

    fn cdx_url(&self, username: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["cdx", "search", "cdx"]);
        url.query_pairs_mut()
            .append_pair("url", &format!("twitter.com/{username}"))
            .append_pair("output", "json")
            .append_pair("limit", &SNAPSHOT_LIMIT.to_string());
        url
    }
}

/// Counts snapshot rows in a CDX JSON body. The first row is a header; an
/// empty body means no captures.
fn count_snapshots(body: &str) -> Result<usize, ProviderError> {
    if body.trim().is_empty() {
        return Ok(0);
    }
    let rows: Vec<serde_json::Value> = decode_json(PROVIDER, body)?;
    Ok(rows.len().saturating_sub(1))
}

#[async_trait]
impl HistoryProvider for WaybackClient {
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
        let username = query.require_username(PROVIDER)?;

        let response = self
            .client
            .get(self.cdx_url(username))
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();
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
        let snapshots = count_snapshots(&body)?;
        tracing::debug!(provider = PROVIDER, username, snapshots, "wayback snapshots found");

        let reason = if snapshots == 0 {
            "no archived snapshots found".to_string()
        } else {
            format!("found {snapshots} archived snapshots; handles cannot be read from the snapshot index")
        };
        Err(ProviderError::NoData {
            provider: PROVIDER,
            reason,
        })
    }
}
