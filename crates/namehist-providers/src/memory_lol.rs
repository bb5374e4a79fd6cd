//! Client for the free Memory.lol screen-name archive.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, decode_json, endpoint, parse_base_url};
use crate::traits::{HistoryProvider, HistoryQuery, ReportedName};

const PROVIDER: &str = "memory.lol";
const DEFAULT_BASE_URL: &str = "https://api.memory.lol/";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    accounts: Vec<ArchivedAccount>,
}

#[derive(Debug, Deserialize)]
struct ArchivedAccount {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    id_str: Option<String>,
    /// Observation dates per handle: `[first_seen]` or `[first_seen, last_seen]`.
    /// `null` when the handle was seen without a usable date.
    #[serde(default)]
    screen_names: BTreeMap<String, Option<Vec<String>>>,
}

pub struct MemoryLolClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl MemoryLolClient {
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

    /// Handle lookups win over id lookups when both are present.
    fn lookup_url(&self, query: &HistoryQuery) -> Result<Url, ProviderError> {
        match (query.username.as_deref(), query.user_id.as_deref()) {
            (Some(username), _) => Ok(endpoint(&self.base_url, &["v1", "tw", username])),
            (None, Some(id)) => Ok(endpoint(&self.base_url, &["v1", "tw", "id", id])),
            (None, None) => Err(ProviderError::MissingInput {
                provider: PROVIDER,
                field: "username or id",
            }),
        }
    }
}

impl ArchivedAccount {
    fn has_id(&self, id: &str) -> bool {
        self.id_str.as_deref() == Some(id) || self.id.is_some_and(|n| n.to_string() == id)
    }

    /// The handle first seen most recently, i.e. the one the account holds now.
    fn newest_handle(&self) -> Option<&str> {
        self.screen_names
            .iter()
            .max_by(|(_, a), (_, b)| first_seen(a.as_ref()).cmp(&first_seen(b.as_ref())))
            .map(|(name, _)| name.as_str())
    }
}

fn first_seen(dates: Option<&Vec<String>>) -> Option<&str> {
    dates.and_then(|d| d.first()).map(String::as_str)
}

/// A handle lookup can return every account that ever held the handle.
/// Prefer the account that holds it now, then any account that held it,
/// then the first one. Id lookups match on the account id.
fn select_account(
    mut accounts: Vec<ArchivedAccount>,
    query: &HistoryQuery,
) -> Option<ArchivedAccount> {
    let index = match (query.username.as_deref(), query.user_id.as_deref()) {
        (Some(username), _) => accounts
            .iter()
            .position(|a| {
                a.newest_handle()
                    .is_some_and(|h| h.eq_ignore_ascii_case(username))
            })
            .or_else(|| {
                accounts.iter().position(|a| {
                    a.screen_names
                        .keys()
                        .any(|h| h.eq_ignore_ascii_case(username))
                })
            }),
        (None, Some(id)) => accounts.iter().position(|a| a.has_id(id)),
        (None, None) => None,
    }
    .unwrap_or(0);

    (index < accounts.len()).then(|| accounts.swap_remove(index))
}

/// The archive's last date for a handle is its last crawl, so the newest
/// handle gets no end date: it is still in use.
fn account_history(account: ArchivedAccount) -> Vec<ReportedName> {
    let newest = account.newest_handle().map(str::to_owned);
    account
        .screen_names
        .into_iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, dates)| {
            let mut dates = dates.unwrap_or_default().into_iter();
            let start = dates.next();
            let end = dates
                .next()
                .filter(|_| newest.as_deref() != Some(name.as_str()));
            ReportedName::new(&name, start, end)
        })
        .collect()
}

#[async_trait]
impl HistoryProvider for MemoryLolClient {
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
        let url = self.lookup_url(query)?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NoData {
                provider: PROVIDER,
                reason: "account not in archive".to_string(),
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
        let parsed: ArchiveResponse = decode_json(PROVIDER, &body)?;

        let account_count = parsed.accounts.len();
        let Some(account) = select_account(parsed.accounts, query) else {
            return Err(ProviderError::NoData {
                provider: PROVIDER,
                reason: "no accounts in archive response".to_string(),
            });
        };
        if account_count > 1 {
            tracing::debug!(
                provider = PROVIDER,
                account_count,
                "archive returned several accounts, keeping one"
            );
        }

        Ok(account_history(account))
    }
}
