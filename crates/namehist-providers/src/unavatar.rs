//! unavatar.io, the last profile source before the local fallback.
//!
//! Supplies an avatar URL for any handle it can resolve and, when its JSON
//! mode answers quickly, a display name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, non_empty, parse_base_url};
use crate::traits::{ProfilePartial, ProfileProvider};

const PROVIDER: &str = "unavatar";
const DEFAULT_BASE_URL: &str = "https://unavatar.io/";
const NAME_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct UnavatarJson {
    name: Option<String>,
}

pub struct UnavatarClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl UnavatarClient {
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

    fn avatar_url(&self, username: &str) -> Url {
        endpoint(&self.base_url, &["twitter", username])
    }

    /// Best effort: any failure here just means no display name.
    async fn display_name(&self, avatar_url: &Url, username: &str) -> Option<String> {
        let mut url = avatar_url.clone();
        url.set_query(Some("json"));

        let response = self
            .client
            .get(url)
            .timeout(NAME_LOOKUP_TIMEOUT)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let parsed: UnavatarJson = response.json().await.ok()?;
        non_empty(parsed.name).filter(|name| !name.eq_ignore_ascii_case(username))
    }
}

#[async_trait]
impl ProfileProvider for UnavatarClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// The existence check and the name lookup have separate budgets.
    fn timeout(&self) -> Duration {
        self.timeout + NAME_LOOKUP_TIMEOUT
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfilePartial, ProviderError> {
        let avatar_url = self.avatar_url(username);

        let response = self
            .client
            .head(avatar_url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound { provider: PROVIDER });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let name = self.display_name(&avatar_url, username).await;
        Ok(ProfilePartial {
            name,
            profile_image_url: Some(avatar_url.to_string()),
            ..ProfilePartial::default()
        })
    }
}
