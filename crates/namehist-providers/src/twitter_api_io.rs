//! Client for TwitterAPI.io's user-info endpoint, the authoritative profile
//! source.
//!
//! Calls are billed against account credits. Credit exhaustion arrives as
//! HTTP 402 or as a `Credits is not enough` error message and is surfaced as
//! [`ProviderError::QuotaExhausted`] so operators can tell it apart from an
//! outage.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, decode_json, endpoint, non_empty, parse_base_url};
use crate::traits::{ProfilePartial, ProfileProvider};

const PROVIDER: &str = "twitterapi.io";
const DEFAULT_BASE_URL: &str = "https://api.twitterapi.io/";
const CREDITS_MESSAGE: &str = "Credits is not enough";
const MAX_DETAIL_LEN: usize = 200;

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    status: Option<String>,
    msg: Option<String>,
    data: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    /// Usually a string, but numeric ids have been seen in the wild.
    id: Option<serde_json::Value>,
    name: Option<String>,
    profile_picture: Option<String>,
    description: Option<String>,
    location: Option<String>,
    url: Option<String>,
    created_at: Option<String>,
    followers: Option<u64>,
    following: Option<u64>,
    statuses_count: Option<u64>,
    favourites_count: Option<u64>,
    media_count: Option<u64>,
    is_verified: Option<bool>,
    is_blue_verified: Option<bool>,
    verified_type: Option<String>,
    protected: Option<bool>,
    can_dm: Option<bool>,
    cover_picture: Option<String>,
}

impl From<UserInfo> for ProfilePartial {
    fn from(user: UserInfo) -> Self {
        Self {
            id: user.id.and_then(id_to_string),
            name: non_empty(user.name),
            profile_image_url: non_empty(user.profile_picture).map(|u| upscale_avatar(&u)),
            bio: non_empty(user.description),
            location: non_empty(user.location),
            url: non_empty(user.url),
            created_at: non_empty(user.created_at),
            followers_count: user.followers,
            following_count: user.following,
            tweet_count: user.statuses_count,
            favourites_count: user.favourites_count,
            media_count: user.media_count,
            verified: user.is_verified,
            is_blue_verified: user.is_blue_verified,
            verified_type: non_empty(user.verified_type),
            protected: user.protected,
            can_dm: user.can_dm,
            cover_picture: non_empty(user.cover_picture),
        }
    }
}

fn id_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => non_empty(Some(s)),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Twitter serves `_normal` (48px) avatars by default; `_400x400` is the
/// same image at full size.
fn upscale_avatar(url: &str) -> String {
    url.replace("_normal", "_400x400")
}

fn truncate_detail(body: &str) -> String {
    body.trim().chars().take(MAX_DETAIL_LEN).collect()
}

pub struct TwitterApiIoClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl TwitterApiIoClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

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

    /// Fetches only the display name, for latency-sensitive callers.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileProvider::fetch_profile`].
    pub async fn display_name(&self, username: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.fetch_user(username).await?.name)
    }

    fn user_info_url(&self, username: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["twitter", "user", "info"]);
        url.query_pairs_mut().append_pair("userName", username);
        url
    }

    async fn fetch_user(&self, username: &str) -> Result<ProfilePartial, ProviderError> {
        let response = self
            .client
            .get(self.user_info_url(username))
            .header("X-API-Key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;

        if status == StatusCode::PAYMENT_REQUIRED
            || (!status.is_success() && body.contains(CREDITS_MESSAGE))
        {
            return Err(ProviderError::QuotaExhausted {
                provider: PROVIDER,
                detail: truncate_detail(&body),
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized { provider: PROVIDER });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound { provider: PROVIDER });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let parsed: UserInfoResponse = decode_json(PROVIDER, &body)?;
        match (parsed.status.as_deref(), parsed.data) {
            (Some("success"), Some(user)) => Ok(user.into()),
            (_, _) => {
                let message = parsed
                    .msg
                    .unwrap_or_else(|| "response did not report success".to_string());
                if message.contains(CREDITS_MESSAGE) {
                    return Err(ProviderError::QuotaExhausted {
                        provider: PROVIDER,
                        detail: truncate_detail(&message),
                    });
                }
                Err(ProviderError::Api {
                    provider: PROVIDER,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl ProfileProvider for TwitterApiIoClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfilePartial, ProviderError> {
        self.fetch_user(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscale_avatar_replaces_normal_suffix() {
        assert_eq!(
            upscale_avatar("https://pbs.twimg.com/profile_images/1/abc_normal.jpg"),
            "https://pbs.twimg.com/profile_images/1/abc_400x400.jpg"
        );
        assert_eq!(
            upscale_avatar("https://pbs.twimg.com/a.jpg"),
            "https://pbs.twimg.com/a.jpg"
        );
    }

    #[test]
    fn user_info_maps_to_partial_without_coercion() {
        let json = r#"{
            "id": "12",
            "name": "jack",
            "profilePicture": "https://pbs.twimg.com/x_normal.jpg",
            "description": "",
            "followers": 0,
            "isBlueVerified": true,
            "coverPicture": null
        }"#;
        let user: UserInfo = serde_json::from_str(json).unwrap();
        let partial = ProfilePartial::from(user);
        assert_eq!(partial.id.as_deref(), Some("12"));
        assert_eq!(
            partial.profile_image_url.as_deref(),
            Some("https://pbs.twimg.com/x_400x400.jpg")
        );
        assert_eq!(partial.bio, None, "blank description is absent");
        assert_eq!(partial.followers_count, Some(0), "confirmed zero is kept");
        assert_eq!(partial.following_count, None);
        assert_eq!(partial.is_blue_verified, Some(true));
        assert_eq!(partial.verified, None);
        assert_eq!(partial.cover_picture, None);
    }

    #[test]
    fn numeric_id_is_stringified() {
        let user: UserInfo = serde_json::from_str(r#"{"id": 783214}"#).unwrap();
        assert_eq!(ProfilePartial::from(user).id.as_deref(), Some("783214"));
    }

    #[test]
    fn user_info_url_encodes_username() {
        let client = TwitterApiIoClient::with_base_url(
            "k",
            5,
            "namehist-test/0.1",
            "https://api.twitterapi.io",
        )
        .expect("client");
        assert_eq!(
            client.user_info_url("jack").as_str(),
            "https://api.twitterapi.io/twitter/user/info?userName=jack"
        );
    }

    #[test]
    fn truncate_detail_caps_length() {
        let long = "x".repeat(1_000);
        assert_eq!(truncate_detail(&long).len(), MAX_DETAIL_LEN);
    }
}
