//! Best-effort profile scraping from a Nitter front-end.
//!
//! Markup changes between Nitter instances and versions, so every field is
//! extracted independently: a pattern that stops matching leaves that field
//! `None` instead of failing the call. Only an unreachable page, a non-2xx
//! status, or a bot-challenge interstitial is an error.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, parse_base_url, BROWSER_FALLBACK_UA};
use crate::traits::{ProfilePartial, ProfileProvider};

const PROVIDER: &str = "nitter";
const DEFAULT_BASE_URL: &str = "https://nitter.net/";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>\s*([^<@]*?)\s*(?:\(\s*)?@").expect("valid regex"));
static FULLNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)class=["'][^"']*profile-card-fullname[^"']*["'][^>]*>\s*([^<]+?)\s*<"#)
        .expect("valid regex")
});
static BIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)class=["'][^"']*profile-bio[^"']*["'][^>]*>\s*(?:<p[^>]*>)?\s*([^<]+?)\s*<"#)
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Scrapes display name, bio and follower counts from Nitter HTML.
pub struct NitterScraper {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl NitterScraper {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Nitter instances come and go, so the base URL is configurable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(timeout_secs);
        Ok(Self {
            // Many instances refuse non-browser user agents.
            client: build_client(PROVIDER, timeout, BROWSER_FALLBACK_UA)?,
            base_url: parse_base_url(PROVIDER, base_url)?,
            timeout,
        })
    }
}

/// Extracts whatever profile fields the markup still exposes.
pub(crate) fn extract_profile(username: &str, html: &str) -> ProfilePartial {
    ProfilePartial {
        name: extract_display_name(username, html),
        bio: extract_bio(html),
        followers_count: extract_count(html, "Followers"),
        following_count: extract_count(html, "Following"),
        tweet_count: extract_count(html, "Tweets").or_else(|| extract_count(html, "Posts")),
        ..ProfilePartial::default()
    }
}

/// Display name from the profile card, falling back to the page title.
/// A name equal to the handle carries no information and is dropped.
fn extract_display_name(username: &str, html: &str) -> Option<String> {
    let from_card = FULLNAME_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str()));
    let from_title = || {
        TITLE_RE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()))
    };

    from_card
        .or_else(from_title)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case(username))
}

fn extract_bio(html: &str) -> Option<String> {
    let raw = BIO_RE.captures(html)?.get(1)?.as_str();
    let text = decode_entities(&TAG_RE.replace_all(raw, ""));
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Reads a stat such as `1,234 Followers` or the Nitter layout where the
/// label span precedes the number span.
fn extract_count(html: &str, label: &str) -> Option<u64> {
    let label = regex::escape(label);
    let number_first = Regex::new(&format!(r"(?i)(\d[\d,]*)\s*{label}")).ok()?;
    let label_first =
        Regex::new(&format!(r"(?is){label}\s*</span>\s*<span[^>]*>\s*(\d[\d,]*)")).ok()?;

    label_first
        .captures(html)
        .or_else(|| number_first.captures(html))
        .and_then(|c| c.get(1))
        .and_then(|m| parse_count(m.as_str()))
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse::<u64>().ok()
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_verifying = lowered.contains("verifying your browser");

    has_challenge_platform || (has_just_a_moment && has_cookie_gate) || has_verifying
}

#[async_trait]
impl ProfileProvider for NitterScraper {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfilePartial, ProviderError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, &[username]))
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound { provider: PROVIDER });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, self.timeout, e))?;
        if looks_like_bot_challenge(&html) {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: "instance served a bot-challenge page".to_string(),
            });
        }

        let partial = extract_profile(username, &html);
        tracing::debug!(
            provider = PROVIDER,
            username,
            has_name = partial.name.is_some(),
            followers = ?partial.followers_count,
            following = ?partial.following_count,
            "scraped nitter profile"
        );
        Ok(partial)
    }
}
