//! Profile enrichment through an ordered provider chain.

use namehist_core::{format_display_name, placeholder_avatar_url, ProfileInfo};
use namehist_providers::{ProfilePartial, ProfileProvider, ProviderError};

/// Tries profile providers in order and keeps the first usable answer.
pub struct ProfileEnricher {
    providers: Vec<Box<dyn ProfileProvider>>,
}

impl ProfileEnricher {
    #[must_use]
    pub fn new(providers: Vec<Box<dyn ProfileProvider>>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the profile for `username`. Never fails: when every provider
    /// errors or returns nothing, a minimal profile derived from the handle
    /// is returned with `source = "fallback"`.
    pub async fn enrich(&self, username: &str) -> ProfileInfo {
        for provider in &self.providers {
            let name = provider.name();
            let timeout = provider.timeout();
            let result = match tokio::time::timeout(timeout, provider.fetch_profile(username)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    provider: name,
                    after: timeout,
                }),
            };

            match result {
                Ok(partial) if partial.is_usable() => {
                    tracing::info!(provider = name, username, "profile enriched");
                    return profile_from_partial(username, partial, name);
                }
                Ok(_) => {
                    tracing::debug!(provider = name, username, "profile provider returned no fields");
                }
                Err(e) if e.is_quota_exhausted() => {
                    tracing::warn!(
                        provider = name,
                        username,
                        quota_exhausted = true,
                        error = %e,
                        "profile provider out of credits, trying next"
                    );
                }
                Err(e) => {
                    tracing::warn!(provider = name, username, error = %e, "profile provider failed");
                }
            }
        }

        tracing::info!(username, "no profile provider answered, using fallback profile");
        ProfileInfo::fallback(username)
    }
}

/// Fills required fields the provider left out from the handle.
fn profile_from_partial(username: &str, partial: ProfilePartial, source: &str) -> ProfileInfo {
    ProfileInfo {
        id: partial.id,
        username: username.to_string(),
        name: partial
            .name
            .unwrap_or_else(|| format_display_name(username)),
        profile_image_url: partial
            .profile_image_url
            .unwrap_or_else(|| placeholder_avatar_url(username)),
        bio: partial.bio,
        location: partial.location,
        url: partial.url,
        created_at: partial.created_at,
        followers_count: partial.followers_count,
        following_count: partial.following_count,
        tweet_count: partial.tweet_count,
        favourites_count: partial.favourites_count,
        media_count: partial.media_count,
        verified: partial.verified,
        is_blue_verified: partial.is_blue_verified,
        verified_type: partial.verified_type,
        protected: partial.protected,
        can_dm: partial.can_dm,
        cover_picture: partial.cover_picture,
        source: source.to_string(),
    }
}
