use serde::{Deserialize, Serialize};

use crate::username::{format_display_name, placeholder_avatar_url};

/// Source tag used when no provider supplied profile data.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Descriptive profile of the current handle.
///
/// Optional fields stay `None` unless a provider reported them; a missing
/// follower count is `None`, never `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: Option<String>,
    pub username: String,
    pub name: String,
    pub profile_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub tweet_count: Option<u64>,
    pub favourites_count: Option<u64>,
    pub media_count: Option<u64>,
    pub verified: Option<bool>,
    pub is_blue_verified: Option<bool>,
    pub verified_type: Option<String>,
    pub protected: Option<bool>,
    pub can_dm: Option<bool>,
    pub cover_picture: Option<String>,
    /// Provider that supplied the data, or [`FALLBACK_SOURCE`].
    pub source: String,
}

impl ProfileInfo {
    /// Minimal profile derived from the handle alone.
    #[must_use]
    pub fn fallback(username: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            name: format_display_name(username),
            profile_image_url: placeholder_avatar_url(username),
            bio: None,
            location: None,
            url: None,
            created_at: None,
            followers_count: None,
            following_count: None,
            tweet_count: None,
            favourites_count: None,
            media_count: None,
            verified: None,
            is_blue_verified: None,
            verified_type: None,
            protected: None,
            can_dm: None,
            cover_picture: None,
            source: FALLBACK_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_profile_leaves_optional_fields_absent() {
        let profile = ProfileInfo::fallback("weird_user.name");
        assert_eq!(profile.name, "Weird User Name");
        assert_eq!(
            profile.profile_image_url,
            "https://unavatar.io/twitter/weird_user.name"
        );
        assert_eq!(profile.id, None);
        assert_eq!(profile.followers_count, None);
        assert_eq!(profile.verified, None);
        assert_eq!(profile.source, FALLBACK_SOURCE);
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let json = serde_json::to_value(ProfileInfo::fallback("jack")).expect("serialize");
        assert!(json["followers_count"].is_null());
        assert!(json["protected"].is_null());
        assert_eq!(json["username"], "jack");
    }
}
