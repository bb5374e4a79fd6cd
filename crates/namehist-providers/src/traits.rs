//! Capability traits every provider client implements.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::http::non_empty;

/// Input to a username-history lookup. At least one field is set by the
/// time a provider sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub username: Option<String>,
    pub user_id: Option<String>,
}

impl HistoryQuery {
    /// Returns the username or a [`ProviderError::MissingInput`] for
    /// providers that can only search by handle.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingInput`] when no username was given.
    pub fn require_username(&self, provider: &'static str) -> Result<&str, ProviderError> {
        self.username
            .as_deref()
            .ok_or(ProviderError::MissingInput {
                provider,
                field: "username",
            })
    }
}

/// One handle as reported by a single history provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedName {
    pub username: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportedName {
    /// Normalises provider conventions: blank dates become `None`, and an
    /// end date of `"current"` means the handle is still in use.
    #[must_use]
    pub fn new(username: &str, start_date: Option<String>, end_date: Option<String>) -> Self {
        let end_date = non_empty(end_date).filter(|d| !d.eq_ignore_ascii_case("current"));
        Self {
            username: username.trim().to_string(),
            start_date: non_empty(start_date),
            end_date,
        }
    }
}

/// Profile fields a provider could supply. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePartial {
    pub id: Option<String>,
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
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
}

impl ProfilePartial {
    /// True when the provider returned at least one field.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        *self != Self::default()
    }
}

/// A source of username history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Stable identifier used in logs, reports and `sources` sets.
    fn name(&self) -> &'static str;

    /// Upper bound on one `fetch_history` call.
    fn timeout(&self) -> Duration;

    /// Fetches every handle the provider knows for the account.
    async fn fetch_history(&self, query: &HistoryQuery)
        -> Result<Vec<ReportedName>, ProviderError>;
}

/// A source of current profile metadata.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn timeout(&self) -> Duration;

    async fn fetch_profile(&self, username: &str) -> Result<ProfilePartial, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_name_normalises_current_marker() {
        let name = ReportedName::new(
            "jack",
            Some("2011-01-01".to_string()),
            Some("current".to_string()),
        );
        assert_eq!(name.end_date, None);
        assert_eq!(name.start_date.as_deref(), Some("2011-01-01"));
    }

    #[test]
    fn reported_name_blank_dates_are_absent() {
        let name = ReportedName::new(" jack ", Some(String::new()), Some("  ".to_string()));
        assert_eq!(name.username, "jack");
        assert_eq!(name.start_date, None);
        assert_eq!(name.end_date, None);
    }

    #[test]
    fn empty_partial_is_not_usable() {
        assert!(!ProfilePartial::default().is_usable());
        let partial = ProfilePartial {
            followers_count: Some(0),
            ..ProfilePartial::default()
        };
        assert!(partial.is_usable());
    }

    #[test]
    fn require_username_reports_provider() {
        let query = HistoryQuery {
            username: None,
            user_id: Some("12".to_string()),
        };
        let err = query.require_username("lolarchiver").unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingInput {
                provider: "lolarchiver",
                field: "username"
            }
        ));
    }
}
