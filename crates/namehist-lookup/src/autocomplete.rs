//! Single-suggestion autocomplete for the search box.

use namehist_core::{format_display_name, normalize_username, placeholder_avatar_url};
use namehist_providers::TwitterApiIoClient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub username: String,
    pub name: String,
    pub profile_image_url: String,
}

/// Builds suggestions. With a TwitterAPI.io client the display name is the
/// real one when it answers in time; otherwise it is derived from the handle.
pub struct Suggester {
    client: Option<TwitterApiIoClient>,
}

impl Suggester {
    #[must_use]
    pub fn new(client: Option<TwitterApiIoClient>) -> Self {
        Self { client }
    }

    /// Returns no suggestions for an empty query, otherwise exactly one.
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let Some(username) = normalize_username(query) else {
            return Vec::new();
        };
        let name = self.display_name(&username).await;
        vec![Suggestion {
            profile_image_url: placeholder_avatar_url(&username),
            name,
            username,
        }]
    }

    async fn display_name(&self, username: &str) -> String {
        if let Some(client) = &self.client {
            match client.display_name(username).await {
                Ok(Some(name)) => return name,
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(username, error = %e, "autocomplete name lookup failed");
                }
            }
        }
        format_display_name(username)
    }
}
