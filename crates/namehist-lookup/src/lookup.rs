//! The lookup façade used by the server and the CLI.

use std::collections::BTreeMap;

use namehist_core::{
    normalize_username, AggregatedResult, AppConfig, ProfileInfo, ProviderReport, UsernameRecord,
};
use namehist_providers::{
    HistoryProvider, HistoryQuery, LolArchiverClient, MemoryLolClient, NitterScraper,
    ProfileProvider, ProviderError, TwitterApiIoClient, UnavatarClient, WaybackClient,
};
use serde::{Deserialize, Serialize};

use crate::aggregator::{HistoryOutcome, SourceAggregator, Tier};
use crate::autocomplete::{Suggester, Suggestion};
use crate::enrich::ProfileEnricher;
use crate::error::LookupError;

/// History without profile data, shaped for the username-history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryReport {
    pub current_username: String,
    pub historical_names: Vec<String>,
    /// Every handle including the current one, in timeline order.
    pub usernames: Vec<UsernameRecord>,
    pub sources: Vec<ProviderReport>,
    /// Number of providers that answered successfully.
    pub total_sources: usize,
}

impl From<HistoryOutcome> for HistoryReport {
    fn from(outcome: HistoryOutcome) -> Self {
        let usernames: Vec<UsernameRecord> = outcome.timeline().into_iter().cloned().collect();
        Self {
            current_username: outcome.current.username.clone(),
            historical_names: outcome
                .historical
                .iter()
                .map(|r| r.username.clone())
                .collect(),
            usernames,
            total_sources: outcome.successful_sources().len(),
            sources: outcome.reports,
        }
    }
}

pub struct Lookup {
    aggregator: SourceAggregator,
    enricher: ProfileEnricher,
    suggester: Suggester,
}

impl Lookup {
    #[must_use]
    pub fn new(aggregator: SourceAggregator, enricher: ProfileEnricher, suggester: Suggester) -> Self {
        Self {
            aggregator,
            enricher,
            suggester,
        }
    }

    /// Builds every provider client from `config`. Keyed providers are left
    /// out when their key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if a client cannot be constructed, e.g. an
    /// unparseable Nitter URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let ua = config.user_agent.as_str();

        let mut tiers: Vec<Tier> = Vec::with_capacity(3);
        if let Some(key) = config.lolarchiver_api_key.as_deref() {
            let lolarchiver: Box<dyn HistoryProvider> = Box::new(LolArchiverClient::new(
                key,
                config.lolarchiver_timeout_secs,
                ua,
            )?);
            tiers.push(vec![lolarchiver]);
        }
        let memory_lol: Box<dyn HistoryProvider> =
            Box::new(MemoryLolClient::new(config.memory_lol_timeout_secs, ua)?);
        tiers.push(vec![memory_lol]);
        let wayback: Box<dyn HistoryProvider> =
            Box::new(WaybackClient::new(config.wayback_timeout_secs, ua)?);
        tiers.push(vec![wayback]);

        let mut profile_chain: Vec<Box<dyn ProfileProvider>> = Vec::with_capacity(3);
        let mut autocomplete_client = None;
        if let Some(key) = config.twitter_api_io_key.as_deref() {
            profile_chain.push(Box::new(TwitterApiIoClient::new(
                key,
                config.profile_timeout_secs,
                ua,
            )?));
            autocomplete_client = Some(TwitterApiIoClient::new(
                key,
                config.autocomplete_timeout_secs,
                ua,
            )?);
        }
        profile_chain.push(Box::new(NitterScraper::with_base_url(
            config.scrape_timeout_secs,
            &config.nitter_url,
        )?));
        profile_chain.push(Box::new(UnavatarClient::new(config.avatar_timeout_secs, ua)?));

        let lookup = Self::new(
            SourceAggregator::new(tiers),
            ProfileEnricher::new(profile_chain),
            Suggester::new(autocomplete_client),
        );
        tracing::info!(
            history_providers = lookup.aggregator.provider_count(),
            profile_providers = ?lookup.enricher.provider_names(),
            "lookup configured"
        );
        Ok(lookup)
    }

    /// Full lookup: merged history plus the current handle's profile.
    ///
    /// With a username, history and profile are fetched concurrently. With
    /// only an id, the profile is fetched once the current handle is known.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] when neither a username nor an
    /// id is given. Provider failures are reported in `sources` instead.
    pub async fn aggregate(
        &self,
        username: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<AggregatedResult, LookupError> {
        let query = validate(username, user_id)?;

        let (outcome, profile) = match query.username.as_deref() {
            Some(handle) => {
                tokio::join!(self.aggregator.collect(&query), self.enricher.enrich(handle))
            }
            None => {
                let outcome = self.aggregator.collect(&query).await;
                let profile = self.enricher.enrich(&outcome.current.username).await;
                (outcome, profile)
            }
        };

        let timeline: BTreeMap<String, _> = outcome
            .timeline()
            .into_iter()
            .map(|r| (r.username.clone(), r.span()))
            .collect();

        Ok(AggregatedResult {
            profile,
            current: outcome.current,
            historical_usernames: outcome.historical,
            timeline,
            sources: outcome.reports,
        })
    }

    /// History only, without profile enrichment.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] when neither a username nor an
    /// id is given.
    pub async fn history(
        &self,
        username: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<HistoryReport, LookupError> {
        let query = validate(username, user_id)?;
        Ok(self.aggregator.collect(&query).await.into())
    }

    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] for an empty username.
    pub async fn enrich(&self, username: &str) -> Result<ProfileInfo, LookupError> {
        let handle = normalize_username(username)
            .ok_or_else(|| LookupError::InvalidInput("username is required".to_string()))?;
        Ok(self.enricher.enrich(&handle).await)
    }

    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        self.suggester.suggest(query).await
    }
}

fn validate(username: Option<&str>, user_id: Option<&str>) -> Result<HistoryQuery, LookupError> {
    let username = username.and_then(normalize_username);
    let user_id = user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    if username.is_none() && user_id.is_none() {
        return Err(LookupError::InvalidInput(
            "username or id is required".to_string(),
        ));
    }
    Ok(HistoryQuery { username, user_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_input() {
        assert!(matches!(
            validate(None, None),
            Err(LookupError::InvalidInput(_))
        ));
        assert!(matches!(
            validate(Some(" @ "), Some("  ")),
            Err(LookupError::InvalidInput(_))
        ));
    }

    #[test]
    fn validate_normalizes_username_and_id() {
        let query = validate(Some("@jack "), Some(" 12 ")).unwrap();
        assert_eq!(query.username.as_deref(), Some("jack"));
        assert_eq!(query.user_id.as_deref(), Some("12"));

        let query = validate(None, Some("12")).unwrap();
        assert_eq!(query.username, None);
    }
}
