//! Tiered fan-out over history providers.
//!
//! Providers are grouped into ordered tiers. Every provider in a tier is
//! queried concurrently; once any successful provider has returned more
//! than one handle, later tiers are skipped. Each call is bounded by the
//! provider's own timeout, so a lookup takes at most the sum of the slowest
//! timeout per tier reached.

use std::time::Instant;

use futures::future::join_all;
use namehist_core::{ProviderReport, UsernameRecord};
use namehist_providers::{HistoryProvider, HistoryQuery, ProviderError, ReportedName};

use crate::merge::{merge_reported, parse_date, sort_by_start_date, start_key};

/// Source tag for a current record no provider reported.
pub const QUERY_SOURCE: &str = "query";

const SHORT_CIRCUIT_REASON: &str = "an earlier tier already returned a history";

/// One ordered group of providers queried together.
pub type Tier = Vec<Box<dyn HistoryProvider>>;

/// Merged history for one query, split into the current handle and the
/// handles used before it.
#[derive(Debug, Clone)]
pub struct HistoryOutcome {
    pub current: UsernameRecord,
    /// Oldest first; never contains `current`.
    pub historical: Vec<UsernameRecord>,
    /// One entry per configured provider, in tier order.
    pub reports: Vec<ProviderReport>,
}

impl HistoryOutcome {
    /// Every handle in timeline order, with `current` placed where its
    /// start date sorts.
    #[must_use]
    pub fn timeline(&self) -> Vec<&UsernameRecord> {
        let mut all: Vec<&UsernameRecord> = self.historical.iter().collect();
        all.push(&self.current);
        all.sort_by_cached_key(|r| start_key(r));
        all
    }

    /// Providers that answered successfully.
    #[must_use]
    pub fn successful_sources(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.provider.as_str())
            .collect()
    }
}

pub struct SourceAggregator {
    tiers: Vec<Tier>,
}

impl SourceAggregator {
    /// Empty tiers are dropped.
    #[must_use]
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self {
            tiers: tiers.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Queries providers tier by tier and merges whatever succeeds.
    ///
    /// Never fails: with no successful provider the outcome holds only a
    /// synthesized current record and one failure report per provider.
    pub async fn collect(&self, query: &HistoryQuery) -> HistoryOutcome {
        let started = Instant::now();
        let mut records: Vec<UsernameRecord> = Vec::new();
        let mut reports: Vec<ProviderReport> = Vec::with_capacity(self.provider_count());
        let mut short_circuited = false;

        for (index, tier) in self.tiers.iter().enumerate() {
            if short_circuited {
                reports.extend(
                    tier.iter()
                        .map(|p| ProviderReport::skipped(p.name(), SHORT_CIRCUIT_REASON)),
                );
                continue;
            }

            let results = join_all(tier.iter().map(|p| fetch_one(p.as_ref(), query))).await;
            for (provider, result) in results {
                let report = report_for(provider, &result);
                log_report(&report, query);
                if let Ok(names) = result {
                    merge_reported(&mut records, provider, names);
                }
                reports.push(report);
            }

            short_circuited = reports
                .iter()
                .any(|r| r.is_success() && r.record_count > 1);
            if short_circuited {
                tracing::debug!(tier = index + 1, "history found, skipping remaining tiers");
            }
        }

        sort_by_start_date(&mut records);
        let (current, historical) = split_current(records, query);

        tracing::info!(
            username = query.username.as_deref().unwrap_or(""),
            user_id = query.user_id.as_deref().unwrap_or(""),
            current = %current.username,
            historical = historical.len(),
            succeeded = reports.iter().filter(|r| r.is_success()).count(),
            providers = reports.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "history aggregation complete"
        );

        HistoryOutcome {
            current,
            historical,
            reports,
        }
    }
}

/// Runs one provider under its timeout. The outer timeout also covers
/// providers that do their own work outside reqwest.
async fn fetch_one(
    provider: &dyn HistoryProvider,
    query: &HistoryQuery,
) -> (&'static str, Result<Vec<ReportedName>, ProviderError>) {
    let name = provider.name();
    let timeout = provider.timeout();
    let result = match tokio::time::timeout(timeout, provider.fetch_history(query)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            provider: name,
            after: timeout,
        }),
    };
    (name, result)
}

fn report_for(provider: &str, result: &Result<Vec<ReportedName>, ProviderError>) -> ProviderReport {
    match result {
        Ok(names) => ProviderReport::succeeded(provider, names.len()),
        Err(e) => ProviderReport::failed(provider, e.to_string(), e.is_quota_exhausted()),
    }
}

fn log_report(report: &ProviderReport, query: &HistoryQuery) {
    let username = query.username.as_deref().unwrap_or("");
    let error = report.error.as_deref().unwrap_or("");
    if report.is_success() {
        tracing::info!(
            provider = %report.provider,
            username,
            count = report.record_count,
            "history provider succeeded"
        );
    } else if report.quota_exhausted {
        tracing::warn!(
            provider = %report.provider,
            username,
            quota_exhausted = true,
            error,
            "history provider out of credits"
        );
    } else {
        tracing::warn!(
            provider = %report.provider,
            username,
            error,
            "history provider failed"
        );
    }
}

/// Picks the current handle and returns it with the remaining records.
///
/// With a username, the matching record is current. With only an id, the
/// open-ended record with the latest start wins, else the newest record.
/// When nothing matches, a record is synthesized for the query.
fn split_current(
    mut records: Vec<UsernameRecord>,
    query: &HistoryQuery,
) -> (UsernameRecord, Vec<UsernameRecord>) {
    let position = match query.username.as_deref() {
        Some(username) => {
            let key = username.to_lowercase();
            records.iter().position(|r| r.username.to_lowercase() == key)
        }
        None => records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.end_date.is_none())
            .max_by_key(|(_, r)| r.start_date.as_deref().and_then(parse_date))
            .map(|(i, _)| i)
            .or_else(|| records.len().checked_sub(1)),
    };

    let mut current = match position {
        Some(i) => records.remove(i),
        None => {
            let handle = query
                .username
                .as_deref()
                .or(query.user_id.as_deref())
                .unwrap_or_default();
            UsernameRecord::synthesized(handle, QUERY_SOURCE)
        }
    };
    current.is_current = true;
    for record in &mut records {
        record.is_current = false;
    }
    (current, records)
}
