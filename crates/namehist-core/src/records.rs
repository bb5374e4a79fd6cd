use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::profile::ProfileInfo;

/// One handle an account has used, merged across providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameRecord {
    pub username: String,
    /// First date the handle was observed. `None` when no provider knew.
    pub start_date: Option<String>,
    /// Last date the handle was observed. `None` means still in use.
    pub end_date: Option<String>,
    pub is_current: bool,
    /// Providers that reported this handle. Never empty.
    pub sources: BTreeSet<String>,
}

impl UsernameRecord {
    /// A record for a handle no provider reported, attributed to `source`.
    #[must_use]
    pub fn synthesized(username: &str, source: &str) -> Self {
        Self {
            username: username.to_string(),
            start_date: None,
            end_date: None,
            is_current: true,
            sources: BTreeSet::from([source.to_string()]),
        }
    }

    #[must_use]
    pub fn span(&self) -> DateSpan {
        DateSpan(self.start_date.clone(), self.end_date.clone())
    }
}

/// `[start_date, end_date]` pair; serializes as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan(pub Option<String>, pub Option<String>);

/// Outcome of one provider call within a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Diagnostic record of what a single provider did during a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReport {
    pub provider: String,
    pub status: ReportStatus,
    pub record_count: usize,
    pub error: Option<String>,
    pub quota_exhausted: bool,
}

impl ProviderReport {
    #[must_use]
    pub fn succeeded(provider: &str, record_count: usize) -> Self {
        Self {
            provider: provider.to_string(),
            status: ReportStatus::Succeeded,
            record_count,
            error: None,
            quota_exhausted: false,
        }
    }

    #[must_use]
    pub fn failed(provider: &str, error: String, quota_exhausted: bool) -> Self {
        Self {
            provider: provider.to_string(),
            status: ReportStatus::Failed,
            record_count: 0,
            error: Some(error),
            quota_exhausted,
        }
    }

    #[must_use]
    pub fn skipped(provider: &str, reason: &str) -> Self {
        Self {
            provider: provider.to_string(),
            status: ReportStatus::Skipped,
            record_count: 0,
            error: Some(reason.to_string()),
            quota_exhausted: false,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Succeeded
    }
}

/// Everything the presentation layer needs for one lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub profile: ProfileInfo,
    pub current: UsernameRecord,
    /// Previously used handles, oldest first. Never contains `current`.
    pub historical_usernames: Vec<UsernameRecord>,
    pub timeline: BTreeMap<String, DateSpan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ProviderReport>,
}

impl AggregatedResult {
    /// Handles only, in timeline order.
    #[must_use]
    pub fn historical_names(&self) -> Vec<&str> {
        self.historical_usernames
            .iter()
            .map(|r| r.username.as_str())
            .collect()
    }
}
