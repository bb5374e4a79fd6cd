//! Username-history lookup for namehist.
//!
//! Fans a query out to tiered history providers, merges what they report
//! into one deduplicated timeline, resolves the current handle, and
//! enriches it with profile data from an ordered fallback chain. Provider
//! failures never fail a lookup; they surface as [`ProviderReport`]s.
//!
//! [`ProviderReport`]: namehist_core::ProviderReport

pub mod aggregator;
pub mod autocomplete;
pub mod enrich;
pub mod error;
pub mod lookup;
pub mod merge;

pub use aggregator::{HistoryOutcome, SourceAggregator};
pub use autocomplete::{Suggester, Suggestion};
pub use enrich::ProfileEnricher;
pub use error::LookupError;
pub use lookup::{HistoryReport, Lookup};
pub use merge::{merge_reported, sort_by_start_date};
