//! Merging provider reports into one timeline.
//!
//! Handles are keyed case-insensitively. The first spelling seen wins, and
//! every provider that reported a handle is recorded in its `sources`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use namehist_core::UsernameRecord;
use namehist_providers::ReportedName;

/// Folds one provider's handles into `records`.
///
/// Dates combine as follows: a missing date is filled from the new report;
/// when both sides have a parseable date, the earlier start and the later
/// end are kept. Unparseable dates never overwrite a present one.
pub fn merge_reported(records: &mut Vec<UsernameRecord>, provider: &str, names: Vec<ReportedName>) {
    for name in names {
        if name.username.is_empty() {
            continue;
        }
        let key = name.username.to_lowercase();

        match records
            .iter_mut()
            .find(|r| r.username.to_lowercase() == key)
        {
            Some(existing) => {
                existing.sources.insert(provider.to_string());
                existing.start_date =
                    combine(existing.start_date.take(), name.start_date, Pick::Earliest);
                existing.end_date = combine(existing.end_date.take(), name.end_date, Pick::Latest);
            }
            None => {
                let mut record = UsernameRecord::synthesized(&name.username, provider);
                record.is_current = false;
                record.start_date = name.start_date;
                record.end_date = name.end_date;
                records.push(record);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Pick {
    Earliest,
    Latest,
}

fn combine(current: Option<String>, incoming: Option<String>, pick: Pick) -> Option<String> {
    match (current, incoming) {
        (None, incoming) => incoming,
        (current, None) => current,
        (Some(current), Some(incoming)) => match (parse_date(&current), parse_date(&incoming)) {
            (Some(a), Some(b)) => {
                let incoming_wins = match pick {
                    Pick::Earliest => b < a,
                    Pick::Latest => b > a,
                };
                Some(if incoming_wins { incoming } else { current })
            }
            (None, Some(_)) => Some(incoming),
            _ => Some(current),
        },
    }
}

/// Parses the date shapes providers are known to send: `YYYY-MM-DD`,
/// RFC 3339, and `YYYY-MM-DDTHH:MM:SS` without an offset.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Stable sort by start date, oldest first. Records with a missing or
/// unparseable start date go last in their original order.
pub fn sort_by_start_date(records: &mut [UsernameRecord]) {
    records.sort_by_cached_key(start_key);
}

/// Sort key that orders dated records first, oldest to newest.
pub(crate) fn start_key(record: &UsernameRecord) -> (bool, Option<NaiveDate>) {
    let parsed = record.start_date.as_deref().and_then(parse_date);
    (parsed.is_none(), parsed)
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
