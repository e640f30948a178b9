//! Pure time-bucket grouping for aggregate reports.
//!
//! Records are grouped by a typed bucket key and counted; ordering is by the
//! key's numeric components, never by the rendered label, so month 12 can
//! never sort after the next year's month 1 the way a string sort would
//! allow.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::Granularity;

/// Numeric bucket identity. Ordering this tuple is chronological ordering of
/// the bucket.
fn bucket_key(date: NaiveDate, granularity: Granularity) -> (i32, u32, u32) {
    match granularity {
        Granularity::Year => (date.year(), 0, 0),
        Granularity::Month => (date.year(), date.month(), 0),
        Granularity::Week => {
            let iso = date.iso_week();
            (iso.year(), iso.week(), 0)
        }
        Granularity::Date => (date.year(), date.month(), date.day()),
    }
}

/// Renders the bucket label shown on the chart axis.
fn bucket_label(key: (i32, u32, u32), granularity: Granularity) -> String {
    let (year, a, b) = key;
    match granularity {
        Granularity::Year => format!("{year}"),
        Granularity::Month => format!("{year}-{a:02}"),
        Granularity::Week => format!("{year}-W{a:02}"),
        Granularity::Date => format!("{year}-{a:02}-{b:02}"),
    }
}

/// Groups dates into buckets and counts them, chronologically ascending.
///
/// Only buckets with at least one record appear; there are no zero-filled
/// gaps. An empty input yields an empty sequence.
pub fn bucket_counts(dates: &[NaiveDate], granularity: Granularity) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<(i32, u32, u32), u64> = BTreeMap::new();
    for date in dates {
        *counts.entry(bucket_key(*date, granularity)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| (bucket_label(key, granularity), count))
        .collect()
}
