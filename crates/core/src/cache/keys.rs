//! Canonical cache keys for aggregate reports.
//!
//! A report key embeds the collection tag, the granularity, and every filter
//! dimension in sorted order with an explicit `all` sentinel for absent
//! filters, so two requests that differ only in field order hash to the same
//! key. The collection tag is recoverable from the key, which is what lets
//! the cache invalidate one collection's whole partition.

use crate::records::Collection;
use crate::report::ReportRequest;

const REPORT_PREFIX: &str = "graph";

/// Returns the canonical cache key for a report request.
///
/// Shape: `graph:<collection>:<granularity>:<dim>=<value>:...` with the
/// dimensions in sorted order.
pub fn report_key(request: &ReportRequest) -> String {
    let mut key = format!(
        "{REPORT_PREFIX}:{}:{}",
        request.collection, request.granularity
    );
    for (name, value) in &request.dimensions {
        key.push(':');
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

/// Checks whether a cache key is a report key.
pub fn is_report_key(key: &str) -> bool {
    key.starts_with("graph:")
}

/// Extracts the collection tag from a report cache key, if present.
///
/// Returns `None` for non-report keys or unknown collection tags.
pub fn collection_from_key(key: &str) -> Option<Collection> {
    let rest = key.strip_prefix("graph:")?;
    match rest.split(':').next()? {
        "employees" => Some(Collection::Employees),
        "travels" => Some(Collection::Travels),
        "appointments" => Some(Collection::Appointments),
        _ => None,
    }
}

/// The collections whose cached reports a mutation to `mutated` stales.
///
/// This is the declared cross-collection dependency table: a collection
/// always invalidates itself, and any collection whose report filters
/// reference it. Travel reports filter by employee id, so employee mutations
/// also stale travel reports.
pub fn invalidation_targets(mutated: Collection) -> &'static [Collection] {
    match mutated {
        Collection::Employees => &[Collection::Employees, Collection::Travels],
        Collection::Travels => &[Collection::Travels],
        Collection::Appointments => &[Collection::Appointments],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AppointmentGraphFilter, Granularity, TravelGraphFilter};

    #[test]
    fn test_report_key_is_canonical() {
        let request = ReportRequest::travels(
            Granularity::Month,
            &TravelGraphFilter {
                employee_id: Some(42),
                year: None,
                month: Some(3),
                position_title: None,
            },
        );

        assert_eq!(
            report_key(&request),
            "graph:travels:month:employee=42:month=3:position=all:year=all"
        );
    }

    #[test]
    fn test_report_key_all_sentinel_for_unfiltered() {
        let request =
            ReportRequest::appointments(Granularity::Year, &AppointmentGraphFilter::default());

        assert_eq!(
            report_key(&request),
            "graph:appointments:year:month=all:name=all:status=all:year=all"
        );
    }

    #[test]
    fn test_collection_from_key() {
        let request = ReportRequest::travels(Granularity::Week, &TravelGraphFilter::default());
        let key = report_key(&request);

        assert_eq!(collection_from_key(&key), Some(Collection::Travels));
        assert_eq!(collection_from_key("graph:employees:year"), Some(Collection::Employees));
        assert_eq!(collection_from_key("graph:unknown:year"), None);
        assert_eq!(collection_from_key("other:travels"), None);
    }

    #[test]
    fn test_is_report_key() {
        assert!(is_report_key("graph:travels:month:employee=all"));
        assert!(!is_report_key("session:abc"));
    }

    #[test]
    fn test_invalidation_targets_cover_dependents() {
        assert_eq!(
            invalidation_targets(Collection::Employees),
            &[Collection::Employees, Collection::Travels]
        );
        assert_eq!(
            invalidation_targets(Collection::Travels),
            &[Collection::Travels]
        );
        assert_eq!(
            invalidation_targets(Collection::Appointments),
            &[Collection::Appointments]
        );
    }
}
