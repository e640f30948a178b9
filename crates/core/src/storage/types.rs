use chrono::NaiveDate;

/// Outcome of an insert-or-ignore upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Id of the newly inserted row, `None` when the natural key already
    /// existed and the insert was ignored.
    pub id: Option<i64>,
    pub inserted: bool,
}

/// Outcome of a bulk load: rows written plus rows skipped by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    pub affected: u64,
    pub skipped: usize,
}

/// Outcome of a selective delete: rows removed and the attachment paths the
/// removed rows owned (deleted from the file store by the caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDelete {
    pub deleted: u64,
    pub attachments: Vec<String>,
}

/// Filter for selective deletes: an id set and/or an inclusive date range
/// over the collection's time field. At least one part must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectiveDelete {
    pub ids: Option<Vec<i64>>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl SelectiveDelete {
    /// True when no filter part is present; such a request is rejected
    /// rather than deleting the whole collection.
    pub fn is_empty(&self) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.is_empty())
            && self.from_date.is_none()
            && self.to_date.is_none()
    }
}

/// Ad-hoc listing filter for travel authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelListFilter {
    /// Substring match on the traveler name.
    pub name: Option<String>,
    /// Exact match on the traveler initials.
    pub initial: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Substring match on the funding source.
    pub fund_source: Option<String>,
}

impl TravelListFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.initial.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.fund_source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selective_delete_empty_detection() {
        assert!(SelectiveDelete::default().is_empty());
        assert!(SelectiveDelete {
            ids: Some(vec![]),
            ..Default::default()
        }
        .is_empty());

        assert!(!SelectiveDelete {
            ids: Some(vec![1]),
            ..Default::default()
        }
        .is_empty());
        assert!(!SelectiveDelete {
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_travel_list_filter_empty_detection() {
        assert!(TravelListFilter::default().is_empty());
        assert!(!TravelListFilter {
            initial: Some("AB".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
