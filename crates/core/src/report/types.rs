use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::Collection;

/// Time-bucket granularity for aggregate reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
    Week,
    Date,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Week => "week",
            Granularity::Date => "date",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Granularity::Year),
            "month" => Ok(Granularity::Month),
            "week" => Ok(Granularity::Week),
            "date" => Ok(Granularity::Date),
            other => Err(format!("invalid granularity: {other}")),
        }
    }
}

/// Sentinel recorded for a dimension with no filter applied.
const ALL: &str = "all";

fn dimension(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => ALL.to_string(),
    }
}

/// Filter dimensions for travel-authority reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelGraphFilter {
    pub employee_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub position_title: Option<String>,
}

impl TravelGraphFilter {
    /// Normalized dimension map: every known dimension is present, absent
    /// filters carry the `all` sentinel.
    pub fn dimensions(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            (
                "employee",
                dimension(self.employee_id.map(|id| id.to_string())),
            ),
            ("year", dimension(self.year.map(|y| y.to_string()))),
            ("month", dimension(self.month.map(|m| m.to_string()))),
            ("position", dimension(self.position_title.clone())),
        ])
    }
}

/// Filter dimensions for appointment reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentGraphFilter {
    pub name: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl AppointmentGraphFilter {
    pub fn dimensions(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", dimension(self.name.clone())),
            ("status", dimension(self.status.clone())),
            ("year", dimension(self.year.map(|y| y.to_string()))),
            ("month", dimension(self.month.map(|m| m.to_string()))),
        ])
    }
}

/// A fully-specified report request: the typed cache identity.
///
/// Two requests are equal iff collection, granularity, and every normalized
/// dimension are equal; the `BTreeMap` keeps dimensions sorted so the
/// canonical key is independent of construction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub collection: Collection,
    pub granularity: Granularity,
    pub dimensions: BTreeMap<&'static str, String>,
}

impl ReportRequest {
    pub fn travels(granularity: Granularity, filter: &TravelGraphFilter) -> Self {
        Self {
            collection: Collection::Travels,
            granularity,
            dimensions: filter.dimensions(),
        }
    }

    pub fn appointments(granularity: Granularity, filter: &AppointmentGraphFilter) -> Self {
        Self {
            collection: Collection::Appointments,
            granularity,
            dimensions: filter.dimensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_round_trip() {
        for g in [
            Granularity::Year,
            Granularity::Month,
            Granularity::Week,
            Granularity::Date,
        ] {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
        assert!("decade".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_absent_filters_normalize_to_all() {
        let dims = TravelGraphFilter::default().dimensions();
        assert_eq!(dims["employee"], "all");
        assert_eq!(dims["year"], "all");
        assert_eq!(dims["month"], "all");
        assert_eq!(dims["position"], "all");
    }

    #[test]
    fn test_blank_filter_values_normalize_to_all() {
        let filter = AppointmentGraphFilter {
            name: Some("   ".to_string()),
            status: Some("Confirmed".to_string()),
            year: None,
            month: None,
        };
        let dims = filter.dimensions();
        assert_eq!(dims["name"], "all");
        assert_eq!(dims["status"], "Confirmed");
    }

    #[test]
    fn test_request_equality_ignores_construction_order() {
        let a = ReportRequest::travels(
            Granularity::Month,
            &TravelGraphFilter {
                employee_id: Some(4),
                position_title: Some("Teacher".to_string()),
                ..Default::default()
            },
        );
        let b = ReportRequest::travels(
            Granularity::Month,
            &TravelGraphFilter {
                position_title: Some("Teacher".to_string()),
                employee_id: Some(4),
                ..Default::default()
            },
        );
        assert_eq!(a, b);
    }
}
