use serde::Deserialize;

use registra_core::records::{parse_flexible_date, NewTravel, TravelSheetRow};
use registra_core::report::{Granularity, TravelGraphFilter};
use registra_core::serde::{
    deserialize_optional_date, deserialize_optional_i64, deserialize_optional_string,
};
use registra_core::storage::TravelListFilter;

use super::deserialize_optional_cell;

/// Request payload for creating or updating a travel authority.
///
/// Arrives as JSON or as multipart text fields; numbers may therefore be
/// strings.
#[derive(Debug, Deserialize)]
pub struct CreateTravel {
    #[serde(default, rename = "employeeID", deserialize_with = "deserialize_optional_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, rename = "positiondesignation")]
    pub position_designation: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub host: String,
    #[serde(default, rename = "datesfrom", deserialize_with = "deserialize_optional_date")]
    pub dates_from: Option<chrono::NaiveDate>,
    #[serde(default, rename = "datesto", deserialize_with = "deserialize_optional_date")]
    pub dates_to: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, rename = "sof")]
    pub fund_source: String,
}

impl CreateTravel {
    pub fn into_new_travel(self) -> NewTravel {
        NewTravel {
            employee_id: self.employee_id,
            initial: String::new(),
            name: String::new(),
            position_designation: self.position_designation,
            station: self.station,
            purpose: self.purpose,
            host: self.host,
            dates_from: self.dates_from,
            dates_to: self.dates_to,
            destination: self.destination,
            area: self.area,
            fund_source: self.fund_source,
        }
    }
}

/// One entry of a bulk travel load; dates accept the flexible sheet formats.
#[derive(Debug, Deserialize)]
pub struct BulkTravelEntry {
    #[serde(default, rename = "employeeID", deserialize_with = "deserialize_optional_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, rename = "positiondesignation")]
    pub position_designation: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub host: String,
    #[serde(default, rename = "fromDate", deserialize_with = "deserialize_optional_cell")]
    pub from_date: Option<String>,
    #[serde(default, rename = "toDate", deserialize_with = "deserialize_optional_cell")]
    pub to_date: Option<String>,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, rename = "sof")]
    pub fund_source: String,
}

impl BulkTravelEntry {
    pub fn into_new_travel(self) -> NewTravel {
        NewTravel {
            employee_id: self.employee_id,
            initial: String::new(),
            name: String::new(),
            position_designation: self.position_designation,
            station: self.station,
            purpose: self.purpose,
            host: self.host,
            dates_from: self.from_date.as_deref().and_then(parse_flexible_date),
            dates_to: self.to_date.as_deref().and_then(parse_flexible_date),
            destination: self.destination,
            area: self.area,
            fund_source: self.fund_source,
        }
    }
}

/// Body of `POST /travels/bulk`.
///
/// The destructive full-replace load must be requested explicitly with
/// `"replace": true`; a bare entry array is an append.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BulkTravelRequest {
    Tagged {
        entries: Vec<BulkTravelEntry>,
        #[serde(default)]
        replace: bool,
    },
    Entries(Vec<BulkTravelEntry>),
}

impl BulkTravelRequest {
    pub fn into_parts(self) -> (Vec<BulkTravelEntry>, bool) {
        match self {
            BulkTravelRequest::Tagged { entries, replace } => (entries, replace),
            BulkTravelRequest::Entries(entries) => (entries, false),
        }
    }
}

/// One row of a parsed travel spreadsheet (`POST /travels/upload`).
#[derive(Debug, Deserialize)]
pub struct TravelSheetRowDto {
    #[serde(default, rename = "Initial", deserialize_with = "deserialize_optional_cell")]
    pub initial: Option<String>,
    #[serde(default, rename = "Name", deserialize_with = "deserialize_optional_cell")]
    pub name: Option<String>,
    #[serde(default, rename = "PositionDesignation", deserialize_with = "deserialize_optional_cell")]
    pub position_designation: Option<String>,
    #[serde(default, rename = "Station", deserialize_with = "deserialize_optional_cell")]
    pub station: Option<String>,
    #[serde(default, rename = "Purpose", deserialize_with = "deserialize_optional_cell")]
    pub purpose: Option<String>,
    #[serde(default, rename = "Host", deserialize_with = "deserialize_optional_cell")]
    pub host: Option<String>,
    #[serde(default, rename = "DatesFrom", deserialize_with = "deserialize_optional_cell")]
    pub dates_from: Option<String>,
    #[serde(default, rename = "DatesTo", deserialize_with = "deserialize_optional_cell")]
    pub dates_to: Option<String>,
    #[serde(default, rename = "Destination", deserialize_with = "deserialize_optional_cell")]
    pub destination: Option<String>,
    #[serde(default, rename = "Area", deserialize_with = "deserialize_optional_cell")]
    pub area: Option<String>,
    #[serde(default, rename = "sof", deserialize_with = "deserialize_optional_cell")]
    pub fund_source: Option<String>,
}

impl TravelSheetRowDto {
    pub fn into_sheet_row(self) -> TravelSheetRow {
        TravelSheetRow {
            initial: self.initial.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            position_designation: self.position_designation.unwrap_or_default(),
            station: self.station.unwrap_or_default(),
            purpose: self.purpose.unwrap_or_default(),
            host: self.host.unwrap_or_default(),
            dates_from: self.dates_from.as_deref().and_then(parse_flexible_date),
            dates_to: self.dates_to.as_deref().and_then(parse_flexible_date),
            destination: self.destination.unwrap_or_default(),
            area: self.area.unwrap_or_default(),
            fund_source: self.fund_source.unwrap_or_default(),
        }
    }
}

/// Query parameters for `GET /travels/filter`.
#[derive(Debug, Deserialize)]
pub struct TravelFilterQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub initial: Option<String>,
    #[serde(default, rename = "fromDate", deserialize_with = "deserialize_optional_date")]
    pub from_date: Option<chrono::NaiveDate>,
    #[serde(default, rename = "toDate", deserialize_with = "deserialize_optional_date")]
    pub to_date: Option<chrono::NaiveDate>,
    #[serde(default, rename = "sof", deserialize_with = "deserialize_optional_string")]
    pub fund_source: Option<String>,
}

impl TravelFilterQuery {
    pub fn into_filter(self) -> TravelListFilter {
        TravelListFilter {
            name: self.name,
            initial: self.initial,
            from_date: self.from_date,
            to_date: self.to_date,
            fund_source: self.fund_source,
        }
    }
}

/// Query parameters for `GET /travels/graph`.
#[derive(Debug, Deserialize)]
pub struct TravelGraphQuery {
    #[serde(rename = "type")]
    pub granularity: Granularity,
    #[serde(default, rename = "employee_ID", deserialize_with = "deserialize_optional_i64")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub month: Option<i64>,
    #[serde(default, rename = "positionTitle", deserialize_with = "deserialize_optional_string")]
    pub position_title: Option<String>,
}

impl TravelGraphQuery {
    pub fn into_filter(self) -> TravelGraphFilter {
        TravelGraphFilter {
            employee_id: self.employee_id,
            year: self.year.map(|y| y as i32),
            month: self.month.map(|m| m as u32),
            position_title: self.position_title,
        }
    }
}
