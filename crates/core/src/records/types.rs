use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::{RepositoryError, Result};

/// Identifies one of the three record collections.
///
/// The tag travels with every mutation notification and is embedded in every
/// report cache key, so invalidation can be scoped to exactly one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Employees,
    Travels,
    Appointments,
}

impl Collection {
    /// Stable string tag used in cache keys and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Travels => "travels",
            Collection::Appointments => "appointments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee record, looked up by initials for idempotent upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub office: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "positionTitle")]
    pub position_title: String,
    #[serde(rename = "Initial")]
    pub initial: String,
    #[serde(rename = "sof")]
    pub fund_source: String,
}

/// Fields for a new employee. The initials are the natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub office: String,
    pub full_name: String,
    pub position_title: String,
    pub initial: String,
    pub fund_source: String,
}

impl NewEmployee {
    /// Checks the required fields (everything except the funding source).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("office", &self.office),
            ("fullname", &self.full_name),
            ("positionTitle", &self.position_title),
            ("Initial", &self.initial),
        ] {
            if value.trim().is_empty() {
                return Err(RepositoryError::Validation(format!(
                    "missing required field: {name}"
                )));
            }
        }
        Ok(())
    }

    /// Row-level check for bulk loads: invalid rows are skipped, not fatal.
    pub fn is_valid_row(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A travel authority record.
///
/// `employee_id` is a foreign attribute referencing an [`Employee`]; sheet
/// ingestion fills `initial`/`name` directly instead since spreadsheets carry
/// names, not ids. `dates_from` is the time field used by report bucketing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelAuthority {
    pub id: i64,
    #[serde(rename = "employee_ID")]
    pub employee_id: Option<i64>,
    #[serde(rename = "Initial")]
    pub initial: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PositionDesignation")]
    pub position_designation: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Purpose")]
    pub purpose: String,
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "DatesFrom")]
    pub dates_from: Option<NaiveDate>,
    #[serde(rename = "DatesTo")]
    pub dates_to: Option<NaiveDate>,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "sof")]
    pub fund_source: String,
    #[serde(rename = "Attachment")]
    pub attachment: Option<String>,
}

/// Fields for creating or updating a travel authority through the form path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTravel {
    pub employee_id: Option<i64>,
    pub initial: String,
    pub name: String,
    pub position_designation: String,
    pub station: String,
    pub purpose: String,
    pub host: String,
    pub dates_from: Option<NaiveDate>,
    pub dates_to: Option<NaiveDate>,
    pub destination: String,
    pub area: String,
    pub fund_source: String,
}

impl NewTravel {
    /// Checks the required fields for the form create/update path.
    pub fn validate(&self) -> Result<()> {
        if self.employee_id.is_none() {
            return Err(RepositoryError::Validation(
                "missing required field: employeeID".to_string(),
            ));
        }
        if self.dates_from.is_none() {
            return Err(RepositoryError::Validation(
                "missing required field: datesfrom".to_string(),
            ));
        }
        if self.dates_to.is_none() {
            return Err(RepositoryError::Validation(
                "missing required field: datesto".to_string(),
            ));
        }
        for (name, value) in [
            ("positiondesignation", &self.position_designation),
            ("station", &self.station),
            ("purpose", &self.purpose),
            ("host", &self.host),
            ("destination", &self.destination),
            ("area", &self.area),
            ("sof", &self.fund_source),
        ] {
            if value.trim().is_empty() {
                return Err(RepositoryError::Validation(format!(
                    "missing required field: {name}"
                )));
            }
        }
        Ok(())
    }

    /// Row-level check for bulk loads: invalid rows are skipped, not fatal.
    pub fn is_valid_row(&self) -> bool {
        self.validate().is_ok()
    }
}

/// One raw row from a parsed travel spreadsheet.
///
/// A single sheet row can describe several travelers with `;`-separated
/// names, initials, positions, and funding sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelSheetRow {
    pub initial: String,
    pub name: String,
    pub position_designation: String,
    pub station: String,
    pub purpose: String,
    pub host: String,
    pub dates_from: Option<NaiveDate>,
    pub dates_to: Option<NaiveDate>,
    pub destination: String,
    pub area: String,
    pub fund_source: String,
}

fn split_multi(field: &str) -> Vec<String> {
    let parts: Vec<String> = field
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        vec![String::new()]
    } else {
        parts
    }
}

/// Expands a sheet row into one [`NewTravel`] per listed traveler.
///
/// The name column drives the expansion; initials, positions, and funding
/// sources are matched by index and fall back to the row-level value.
pub fn expand_travel_sheet_row(row: &TravelSheetRow) -> Vec<NewTravel> {
    let names = split_multi(&row.name);
    let initials = split_multi(&row.initial);
    let positions = split_multi(&row.position_designation);
    let fund_sources = split_multi(&row.fund_source);

    names
        .iter()
        .enumerate()
        .map(|(index, name)| NewTravel {
            employee_id: None,
            initial: initials.get(index).cloned().unwrap_or_default(),
            name: name.clone(),
            position_designation: positions
                .get(index)
                .filter(|p| !p.is_empty())
                .cloned()
                .unwrap_or_else(|| row.position_designation.clone()),
            station: row.station.clone(),
            purpose: row.purpose.clone(),
            host: row.host.clone(),
            dates_from: row.dates_from,
            dates_to: row.dates_to,
            destination: row.destination.clone(),
            area: row.area.clone(),
            fund_source: fund_sources
                .get(index)
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| row.fund_source.clone()),
        })
        .collect()
}

/// An appointment document record. `date_signed` is the report time field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    #[serde(rename = "positionTitle")]
    pub position_title: String,
    #[serde(rename = "statusAppointment")]
    pub status: String,
    #[serde(rename = "schoolOffice")]
    pub school_office: String,
    #[serde(rename = "natureAppointment")]
    pub nature: String,
    #[serde(rename = "itemNo")]
    pub item_no: String,
    #[serde(rename = "DateSigned")]
    pub date_signed: Option<NaiveDate>,
    #[serde(rename = "pdfPath")]
    pub attachment: Option<String>,
}

/// Fields for creating or updating an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAppointment {
    pub name: String,
    pub position_title: String,
    pub status: String,
    pub school_office: String,
    pub nature: String,
    pub item_no: String,
    pub date_signed: Option<NaiveDate>,
}

impl NewAppointment {
    /// Checks the required fields (nature and item number are optional).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("name", &self.name),
            ("positionTitle", &self.position_title),
            ("statusAppointment", &self.status),
            ("schoolOffice", &self.school_office),
        ] {
            if value.trim().is_empty() {
                return Err(RepositoryError::Validation(format!(
                    "missing required field: {name}"
                )));
            }
        }
        if self.date_signed.is_none() {
            return Err(RepositoryError::Validation(
                "missing required field: DateSigned".to_string(),
            ));
        }
        Ok(())
    }

    /// Row-level check for bulk loads: invalid rows are skipped, not fatal.
    pub fn is_valid_row(&self) -> bool {
        self.validate().is_ok()
    }
}
