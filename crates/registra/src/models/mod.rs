//! Request payload models.
//!
//! These carry the exact field names the browser UI sends (a mix of
//! camelCase, lowercase, and legacy capitalized names) and convert into the
//! core domain types.

mod appointment;
mod employee;
mod travel;

pub use appointment::{AppointmentGraphQuery, BulkAppointmentsRequest, CreateAppointment};
pub use employee::{CreateEmployee, EmployeeSheetRow, UploadRequest};
pub use travel::{
    BulkTravelRequest, CreateTravel, TravelFilterQuery, TravelGraphQuery, TravelSheetRowDto,
};

use serde::{Deserialize, Deserializer};

use registra_core::records::parse_flexible_date;
use registra_core::storage::{RepositoryError, Result, SelectiveDelete};

/// Parses a user-supplied date string, failing loudly instead of silently
/// dropping a filter bound.
pub(crate) fn parse_required_date(raw: &str) -> Result<chrono::NaiveDate> {
    parse_flexible_date(raw)
        .ok_or_else(|| RepositoryError::Validation(format!("invalid date: {raw}")))
}

/// Deserializes a spreadsheet cell that may arrive as a string, a number
/// (Excel date serials come through as numbers), or null.
pub(crate) fn deserialize_optional_cell<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Cell::Integer(n)) => Some(n.to_string()),
        Some(Cell::Float(f)) => Some(f.to_string()),
        _ => None,
    })
}

/// Request body for the selective-delete endpoints. Dates accept the same
/// flexible formats as spreadsheet cells.
#[derive(Debug, Deserialize)]
pub struct SelectiveDeleteRequest {
    #[serde(default)]
    pub ids: Option<Vec<i64>>,
    #[serde(default, rename = "fromDate", deserialize_with = "deserialize_optional_cell")]
    pub from_date: Option<String>,
    #[serde(default, rename = "toDate", deserialize_with = "deserialize_optional_cell")]
    pub to_date: Option<String>,
}

impl SelectiveDeleteRequest {
    pub fn into_filter(self) -> Result<SelectiveDelete> {
        Ok(SelectiveDelete {
            ids: self.ids,
            from_date: self.from_date.as_deref().map(parse_required_date).transpose()?,
            to_date: self.to_date.as_deref().map(parse_required_date).transpose()?,
        })
    }
}
