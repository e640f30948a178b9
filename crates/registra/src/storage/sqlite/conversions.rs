//! Row-to-domain conversions and date formatting for the SQLite backend.
//!
//! Dates are stored as `YYYY-MM-DD` text columns.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;

use registra_core::records::{Appointment, Employee, TravelAuthority};

/// Formats a date for storage.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats an optional date for storage.
pub fn format_optional_date(date: &Option<NaiveDate>) -> Option<String> {
    date.as_ref().map(format_date)
}

/// Parses a stored date column, mapping parse failures to a conversion
/// error carrying the column index.
pub fn parse_optional_date(
    value: Option<String>,
    column: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    match value {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

pub fn row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        office: row.get(1)?,
        full_name: row.get(2)?,
        position_title: row.get(3)?,
        initial: row.get(4)?,
        fund_source: row.get(5)?,
    })
}

pub fn row_to_travel(row: &Row) -> rusqlite::Result<TravelAuthority> {
    Ok(TravelAuthority {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        initial: row.get(2)?,
        name: row.get(3)?,
        position_designation: row.get(4)?,
        station: row.get(5)?,
        purpose: row.get(6)?,
        host: row.get(7)?,
        dates_from: parse_optional_date(row.get(8)?, 8)?,
        dates_to: parse_optional_date(row.get(9)?, 9)?,
        destination: row.get(10)?,
        area: row.get(11)?,
        fund_source: row.get(12)?,
        attachment: row.get(13)?,
    })
}

pub fn row_to_appointment(row: &Row) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        name: row.get(1)?,
        position_title: row.get(2)?,
        status: row.get(3)?,
        school_office: row.get(4)?,
        nature: row.get(5)?,
        item_no: row.get(6)?,
        date_signed: parse_optional_date(row.get(7)?, 7)?,
        attachment: row.get(8)?,
    })
}
