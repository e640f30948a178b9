use serde::Deserialize;

use registra_core::records::{parse_flexible_date, NewAppointment};
use registra_core::report::{AppointmentGraphFilter, Granularity};
use registra_core::serde::{
    deserialize_optional_date, deserialize_optional_i64, deserialize_optional_string,
};

use super::deserialize_optional_cell;

/// Request payload for creating or updating an appointment.
#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "positionTitle")]
    pub position_title: String,
    #[serde(default, rename = "statusAppointment")]
    pub status: String,
    #[serde(default, rename = "schoolOffice")]
    pub school_office: String,
    #[serde(default, rename = "natureAppointment")]
    pub nature: String,
    #[serde(default, rename = "itemNo")]
    pub item_no: String,
    #[serde(default, rename = "DateSigned", deserialize_with = "deserialize_optional_date")]
    pub date_signed: Option<chrono::NaiveDate>,
}

impl CreateAppointment {
    pub fn into_new_appointment(self) -> NewAppointment {
        NewAppointment {
            name: self.name,
            position_title: self.position_title,
            status: self.status,
            school_office: self.school_office,
            nature: self.nature,
            item_no: self.item_no,
            date_signed: self.date_signed,
        }
    }
}

/// One entry of a bulk appointment load; the signing date accepts the
/// flexible sheet formats.
#[derive(Debug, Deserialize)]
pub struct BulkAppointmentEntry {
    #[serde(default, deserialize_with = "deserialize_optional_cell")]
    pub name: Option<String>,
    #[serde(default, rename = "positionTitle", deserialize_with = "deserialize_optional_cell")]
    pub position_title: Option<String>,
    #[serde(default, rename = "statusAppointment", deserialize_with = "deserialize_optional_cell")]
    pub status: Option<String>,
    #[serde(default, rename = "schoolOffice", deserialize_with = "deserialize_optional_cell")]
    pub school_office: Option<String>,
    #[serde(default, rename = "natureAppointment", deserialize_with = "deserialize_optional_cell")]
    pub nature: Option<String>,
    #[serde(default, rename = "itemNo", deserialize_with = "deserialize_optional_cell")]
    pub item_no: Option<String>,
    #[serde(default, rename = "DateSigned", deserialize_with = "deserialize_optional_cell")]
    pub date_signed: Option<String>,
}

impl BulkAppointmentEntry {
    pub fn into_new_appointment(self) -> NewAppointment {
        NewAppointment {
            name: self.name.unwrap_or_default(),
            position_title: self.position_title.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            school_office: self.school_office.unwrap_or_default(),
            nature: self.nature.unwrap_or_default(),
            item_no: self.item_no.unwrap_or_default(),
            date_signed: self.date_signed.as_deref().and_then(parse_flexible_date),
        }
    }
}

/// Body of `POST /appointments/bulk`: `{ "appointments": [...] }`.
#[derive(Debug, Deserialize)]
pub struct BulkAppointmentsRequest {
    pub appointments: Vec<BulkAppointmentEntry>,
}

/// Query parameters for `GET /appointments/graph`.
#[derive(Debug, Deserialize)]
pub struct AppointmentGraphQuery {
    #[serde(rename = "type")]
    pub granularity: Granularity,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, rename = "statusAppointment", deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub month: Option<i64>,
}

impl AppointmentGraphQuery {
    pub fn into_filter(self) -> AppointmentGraphFilter {
        AppointmentGraphFilter {
            name: self.name,
            status: self.status,
            year: self.year.map(|y| y as i32),
            month: self.month.map(|m| m as u32),
        }
    }
}
