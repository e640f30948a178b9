use async_trait::async_trait;

use crate::records::{
    Appointment, Employee, NewAppointment, NewEmployee, NewTravel, TravelAuthority,
};
use crate::report::{AppointmentGraphFilter, Granularity, GraphResponse, TravelGraphFilter};

use super::{BatchDelete, BulkOutcome, Result, SelectiveDelete, TravelListFilter, UpsertOutcome};

/// Repository for employee records.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Lists every employee.
    async fn list_employees(&self) -> Result<Vec<Employee>>;

    /// Inserts an employee, ignoring the insert when the natural key
    /// (initials) already exists.
    async fn create_employee(&self, employee: &NewEmployee) -> Result<UpsertOutcome>;

    /// Deletes an employee by id.
    async fn delete_employee(&self, id: i64) -> Result<()>;

    /// Upserts a batch of parsed spreadsheet rows in one transaction.
    /// Rows failing required-field validation are skipped.
    async fn bulk_upsert_employees(&self, rows: &[NewEmployee]) -> Result<BulkOutcome>;
}

/// Repository for travel-authority records.
#[async_trait]
pub trait TravelRepository: Send + Sync {
    /// Lists every travel authority, with the traveler name resolved from
    /// the employees table when the record carries an employee id.
    async fn list_travels(&self) -> Result<Vec<TravelAuthority>>;

    /// Ad-hoc filtered listing, newest first.
    async fn filter_travels(&self, filter: &TravelListFilter) -> Result<Vec<TravelAuthority>>;

    /// Creates a travel authority; `attachment` is an already-stored file
    /// path to associate with the new record.
    async fn create_travel(&self, travel: &NewTravel, attachment: Option<&str>) -> Result<i64>;

    /// Updates a travel authority. When `attachment` is given the old path
    /// is replaced and returned so the caller can delete the file.
    async fn update_travel(
        &self,
        id: i64,
        travel: &NewTravel,
        attachment: Option<&str>,
    ) -> Result<Option<String>>;

    /// Deletes a travel authority, returning its attachment path if any.
    async fn delete_travel(&self, id: i64) -> Result<Option<String>>;

    /// Deletes every travel authority matching the filter in one
    /// transaction. Fails with NotFound when nothing matches.
    async fn selective_delete_travels(&self, filter: &SelectiveDelete) -> Result<BatchDelete>;

    /// Bulk JSON load. With `replace` every existing row is deleted first in
    /// the same transaction; the whole request fails (and the delete rolls
    /// back) when zero rows survive validation.
    async fn bulk_insert_travels(&self, rows: &[NewTravel], replace: bool) -> Result<BulkOutcome>;

    /// Spreadsheet ingestion: appends expanded sheet rows, skipping rows
    /// whose name is blank.
    async fn sheet_upsert_travels(&self, rows: &[NewTravel]) -> Result<BulkOutcome>;

    /// Computes the aggregate report for the filter at the given
    /// granularity.
    async fn travel_graph(
        &self,
        granularity: Granularity,
        filter: &TravelGraphFilter,
    ) -> Result<GraphResponse>;
}

/// Repository for appointment records.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Lists every appointment.
    async fn list_appointments(&self) -> Result<Vec<Appointment>>;

    /// Creates an appointment with an optional already-stored attachment.
    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<i64>;

    /// Updates an appointment, returning the replaced attachment path when a
    /// new attachment displaces an old one.
    async fn update_appointment(
        &self,
        id: i64,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<Option<String>>;

    /// Deletes an appointment, returning its attachment path if any.
    async fn delete_appointment(&self, id: i64) -> Result<Option<String>>;

    /// Deletes every appointment matching the filter in one transaction.
    async fn selective_delete_appointments(
        &self,
        filter: &SelectiveDelete,
    ) -> Result<BatchDelete>;

    /// Bulk JSON load, append-only. Rows failing validation are skipped.
    async fn bulk_insert_appointments(&self, rows: &[NewAppointment]) -> Result<BulkOutcome>;

    /// Attachment-only update: associates the stored path with the record
    /// and returns the replaced path if one existed.
    async fn set_appointment_attachment(&self, id: i64, path: &str) -> Result<Option<String>>;

    /// Computes the aggregate report for the filter at the given
    /// granularity.
    async fn appointment_graph(
        &self,
        granularity: Granularity,
        filter: &AppointmentGraphFilter,
    ) -> Result<GraphResponse>;
}

/// Store for attachment files, keyed by generated path.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists the bytes under a collision-resistant generated name and
    /// returns the public path.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String>;

    /// Deletes a stored file by its public path. Deleting a missing file is
    /// not an error.
    async fn delete(&self, path: &str) -> Result<()>;
}
