//! SQLite repository implementation.
//!
//! Implements the repository traits from `registra_core::storage`. Every
//! multi-statement operation (attachment bookkeeping, selective deletes,
//! bulk replace) runs inside one transaction: either all row changes commit
//! or none do.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use tokio_rusqlite::Connection;

use registra_core::records::{
    Appointment, Employee, NewAppointment, NewEmployee, NewTravel, TravelAuthority,
};
use registra_core::report::{
    bucket_counts, AppointmentGraphFilter, Granularity, GraphResponse, TravelGraphFilter,
};
use registra_core::storage::{
    AppointmentRepository, BatchDelete, BulkOutcome, EmployeeRepository, RepositoryError, Result,
    SelectiveDelete, TravelListFilter, TravelRepository, UpsertOutcome,
};

use super::conversions::{
    format_date, format_optional_date, parse_optional_date, row_to_appointment, row_to_employee,
    row_to_travel,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Builds the `AND ...` predicate tail for a selective delete.
///
/// `from_column`/`to_column` name the date columns the range filters apply
/// to (travels bound the range with two columns, appointments with one).
fn selective_where(
    filter: &SelectiveDelete,
    from_column: &str,
    to_column: &str,
) -> (String, Vec<Value>) {
    let mut clause = String::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(ids) = &filter.ids {
        if !ids.is_empty() {
            let placeholders = vec!["?"; ids.len()].join(", ");
            clause.push_str(&format!(" AND id IN ({placeholders})"));
            params.extend(ids.iter().map(|id| Value::Integer(*id)));
        }
    }
    if let Some(from) = &filter.from_date {
        clause.push_str(&format!(" AND {from_column} >= ?"));
        params.push(Value::Text(format_date(from)));
    }
    if let Some(to) = &filter.to_date {
        clause.push_str(&format!(" AND {to_column} <= ?"));
        params.push(Value::Text(format_date(to)));
    }

    (clause, params)
}

/// SQLite-based repository implementation for all three collections.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file is created if it doesn't exist and the schema is
    /// applied. Pass `":memory:"` for an ephemeral database.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory().await
        } else {
            Connection::open(path).await
        }
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// EmployeeRepository implementation
// ============================================================================

#[async_trait]
impl EmployeeRepository for SqliteRepository {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_EMPLOYEES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_employee).map_err(wrap_err)?;

                let mut employees = Vec::new();
                for row_result in rows {
                    employees.push(row_result.map_err(wrap_err)?);
                }
                Ok(employees)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<UpsertOutcome> {
        employee.validate()?;

        let office = employee.office.clone();
        let full_name = employee.full_name.clone();
        let position_title = employee.position_title.clone();
        let initial = employee.initial.clone();
        let fund_source = employee.fund_source.clone();
        let initial_for_err = employee.initial.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::INSERT_EMPLOYEE,
                        rusqlite::params![office, full_name, position_title, initial, fund_source],
                    )
                    .map_err(wrap_err)?;
                // A conflict on the natural key leaves rows at 0: the record
                // already exists and the insert was ignored.
                if rows == 0 {
                    Ok(UpsertOutcome {
                        id: None,
                        inserted: false,
                    })
                } else {
                    Ok(UpsertOutcome {
                        id: Some(conn.last_insert_rowid()),
                        inserted: true,
                    })
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee", initial_for_err))
    }

    async fn delete_employee(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_EMPLOYEE, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee", id.to_string()))
    }

    async fn bulk_upsert_employees(&self, rows: &[NewEmployee]) -> Result<BulkOutcome> {
        let valid: Vec<NewEmployee> = rows.iter().filter(|r| r.is_valid_row()).cloned().collect();
        let skipped = rows.len() - valid.len();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut affected = 0u64;
                for employee in &valid {
                    affected += tx
                        .execute(
                            schema::INSERT_EMPLOYEE,
                            rusqlite::params![
                                employee.office,
                                employee.full_name,
                                employee.position_title,
                                employee.initial,
                                employee.fund_source
                            ],
                        )
                        .map_err(wrap_err)? as u64;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(BulkOutcome { affected, skipped })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee", "bulk"))
    }
}

// ============================================================================
// TravelRepository implementation
// ============================================================================

fn insert_travel_params(travel: &NewTravel, attachment: Option<&str>) -> Vec<Value> {
    vec![
        travel
            .employee_id
            .map(Value::Integer)
            .unwrap_or(Value::Null),
        Value::Text(travel.initial.clone()),
        Value::Text(travel.name.clone()),
        Value::Text(travel.position_designation.clone()),
        Value::Text(travel.station.clone()),
        Value::Text(travel.purpose.clone()),
        Value::Text(travel.host.clone()),
        format_optional_date(&travel.dates_from)
            .map(Value::Text)
            .unwrap_or(Value::Null),
        format_optional_date(&travel.dates_to)
            .map(Value::Text)
            .unwrap_or(Value::Null),
        Value::Text(travel.destination.clone()),
        Value::Text(travel.area.clone()),
        Value::Text(travel.fund_source.clone()),
        attachment
            .map(|a| Value::Text(a.to_string()))
            .unwrap_or(Value::Null),
    ]
}

#[async_trait]
impl TravelRepository for SqliteRepository {
    async fn list_travels(&self) -> Result<Vec<TravelAuthority>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_TRAVELS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_travel).map_err(wrap_err)?;

                let mut travels = Vec::new();
                for row_result in rows {
                    travels.push(row_result.map_err(wrap_err)?);
                }
                Ok(travels)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn filter_travels(&self, filter: &TravelListFilter) -> Result<Vec<TravelAuthority>> {
        let mut sql = format!("{} WHERE 1=1", schema::SELECT_TRAVEL_COLUMNS.trim());
        let mut params: Vec<Value> = Vec::new();

        if let Some(name) = &filter.name {
            sql.push_str(" AND name LIKE ?");
            params.push(Value::Text(format!("%{name}%")));
        }
        if let Some(initial) = &filter.initial {
            sql.push_str(" AND initial = ?");
            params.push(Value::Text(initial.clone()));
        }
        if let Some(from) = &filter.from_date {
            sql.push_str(" AND dates_from >= ?");
            params.push(Value::Text(format_date(from)));
        }
        if let Some(to) = &filter.to_date {
            sql.push_str(" AND dates_to <= ?");
            params.push(Value::Text(format_date(to)));
        }
        if let Some(fund_source) = &filter.fund_source {
            sql.push_str(" AND fund_source LIKE ?");
            params.push(Value::Text(format!("%{fund_source}%")));
        }

        sql.push_str(" ORDER BY dates_from DESC");
        // Unfiltered listings are capped; the full table has its own route.
        if filter.is_empty() {
            sql.push_str(" LIMIT 1000");
        }

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), row_to_travel)
                    .map_err(wrap_err)?;

                let mut travels = Vec::new();
                for row_result in rows {
                    travels.push(row_result.map_err(wrap_err)?);
                }
                Ok(travels)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_travel(&self, travel: &NewTravel, attachment: Option<&str>) -> Result<i64> {
        travel.validate()?;

        let params = insert_travel_params(travel, attachment);

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_TRAVEL, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", "new"))
    }

    async fn update_travel(
        &self,
        id: i64,
        travel: &NewTravel,
        attachment: Option<&str>,
    ) -> Result<Option<String>> {
        travel.validate()?;

        let employee_id = travel.employee_id;
        let position_designation = travel.position_designation.clone();
        let station = travel.station.clone();
        let purpose = travel.purpose.clone();
        let host = travel.host.clone();
        let dates_from = format_optional_date(&travel.dates_from);
        let dates_to = format_optional_date(&travel.dates_to);
        let destination = travel.destination.clone();
        let area = travel.area.clone();
        let fund_source = travel.fund_source.clone();
        let new_attachment = attachment.map(str::to_string);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let old_attachment: Option<String> = tx
                    .query_row(schema::SELECT_TRAVEL_ATTACHMENT, [id], |row| row.get(0))
                    .map_err(wrap_err)?;

                // A new attachment displaces the old path; otherwise keep it.
                let stored = new_attachment.clone().or_else(|| old_attachment.clone());
                let rows = tx
                    .execute(
                        schema::UPDATE_TRAVEL,
                        rusqlite::params![
                            id,
                            employee_id,
                            position_designation,
                            station,
                            purpose,
                            host,
                            dates_from,
                            dates_to,
                            destination,
                            area,
                            fund_source,
                            stored
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;

                // Report the displaced path only when a replacement happened.
                Ok(match (new_attachment, old_attachment) {
                    (Some(_), Some(old)) => Some(old),
                    _ => None,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", id.to_string()))
    }

    async fn delete_travel(&self, id: i64) -> Result<Option<String>> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let attachment: Option<String> = tx
                    .query_row(schema::SELECT_TRAVEL_ATTACHMENT, [id], |row| row.get(0))
                    .map_err(wrap_err)?;

                let rows = tx.execute(schema::DELETE_TRAVEL, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(attachment)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", id.to_string()))
    }

    async fn selective_delete_travels(&self, filter: &SelectiveDelete) -> Result<BatchDelete> {
        if filter.is_empty() {
            return Err(RepositoryError::Validation(
                "At least one filter is required".to_string(),
            ));
        }

        let (clause, params) = selective_where(filter, "dates_from", "dates_to");

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                // Collect owned attachments before deleting the rows
                let select =
                    format!("SELECT attachment FROM travels WHERE attachment IS NOT NULL{clause}");
                let mut attachments = Vec::new();
                {
                    let mut stmt = tx.prepare(&select).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map(params_from_iter(params.iter()), |row| {
                            row.get::<_, String>(0)
                        })
                        .map_err(wrap_err)?;
                    for row_result in rows {
                        attachments.push(row_result.map_err(wrap_err)?);
                    }
                }

                let delete = format!("DELETE FROM travels WHERE 1=1{clause}");
                let deleted = tx
                    .execute(&delete, params_from_iter(params.iter()))
                    .map_err(wrap_err)? as u64;
                if deleted == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;

                Ok(BatchDelete {
                    deleted,
                    attachments,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", "selection"))
    }

    async fn bulk_insert_travels(&self, rows: &[NewTravel], replace: bool) -> Result<BulkOutcome> {
        let valid: Vec<NewTravel> = rows.iter().filter(|r| r.is_valid_row()).cloned().collect();
        let skipped = rows.len() - valid.len();

        // A replace load that would leave the table empty is rejected before
        // any row is touched; the destructive delete must never commit
        // without surviving rows.
        if valid.is_empty() {
            if replace {
                return Err(RepositoryError::Validation(
                    "No valid data rows after parsing".to_string(),
                ));
            }
            return Ok(BulkOutcome {
                affected: 0,
                skipped,
            });
        }

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                if replace {
                    tx.execute(schema::DELETE_ALL_TRAVELS, []).map_err(wrap_err)?;
                }
                let mut affected = 0u64;
                for travel in &valid {
                    let params = insert_travel_params(travel, None);
                    affected += tx
                        .execute(schema::INSERT_TRAVEL, params_from_iter(params.iter()))
                        .map_err(wrap_err)? as u64;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(BulkOutcome { affected, skipped })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", "bulk"))
    }

    async fn sheet_upsert_travels(&self, rows: &[NewTravel]) -> Result<BulkOutcome> {
        // Sheet rows carry names instead of employee ids; only a blank name
        // disqualifies a row.
        let valid: Vec<NewTravel> = rows
            .iter()
            .filter(|r| !r.name.trim().is_empty())
            .cloned()
            .collect();
        let skipped = rows.len() - valid.len();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut affected = 0u64;
                for travel in &valid {
                    let params = insert_travel_params(travel, None);
                    affected += tx
                        .execute(schema::INSERT_TRAVEL, params_from_iter(params.iter()))
                        .map_err(wrap_err)? as u64;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(BulkOutcome { affected, skipped })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TravelAuthority", "upload"))
    }

    async fn travel_graph(
        &self,
        granularity: Granularity,
        filter: &TravelGraphFilter,
    ) -> Result<GraphResponse> {
        let mut sql = schema::SELECT_TRAVEL_GRAPH_DATES.trim().to_string();
        let mut params: Vec<Value> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            sql.push_str(" AND employee_id = ?");
            params.push(Value::Integer(employee_id));
        }
        if let Some(year) = filter.year {
            sql.push_str(" AND CAST(strftime('%Y', dates_from) AS INTEGER) = ?");
            params.push(Value::Integer(year.into()));
        }
        if let Some(month) = filter.month {
            sql.push_str(" AND CAST(strftime('%m', dates_from) AS INTEGER) = ?");
            params.push(Value::Integer(month.into()));
        }
        if let Some(position) = &filter.position_title {
            sql.push_str(" AND position_designation LIKE ?");
            params.push(Value::Text(format!("%{position}%")));
        }

        let dates = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), |row| {
                        row.get::<_, String>(0)
                    })
                    .map_err(wrap_err)?;

                let mut dates = Vec::new();
                for (index, row_result) in rows.enumerate() {
                    let raw = row_result.map_err(wrap_err)?;
                    if let Some(date) = parse_optional_date(Some(raw), index).map_err(wrap_err)? {
                        dates.push(date);
                    }
                }
                Ok(dates)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(GraphResponse::from_buckets(
            format!("Travel Entries by {granularity}"),
            bucket_counts(&dates, granularity),
        ))
    }
}

// ============================================================================
// AppointmentRepository implementation
// ============================================================================

#[async_trait]
impl AppointmentRepository for SqliteRepository {
    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_APPOINTMENTS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_appointment).map_err(wrap_err)?;

                let mut appointments = Vec::new();
                for row_result in rows {
                    appointments.push(row_result.map_err(wrap_err)?);
                }
                Ok(appointments)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<i64> {
        appointment.validate()?;

        let name = appointment.name.clone();
        let position_title = appointment.position_title.clone();
        let status = appointment.status.clone();
        let school_office = appointment.school_office.clone();
        let nature = appointment.nature.clone();
        let item_no = appointment.item_no.clone();
        let date_signed = format_optional_date(&appointment.date_signed);
        let attachment = attachment.map(str::to_string);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_APPOINTMENT,
                    rusqlite::params![
                        name,
                        position_title,
                        status,
                        school_office,
                        nature,
                        item_no,
                        date_signed,
                        attachment
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", "new"))
    }

    async fn update_appointment(
        &self,
        id: i64,
        appointment: &NewAppointment,
        attachment: Option<&str>,
    ) -> Result<Option<String>> {
        appointment.validate()?;

        let name = appointment.name.clone();
        let position_title = appointment.position_title.clone();
        let status = appointment.status.clone();
        let school_office = appointment.school_office.clone();
        let nature = appointment.nature.clone();
        let item_no = appointment.item_no.clone();
        let date_signed = format_optional_date(&appointment.date_signed);
        let new_attachment = attachment.map(str::to_string);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let old_attachment: Option<String> = tx
                    .query_row(schema::SELECT_APPOINTMENT_ATTACHMENT, [id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;

                let stored = new_attachment.clone().or_else(|| old_attachment.clone());
                let rows = tx
                    .execute(
                        schema::UPDATE_APPOINTMENT,
                        rusqlite::params![
                            id,
                            name,
                            position_title,
                            status,
                            school_office,
                            nature,
                            item_no,
                            date_signed,
                            stored
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;

                Ok(match (new_attachment, old_attachment) {
                    (Some(_), Some(old)) => Some(old),
                    _ => None,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", id.to_string()))
    }

    async fn delete_appointment(&self, id: i64) -> Result<Option<String>> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let attachment: Option<String> = tx
                    .query_row(schema::SELECT_APPOINTMENT_ATTACHMENT, [id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;

                let rows = tx
                    .execute(schema::DELETE_APPOINTMENT, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(attachment)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", id.to_string()))
    }

    async fn selective_delete_appointments(
        &self,
        filter: &SelectiveDelete,
    ) -> Result<BatchDelete> {
        if filter.is_empty() {
            return Err(RepositoryError::Validation(
                "At least one filter (ids, fromDate, or toDate) is required".to_string(),
            ));
        }

        let (clause, params) = selective_where(filter, "date_signed", "date_signed");

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let select = format!(
                    "SELECT attachment FROM appointments WHERE attachment IS NOT NULL{clause}"
                );
                let mut attachments = Vec::new();
                {
                    let mut stmt = tx.prepare(&select).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map(params_from_iter(params.iter()), |row| {
                            row.get::<_, String>(0)
                        })
                        .map_err(wrap_err)?;
                    for row_result in rows {
                        attachments.push(row_result.map_err(wrap_err)?);
                    }
                }

                let delete = format!("DELETE FROM appointments WHERE 1=1{clause}");
                let deleted = tx
                    .execute(&delete, params_from_iter(params.iter()))
                    .map_err(wrap_err)? as u64;
                if deleted == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;

                Ok(BatchDelete {
                    deleted,
                    attachments,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", "selection"))
    }

    async fn bulk_insert_appointments(&self, rows: &[NewAppointment]) -> Result<BulkOutcome> {
        let valid: Vec<NewAppointment> =
            rows.iter().filter(|r| r.is_valid_row()).cloned().collect();
        let skipped = rows.len() - valid.len();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut affected = 0u64;
                for appointment in &valid {
                    affected += tx
                        .execute(
                            schema::INSERT_APPOINTMENT,
                            rusqlite::params![
                                appointment.name,
                                appointment.position_title,
                                appointment.status,
                                appointment.school_office,
                                appointment.nature,
                                appointment.item_no,
                                format_optional_date(&appointment.date_signed),
                                Option::<String>::None
                            ],
                        )
                        .map_err(wrap_err)? as u64;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(BulkOutcome { affected, skipped })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", "bulk"))
    }

    async fn set_appointment_attachment(&self, id: i64, path: &str) -> Result<Option<String>> {
        let path = path.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let old_attachment: Option<String> = tx
                    .query_row(schema::SELECT_APPOINTMENT_ATTACHMENT, [id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;

                let rows = tx
                    .execute(
                        schema::SET_APPOINTMENT_ATTACHMENT,
                        rusqlite::params![id, path],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(old_attachment)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Appointment", id.to_string()))
    }

    async fn appointment_graph(
        &self,
        granularity: Granularity,
        filter: &AppointmentGraphFilter,
    ) -> Result<GraphResponse> {
        let mut sql = schema::SELECT_APPOINTMENT_GRAPH_DATES.trim().to_string();
        let mut params: Vec<Value> = Vec::new();

        if let Some(name) = &filter.name {
            sql.push_str(" AND name LIKE ?");
            params.push(Value::Text(format!("%{name}%")));
        }
        if let Some(status) = &filter.status {
            sql.push_str(" AND status = ?");
            params.push(Value::Text(status.clone()));
        }
        if let Some(year) = filter.year {
            sql.push_str(" AND CAST(strftime('%Y', date_signed) AS INTEGER) = ?");
            params.push(Value::Integer(year.into()));
        }
        if let Some(month) = filter.month {
            sql.push_str(" AND CAST(strftime('%m', date_signed) AS INTEGER) = ?");
            params.push(Value::Integer(month.into()));
        }

        let dates = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), |row| {
                        row.get::<_, String>(0)
                    })
                    .map_err(wrap_err)?;

                let mut dates = Vec::new();
                for (index, row_result) in rows.enumerate() {
                    let raw = row_result.map_err(wrap_err)?;
                    if let Some(date) = parse_optional_date(Some(raw), index).map_err(wrap_err)? {
                        dates.push(date);
                    }
                }
                Ok(dates)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(GraphResponse::from_buckets(
            format!("Appointments by {granularity}"),
            bucket_counts(&dates, granularity),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn new_employee(initial: &str) -> NewEmployee {
        NewEmployee {
            office: "Division Office".to_string(),
            full_name: format!("Employee {initial}"),
            position_title: "Teacher I".to_string(),
            initial: initial.to_string(),
            fund_source: "MOOE".to_string(),
        }
    }

    fn new_travel(employee_id: i64, dates_from: NaiveDate) -> NewTravel {
        NewTravel {
            employee_id: Some(employee_id),
            initial: String::new(),
            name: String::new(),
            position_designation: "Teacher I".to_string(),
            station: "Central Office".to_string(),
            purpose: "Training".to_string(),
            host: "Region IV".to_string(),
            dates_from: Some(dates_from),
            dates_to: Some(dates_from + chrono::Duration::days(1)),
            destination: "Quezon City".to_string(),
            area: "NCR".to_string(),
            fund_source: "MOOE".to_string(),
        }
    }

    fn new_appointment(name: &str, date_signed: NaiveDate) -> NewAppointment {
        NewAppointment {
            name: name.to_string(),
            position_title: "Teacher I".to_string(),
            status: "Scheduled".to_string(),
            school_office: "Central ES".to_string(),
            nature: String::new(),
            item_no: String::new(),
            date_signed: Some(date_signed),
        }
    }

    async fn repo() -> SqliteRepository {
        SqliteRepository::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_employee_create_and_list() {
        let repo = repo().await;

        let outcome = repo.create_employee(&new_employee("AB")).await.unwrap();
        assert!(outcome.inserted);
        assert!(outcome.id.is_some());

        let employees = repo.list_employees().await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].initial, "AB");
    }

    #[tokio::test]
    async fn test_employee_upsert_is_idempotent() {
        let repo = repo().await;

        let first = repo.create_employee(&new_employee("AB")).await.unwrap();
        let second = repo.create_employee(&new_employee("AB")).await.unwrap();

        assert!(first.inserted);
        // Second call with the same natural key stores no new row
        assert!(!second.inserted);
        assert_eq!(second.id, None);
        assert_eq!(repo.list_employees().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_employee_create_rejects_missing_fields() {
        let repo = repo().await;
        let mut employee = new_employee("AB");
        employee.office = String::new();

        let err = repo.create_employee(&employee).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_employee_delete_not_found() {
        let repo = repo().await;
        let err = repo.delete_employee(99).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_employee_bulk_upsert_skips_invalid_and_duplicates() {
        let repo = repo().await;
        repo.create_employee(&new_employee("AB")).await.unwrap();

        let mut blank = new_employee("CD");
        blank.full_name = String::new();

        let outcome = repo
            .bulk_upsert_employees(&[new_employee("AB"), new_employee("EF"), blank])
            .await
            .unwrap();

        // AB is a duplicate (ignored), EF inserts, the blank row is skipped
        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(repo.list_employees().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_travel_create_update_delete_attachment_flow() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        let employee_id = employee.id.unwrap();

        let id = repo
            .create_travel(&new_travel(employee_id, d(2024, 3, 1)), Some("/uploads/a.pdf"))
            .await
            .unwrap();

        // Update with a new attachment reports the displaced path
        let replaced = repo
            .update_travel(id, &new_travel(employee_id, d(2024, 3, 5)), Some("/uploads/b.pdf"))
            .await
            .unwrap();
        assert_eq!(replaced, Some("/uploads/a.pdf".to_string()));

        // Update without an attachment keeps the stored path
        let replaced = repo
            .update_travel(id, &new_travel(employee_id, d(2024, 3, 6)), None)
            .await
            .unwrap();
        assert_eq!(replaced, None);
        let travels = repo.list_travels().await.unwrap();
        assert_eq!(travels[0].attachment, Some("/uploads/b.pdf".to_string()));

        // Delete returns the owned attachment for file-store cleanup
        let prior = repo.delete_travel(id).await.unwrap();
        assert_eq!(prior, Some("/uploads/b.pdf".to_string()));
        assert!(repo.list_travels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_travel_update_not_found() {
        let repo = repo().await;
        let err = repo
            .update_travel(7, &new_travel(1, d(2024, 1, 1)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_travel_list_resolves_employee_name() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        repo.create_travel(&new_travel(employee.id.unwrap(), d(2024, 3, 1)), None)
            .await
            .unwrap();

        let travels = repo.list_travels().await.unwrap();
        assert_eq!(travels[0].name, "Employee AB");
        assert_eq!(travels[0].initial, "AB");
    }

    #[tokio::test]
    async fn test_travel_filter_by_initial_and_range() {
        let repo = repo().await;
        let sheet = NewTravel {
            employee_id: None,
            initial: "AB".to_string(),
            name: "Alice Brown".to_string(),
            ..new_travel(0, d(2024, 3, 1))
        };
        let other = NewTravel {
            employee_id: None,
            initial: "CD".to_string(),
            name: "Carol Diaz".to_string(),
            ..new_travel(0, d(2024, 6, 1))
        };
        repo.sheet_upsert_travels(&[sheet, other]).await.unwrap();

        let by_initial = repo
            .filter_travels(&TravelListFilter {
                initial: Some("AB".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_initial.len(), 1);
        assert_eq!(by_initial[0].name, "Alice Brown");

        let by_range = repo
            .filter_travels(&TravelListFilter {
                from_date: Some(d(2024, 5, 1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_range.len(), 1);
        assert_eq!(by_range[0].name, "Carol Diaz");
    }

    #[tokio::test]
    async fn test_travel_selective_delete_zero_match_is_not_found() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        repo.create_travel(&new_travel(employee.id.unwrap(), d(2024, 3, 1)), None)
            .await
            .unwrap();

        let err = repo
            .selective_delete_travels(&SelectiveDelete {
                ids: Some(vec![999]),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        // The store is untouched
        assert_eq!(repo.list_travels().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_travel_selective_delete_collects_attachments() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        let employee_id = employee.id.unwrap();
        let first = repo
            .create_travel(&new_travel(employee_id, d(2024, 3, 1)), Some("/uploads/a.pdf"))
            .await
            .unwrap();
        let second = repo
            .create_travel(&new_travel(employee_id, d(2024, 4, 1)), None)
            .await
            .unwrap();

        let outcome = repo
            .selective_delete_travels(&SelectiveDelete {
                ids: Some(vec![first, second]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.attachments, vec!["/uploads/a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_travel_selective_delete_by_date_range() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        let employee_id = employee.id.unwrap();
        repo.create_travel(&new_travel(employee_id, d(2024, 3, 1)), None)
            .await
            .unwrap();
        repo.create_travel(&new_travel(employee_id, d(2024, 8, 1)), None)
            .await
            .unwrap();

        let outcome = repo
            .selective_delete_travels(&SelectiveDelete {
                from_date: Some(d(2024, 7, 1)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome.deleted, 1);
        assert_eq!(repo.list_travels().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_replace_all_invalid_rolls_back() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        repo.create_travel(&new_travel(employee.id.unwrap(), d(2024, 3, 1)), None)
            .await
            .unwrap();

        let mut invalid = new_travel(1, d(2024, 5, 1));
        invalid.purpose = String::new();

        let err = repo
            .bulk_insert_travels(&[invalid], true)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));

        // Pre-existing rows survive the failed replace
        assert_eq!(repo.list_travels().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_replace_swaps_table_contents() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        let employee_id = employee.id.unwrap();
        repo.create_travel(&new_travel(employee_id, d(2023, 1, 1)), None)
            .await
            .unwrap();

        let outcome = repo
            .bulk_insert_travels(
                &[
                    new_travel(employee_id, d(2024, 2, 1)),
                    new_travel(employee_id, d(2024, 3, 1)),
                ],
                true,
            )
            .await
            .unwrap();

        assert_eq!(outcome.affected, 2);
        let travels = repo.list_travels().await.unwrap();
        assert_eq!(travels.len(), 2);
        assert!(travels.iter().all(|t| t.dates_from.unwrap().year() > 2023));
    }

    #[tokio::test]
    async fn test_bulk_append_skips_invalid_rows() {
        let repo = repo().await;
        let employee = repo.create_employee(&new_employee("AB")).await.unwrap();
        let employee_id = employee.id.unwrap();

        let mut invalid = new_travel(employee_id, d(2024, 5, 1));
        invalid.host = String::new();

        let outcome = repo
            .bulk_insert_travels(&[new_travel(employee_id, d(2024, 4, 1)), invalid], false)
            .await
            .unwrap();

        assert_eq!(outcome.affected, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(repo.list_travels().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_travel_graph_groups_and_filters() {
        let repo = repo().await;
        let first = repo.create_employee(&new_employee("AB")).await.unwrap();
        let second = repo.create_employee(&new_employee("CD")).await.unwrap();
        let first_id = first.id.unwrap();
        let second_id = second.id.unwrap();

        repo.create_travel(&new_travel(first_id, d(2023, 3, 1)), None)
            .await
            .unwrap();
        repo.create_travel(&new_travel(first_id, d(2022, 12, 1)), None)
            .await
            .unwrap();
        repo.create_travel(&new_travel(second_id, d(2023, 1, 15)), None)
            .await
            .unwrap();

        let all = repo
            .travel_graph(Granularity::Month, &TravelGraphFilter::default())
            .await
            .unwrap();
        assert_eq!(all.labels, vec!["2022-12", "2023-01", "2023-03"]);
        assert_eq!(all.datasets[0].data, vec![1, 1, 1]);
        assert_eq!(all.datasets[0].label, "Travel Entries by month");

        let filtered = repo
            .travel_graph(
                Granularity::Month,
                &TravelGraphFilter {
                    employee_id: Some(first_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.labels, vec!["2022-12", "2023-03"]);
    }

    #[tokio::test]
    async fn test_travel_graph_empty_is_empty_response() {
        let repo = repo().await;

        let response = repo
            .travel_graph(Granularity::Year, &TravelGraphFilter::default())
            .await
            .unwrap();

        assert!(response.labels.is_empty());
        assert!(response.datasets[0].data.is_empty());
    }

    #[tokio::test]
    async fn test_appointment_crud_and_graph() {
        let repo = repo().await;

        let id = repo
            .create_appointment(&new_appointment("Alice Brown", d(2024, 1, 10)), None)
            .await
            .unwrap();
        repo.create_appointment(&new_appointment("Carol Diaz", d(2024, 1, 20)), None)
            .await
            .unwrap();
        repo.create_appointment(&new_appointment("Eve Fox", d(2024, 2, 5)), None)
            .await
            .unwrap();

        let graph = repo
            .appointment_graph(Granularity::Month, &AppointmentGraphFilter::default())
            .await
            .unwrap();
        assert_eq!(graph.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(graph.datasets[0].data, vec![2, 1]);
        assert_eq!(graph.datasets[0].label, "Appointments by month");

        let filtered = repo
            .appointment_graph(
                Granularity::Month,
                &AppointmentGraphFilter {
                    name: Some("Alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.datasets[0].data, vec![1]);

        repo.delete_appointment(id).await.unwrap();
        assert_eq!(repo.list_appointments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_appointment_set_attachment_returns_old_path() {
        let repo = repo().await;
        let id = repo
            .create_appointment(
                &new_appointment("Alice Brown", d(2024, 1, 10)),
                Some("/uploads/old.pdf"),
            )
            .await
            .unwrap();

        let old = repo
            .set_appointment_attachment(id, "/uploads/new.pdf")
            .await
            .unwrap();
        assert_eq!(old, Some("/uploads/old.pdf".to_string()));

        let appointments = repo.list_appointments().await.unwrap();
        assert_eq!(
            appointments[0].attachment,
            Some("/uploads/new.pdf".to_string())
        );
    }

    #[tokio::test]
    async fn test_appointment_set_attachment_not_found() {
        let repo = repo().await;
        let err = repo
            .set_appointment_attachment(404, "/uploads/x.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_selective_delete_requires_a_filter() {
        let repo = repo().await;
        let err = repo
            .selective_delete_appointments(&SelectiveDelete::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }
}
