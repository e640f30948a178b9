//! Employee CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use registra_core::records::Employee;

use crate::{
    handlers::AppError,
    models::{CreateEmployee, EmployeeSheetRow, UploadRequest},
    state::AppState,
};

/// List all employees (GET /employees).
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employees.list_employees().await?;
    Ok(Json(employees))
}

/// Create an employee (POST /employees).
///
/// Idempotent on the initials: a duplicate reports `inserted: false` and a
/// null id instead of failing.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployee>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = state
        .employees
        .create_employee(&payload.into_new_employee())
        .await?;

    tracing::info!(inserted = outcome.inserted, "Employee create handled");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": outcome.id, "inserted": outcome.inserted })),
    ))
}

/// Delete an employee by id (DELETE /employees/{id}).
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.employees.delete_employee(id).await?;

    tracing::info!(employee_id = id, "Employee deleted");
    Ok(Json(serde_json::json!({ "message": "Employee deleted" })))
}

/// Ingest a parsed employee spreadsheet (POST /employees/upload).
pub async fn upload_employees(
    State(state): State<AppState>,
    Json(upload): Json<UploadRequest<EmployeeSheetRow>>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let rows: Vec<_> = upload
        .file_content
        .into_iter()
        .map(EmployeeSheetRow::into_new_employee)
        .collect();

    let outcome = state.employees.bulk_upsert_employees(&rows).await?;

    tracing::info!(
        affected = outcome.affected,
        skipped = outcome.skipped,
        "Employee sheet uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("{} employees inserted/updated", outcome.affected),
        })),
    ))
}
