//! Appointment handlers.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};

use registra_core::records::Appointment;
use registra_core::report::GraphResponse;
use registra_core::storage::RepositoryError;

use crate::{
    files::validate_attachment,
    handlers::{parse_record_request, AppError},
    models::{
        AppointmentGraphQuery, BulkAppointmentsRequest, CreateAppointment,
        SelectiveDeleteRequest,
    },
    state::AppState,
};

/// List all appointments (GET /appointments).
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.appointments.list_appointments().await?;
    Ok(Json(appointments))
}

/// Create an appointment (POST /appointments).
pub async fn create_appointment(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let parsed = parse_record_request(request).await?;
    let payload: CreateAppointment = parsed.payload()?;
    let appointment = payload.into_new_appointment();
    appointment.validate()?;

    let attachment_path = match &parsed.file {
        Some(file) => {
            validate_attachment(
                file.content_type.as_deref(),
                file.bytes.len(),
                state.max_attachment_bytes,
            )?;
            Some(state.files.save(&file.name, &file.bytes).await?)
        }
        None => None,
    };

    match state
        .appointments
        .create_appointment(&appointment, attachment_path.as_deref())
        .await
    {
        Ok(id) => {
            tracing::info!(appointment_id = id, "Appointment created");
            Ok((
                StatusCode::CREATED,
                Json(serde_json::json!({ "id": id, "pdfPath": attachment_path })),
            ))
        }
        Err(err) => {
            if let Some(path) = &attachment_path {
                if let Err(cleanup) = state.files.delete(path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned attachment");
                }
            }
            Err(err.into())
        }
    }
}

/// Update an appointment (PUT /appointments/{id}).
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<serde_json::Value>, AppError> {
    let parsed = parse_record_request(request).await?;
    let payload: CreateAppointment = parsed.payload()?;
    let appointment = payload.into_new_appointment();
    appointment.validate()?;

    let attachment_path = match &parsed.file {
        Some(file) => {
            validate_attachment(
                file.content_type.as_deref(),
                file.bytes.len(),
                state.max_attachment_bytes,
            )?;
            Some(state.files.save(&file.name, &file.bytes).await?)
        }
        None => None,
    };

    match state
        .appointments
        .update_appointment(id, &appointment, attachment_path.as_deref())
        .await
    {
        Ok(_replaced) => {
            tracing::info!(appointment_id = id, "Appointment updated");
            Ok(Json(serde_json::json!({
                "message": "Appointment updated",
                "pdfPath": attachment_path,
            })))
        }
        Err(err) => {
            if let Some(path) = &attachment_path {
                if let Err(cleanup) = state.files.delete(path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned attachment");
                }
            }
            Err(err.into())
        }
    }
}

/// Delete one appointment (DELETE /appointments/{id}).
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.appointments.delete_appointment(id).await?;

    tracing::info!(appointment_id = id, "Appointment deleted");
    Ok(Json(serde_json::json!({ "message": "Appointment deleted" })))
}

/// Selective delete by ids and/or date range (POST /appointments/delete).
pub async fn selective_delete_appointments(
    State(state): State<AppState>,
    Json(request): Json<SelectiveDeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filter = request.into_filter()?;
    let outcome = state
        .appointments
        .selective_delete_appointments(&filter)
        .await?;

    tracing::info!(deleted = outcome.deleted, "Appointments deleted");
    Ok(Json(serde_json::json!({
        "message": format!("{} appointments deleted", outcome.deleted),
    })))
}

/// Bulk JSON load, append-only (POST /appointments/bulk).
pub async fn bulk_appointments(
    State(state): State<AppState>,
    Json(request): Json<BulkAppointmentsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if request.appointments.is_empty() {
        return Err(RepositoryError::Validation("No data provided".to_string()).into());
    }

    let rows: Vec<_> = request
        .appointments
        .into_iter()
        .map(|entry| entry.into_new_appointment())
        .collect();

    let outcome = state.appointments.bulk_insert_appointments(&rows).await?;

    tracing::info!(
        affected = outcome.affected,
        skipped = outcome.skipped,
        "Appointment bulk load handled"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("{} appointments inserted successfully", outcome.affected),
            "skipped": outcome.skipped,
        })),
    ))
}

/// Attachment-only update (POST /appointments/{id}/attachment).
pub async fn upload_appointment_attachment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<serde_json::Value>, AppError> {
    let parsed = parse_record_request(request).await?;
    let file = parsed
        .file
        .ok_or_else(|| RepositoryError::Validation("No file uploaded".to_string()))?;

    validate_attachment(
        file.content_type.as_deref(),
        file.bytes.len(),
        state.max_attachment_bytes,
    )?;
    let path = state.files.save(&file.name, &file.bytes).await?;

    match state.appointments.set_appointment_attachment(id, &path).await {
        Ok(_replaced) => {
            tracing::info!(appointment_id = id, "Appointment attachment uploaded");
            Ok(Json(serde_json::json!({
                "message": "File uploaded successfully",
                "path": path,
            })))
        }
        Err(err) => {
            if let Err(cleanup) = state.files.delete(&path).await {
                tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned attachment");
            }
            Err(err.into())
        }
    }
}

/// Aggregate report (GET /appointments/graph).
pub async fn appointment_graph(
    State(state): State<AppState>,
    Query(query): Query<AppointmentGraphQuery>,
) -> Result<Json<GraphResponse>, AppError> {
    let granularity = query.granularity;
    let response = state
        .appointments
        .appointment_graph(granularity, &query.into_filter())
        .await?;
    Ok(Json(response))
}
