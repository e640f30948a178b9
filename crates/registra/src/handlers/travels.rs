//! Travel-authority handlers.
//!
//! Create and update accept multipart bodies when an attachment rides
//! along and plain JSON otherwise. Attachment constraints are checked
//! before anything touches the file store, and a file that was already
//! saved when the row write fails is removed again.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};

use registra_core::records::{expand_travel_sheet_row, TravelAuthority};
use registra_core::report::GraphResponse;
use registra_core::storage::RepositoryError;

use crate::{
    files::validate_attachment,
    handlers::{parse_record_request, AppError},
    models::{
        BulkTravelRequest, CreateTravel, SelectiveDeleteRequest, TravelFilterQuery,
        TravelGraphQuery, TravelSheetRowDto, UploadRequest,
    },
    state::AppState,
};

/// List all travel authorities (GET /travels).
pub async fn list_travels(
    State(state): State<AppState>,
) -> Result<Json<Vec<TravelAuthority>>, AppError> {
    let travels = state.travels.list_travels().await?;
    Ok(Json(travels))
}

/// Ad-hoc filtered listing (GET /travels/filter).
pub async fn filter_travels(
    State(state): State<AppState>,
    Query(query): Query<TravelFilterQuery>,
) -> Result<Json<Vec<TravelAuthority>>, AppError> {
    let travels = state.travels.filter_travels(&query.into_filter()).await?;
    Ok(Json(travels))
}

/// Create a travel authority (POST /travels).
pub async fn create_travel(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let parsed = parse_record_request(request).await?;
    let payload: CreateTravel = parsed.payload()?;
    let travel = payload.into_new_travel();
    // Reject bad field sets before the attachment hits the file store
    travel.validate()?;

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
        .travels
        .create_travel(&travel, attachment_path.as_deref())
        .await
    {
        Ok(id) => {
            tracing::info!(travel_id = id, "Travel authority created");
            Ok((
                StatusCode::CREATED,
                Json(serde_json::json!({ "id": id, "attachmentPath": attachment_path })),
            ))
        }
        Err(err) => {
            // The row never committed; don't leave the file orphaned
            if let Some(path) = &attachment_path {
                if let Err(cleanup) = state.files.delete(path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned attachment");
                }
            }
            Err(err.into())
        }
    }
}

/// Update a travel authority (PUT /travels/{id}).
pub async fn update_travel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<serde_json::Value>, AppError> {
    let parsed = parse_record_request(request).await?;
    let payload: CreateTravel = parsed.payload()?;
    let travel = payload.into_new_travel();
    travel.validate()?;

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
        .travels
        .update_travel(id, &travel, attachment_path.as_deref())
        .await
    {
        Ok(_replaced) => {
            tracing::info!(travel_id = id, "Travel authority updated");
            Ok(Json(serde_json::json!({
                "message": "Travel entry updated",
                "attachmentPath": attachment_path,
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

/// Delete one travel authority (DELETE /travels/{id}).
pub async fn delete_travel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.travels.delete_travel(id).await?;

    tracing::info!(travel_id = id, "Travel authority deleted");
    Ok(Json(serde_json::json!({ "message": "Travel entry deleted" })))
}

/// Selective delete by ids and/or date range (POST /travels/delete).
pub async fn selective_delete_travels(
    State(state): State<AppState>,
    Json(request): Json<SelectiveDeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filter = request.into_filter()?;
    let outcome = state.travels.selective_delete_travels(&filter).await?;

    tracing::info!(deleted = outcome.deleted, "Travel authorities deleted");
    Ok(Json(serde_json::json!({
        "message": format!("{} travel entries deleted", outcome.deleted),
    })))
}

/// Bulk JSON load (POST /travels/bulk).
///
/// Destructive full-replace only happens when the body carries
/// `"replace": true`.
pub async fn bulk_travels(
    State(state): State<AppState>,
    Json(request): Json<BulkTravelRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let (entries, replace) = request.into_parts();
    if entries.is_empty() {
        return Err(RepositoryError::Validation("No data provided".to_string()).into());
    }

    let rows: Vec<_> = entries
        .into_iter()
        .map(|entry| entry.into_new_travel())
        .collect();

    let outcome = state.travels.bulk_insert_travels(&rows, replace).await?;

    tracing::info!(
        affected = outcome.affected,
        skipped = outcome.skipped,
        replace,
        "Travel bulk load handled"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("{} travel entries inserted", outcome.affected),
            "skipped": outcome.skipped,
        })),
    ))
}

/// Ingest a parsed travel spreadsheet (POST /travels/upload).
pub async fn upload_travels(
    State(state): State<AppState>,
    Json(upload): Json<UploadRequest<TravelSheetRowDto>>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let rows: Vec<_> = upload
        .file_content
        .into_iter()
        .map(TravelSheetRowDto::into_sheet_row)
        .flat_map(|row| expand_travel_sheet_row(&row))
        .collect();

    let outcome = state.travels.sheet_upsert_travels(&rows).await?;

    tracing::info!(affected = outcome.affected, "Travel sheet uploaded");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("{} travel entries inserted/updated", outcome.affected),
        })),
    ))
}

/// Aggregate report (GET /travels/graph).
pub async fn travel_graph(
    State(state): State<AppState>,
    Query(query): Query<TravelGraphQuery>,
) -> Result<Json<GraphResponse>, AppError> {
    let granularity = query.granularity;
    let response = state
        .travels
        .travel_graph(granularity, &query.into_filter())
        .await?;
    Ok(Json(response))
}
