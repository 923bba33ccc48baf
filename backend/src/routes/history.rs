//! Workout history API routes

use crate::error::ApiError;
use crate::identity::Owner;
use crate::services::HistoryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use fouxd_training_shared::models::WorkoutHistoryRecord;
use fouxd_training_shared::types::{
    DeleteBeforeQuery, DeleteHistoryRequest, DeletedResponse, ExportQuery, HistoryQuery,
    HistoryRangeQuery, HistoryStatisticsResponse, HistoryStatsQuery, ImportHistoryRequest,
    ImportResponse,
};
use uuid::Uuid;

/// Create history routes
pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_history).delete(delete_history_batch))
        .route("/range", get(history_range))
        .route("/stats", get(history_stats))
        .route("/latest", get(latest_record))
        .route("/before", delete(delete_before))
        .route("/all", delete(clear_history))
        .route("/export", get(export_history))
        .route("/import", post(import_history))
        .route("/:id", delete(delete_record))
}

/// GET /api/v1/history - Records newest first, `?completed=` to filter
async fn list_history(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WorkoutHistoryRecord>>, ApiError> {
    let records = HistoryService::list(state.storage(), owner.id(), query.completed).await?;
    Ok(Json(records))
}

/// GET /api/v1/history/range?start=&end=
async fn history_range(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<HistoryRangeQuery>,
) -> Result<Json<Vec<WorkoutHistoryRecord>>, ApiError> {
    let records =
        HistoryService::range(state.storage(), owner.id(), query.start, query.end).await?;
    Ok(Json(records))
}

/// GET /api/v1/history/stats
async fn history_stats(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<HistoryStatsQuery>,
) -> Result<Json<HistoryStatisticsResponse>, ApiError> {
    let stats = HistoryService::statistics(
        state.storage(),
        owner.id(),
        query.start,
        query.end,
        Utc::now(),
    )
    .await?;
    Ok(Json(stats))
}

/// GET /api/v1/history/latest
async fn latest_record(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<WorkoutHistoryRecord>, ApiError> {
    Ok(Json(HistoryService::latest(state.storage(), owner.id()).await?))
}

/// DELETE /api/v1/history/:id
async fn delete_record(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    HistoryService::delete(state.storage(), owner.id(), id).await?;
    Ok(Json(DeletedResponse { deleted: 1 }))
}

/// DELETE /api/v1/history - Delete the listed records, all or nothing
async fn delete_history_batch(
    State(state): State<AppState>,
    owner: Owner,
    Json(req): Json<DeleteHistoryRequest>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = HistoryService::delete_batch(state.storage(), owner.id(), &req.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// DELETE /api/v1/history/before?before=
async fn delete_before(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<DeleteBeforeQuery>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = HistoryService::delete_before(state.storage(), owner.id(), query.before).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// DELETE /api/v1/history/all
async fn clear_history(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = HistoryService::clear(state.storage(), owner.id()).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/v1/history/export?format=json|csv - Download the history
async fn export_history(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let export = HistoryService::export(state.storage(), owner.id(), query.format).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(export.content_type),
    );
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid header: {}", e)))?,
    );

    Ok((headers, export.body))
}

/// POST /api/v1/history/import - Restore records under the caller's owner id
async fn import_history(
    State(state): State<AppState>,
    owner: Owner,
    Json(req): Json<ImportHistoryRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let (imported, total) =
        HistoryService::import(state.storage(), owner.id(), req.records, req.merge).await?;
    Ok(Json(ImportResponse { imported, total }))
}
