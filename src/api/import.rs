//! Bulk content-import endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{lookup_job, warn_if_import_running, JobQuery};
use crate::errors::AppError;
use crate::import::{run_bulk_import, ImportContext};
use crate::models::{BulkImportOptions, ImportJob};
use crate::AppState;

/// Request body for triggering a bulk import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBulkImportRequest {
    /// Import flavor; only "bulk_import" is recognized.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Must be true: a bulk import deletes every topic and exercise first.
    #[serde(default)]
    pub confirm_reset: bool,
    #[serde(default)]
    pub options: BulkImportOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBulkImportResponse {
    pub success: bool,
    pub job_id: String,
    pub message: String,
}

/// POST /api/admin/content/import - Wipe all topics and exercises, then reimport
/// every curriculum tab from the configured spreadsheet.
pub async fn trigger_bulk_import(
    State(state): State<AppState>,
    Json(request): Json<TriggerBulkImportRequest>,
) -> Result<Json<TriggerBulkImportResponse>, AppError> {
    if let Some(kind) = request.kind.as_deref() {
        if kind != "bulk_import" {
            return Err(AppError::Validation(format!(
                "Unsupported import type '{}'",
                kind
            )));
        }
    }
    if !request.confirm_reset {
        return Err(AppError::Validation(
            "Bulk import deletes all existing topics and exercises; set confirmReset to true to proceed"
                .to_string(),
        ));
    }

    warn_if_import_running(&state).await;

    let job = ImportJob::new(Uuid::new_v4().to_string());
    let job_id = job.job_id.clone();
    state.jobs.put(job.clone()).await;

    let ctx = ImportContext {
        store: state.repo.clone(),
        rows: state.rows.clone(),
        jobs: state.jobs.clone(),
    };
    tokio::spawn(run_bulk_import(ctx, job, request.options));

    Ok(Json(TriggerBulkImportResponse {
        success: true,
        job_id,
        message: "Bulk import started; all topics and exercises are being replaced".to_string(),
    }))
}

/// GET /api/admin/content/import?jobId=<id> - Poll a bulk import job.
pub async fn get_bulk_import_status(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<ImportJob>, AppError> {
    let job = lookup_job(&state, &query).await?;
    Ok(Json(job))
}
