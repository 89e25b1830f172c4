//! Resumable content-import endpoints.
//!
//! The resume flavor never deletes anything: it diffs the spreadsheet against
//! the topics table and imports only the rows that are missing, in rate-limited
//! batches with per-row retries.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{lookup_job, warn_if_import_running, JobQuery};
use crate::errors::AppError;
use crate::import::{run_resume_import, ImportContext};
use crate::models::{ImportJob, ResumeSettings};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResumeImportResponse {
    pub success: bool,
    pub job_id: String,
    pub message: String,
    /// Effective settings after defaults were applied, echoed for the caller.
    pub settings: ResumeSettings,
}

/// POST /api/admin/content/resume-import - Import only the spreadsheet rows
/// that are missing from the database.
pub async fn trigger_resume_import(
    State(state): State<AppState>,
    Json(settings): Json<ResumeSettings>,
) -> Result<Json<TriggerResumeImportResponse>, AppError> {
    if settings.batch_size == 0 {
        return Err(AppError::Validation(
            "batchSize must be at least 1".to_string(),
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
    tokio::spawn(run_resume_import(ctx, job, settings));

    Ok(Json(TriggerResumeImportResponse {
        success: true,
        job_id,
        message: "Resume import started; only missing topics will be created".to_string(),
        settings,
    }))
}

/// GET /api/admin/content/resume-import?jobId=<id> - Poll a resume import job.
pub async fn get_resume_import_status(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<ImportJob>, AppError> {
    let job = lookup_job(&state, &query).await?;
    Ok(Json(job))
}
