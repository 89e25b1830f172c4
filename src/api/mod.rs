//! REST API module.
//!
//! Contains the admin content-import routes following the frontend contract.

mod import;
mod resume;

pub use import::*;
pub use resume::*;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ImportJob, JobStatus};
use crate::AppState;

/// Query parameters of the job polling endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub job_id: Option<String>,
}

/// Shared lookup for both polling endpoints; unknown ids are 404s.
async fn lookup_job(state: &AppState, query: &JobQuery) -> Result<ImportJob, AppError> {
    let job_id = query
        .job_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Query parameter jobId is required".to_string()))?;

    state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
}

/// Imports do not exclude each other; surface overlap in the logs at least.
async fn warn_if_import_running(state: &AppState) {
    let running = state
        .jobs
        .list()
        .await
        .into_iter()
        .filter(|job| job.status == JobStatus::Running)
        .count();
    if running > 0 {
        tracing::warn!(
            "{} import job(s) already running; results of concurrent imports are undefined",
            running
        );
    }
}
