//! Import job progress records.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an import job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// Progress snapshot of one import run.
///
/// Owned and mutated by the task running the import; pollers receive copies
/// through the job store. Counters hold `processed == successful + failed`
/// because they only move through [`ImportJob::record_success`] and
/// [`ImportJob::record_failure`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub job_id: String,
    pub status: JobStatus,
    pub total_items: u64,
    pub processed_items: u64,
    pub successful_items: u64,
    pub failed_items: u64,
    pub errors: Vec<String>,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl ImportJob {
    pub fn new(job_id: String) -> Self {
        Self {
            job_id,
            status: JobStatus::Pending,
            total_items: 0,
            processed_items: 0,
            successful_items: 0,
            failed_items: 0,
            errors: Vec::new(),
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
    }

    pub fn set_total(&mut self, total: u64) {
        self.total_items = total;
    }

    pub fn record_success(&mut self) {
        self.processed_items += 1;
        self.successful_items += 1;
    }

    pub fn record_failure(&mut self, error: String) {
        self.processed_items += 1;
        self.failed_items += 1;
        self.errors.push(error);
    }

    /// Records a failure that is not tied to a single row, e.g. an
    /// unreadable tab. Counters stay untouched.
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }

    pub fn fail(&mut self, error: String) {
        self.status = JobStatus::Failed;
        self.errors.push(error);
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Options accepted by the bulk import trigger.
///
/// The media flags steer a separate media pipeline and are recorded for it;
/// the topic import itself does not branch on them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkImportOptions {
    pub download_media: bool,
    pub extract_audio: bool,
    pub generate_thumbnails: bool,
    pub quality: Option<String>,
    pub skip_existing: bool,
}

/// Settings of a resume run, defaulted when the caller omits them and
/// echoed back in the trigger response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSettings {
    pub batch_size: usize,
    /// Sleep between batches, in milliseconds.
    pub delay_between_batches: u64,
    pub max_retries: u32,
    pub skip_existing: bool,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            delay_between_batches: 3000,
            max_retries: 3,
            skip_existing: true,
        }
    }
}
