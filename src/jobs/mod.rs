//! In-process registry of import jobs.
//!
//! Import runs publish progress snapshots here; the polling endpoints read
//! them back. The registry is process-local, so job history resets on
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::ImportJob;

/// Registry the orchestrators publish to and the poll handlers read from.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or overwrite the snapshot for a job id.
    async fn put(&self, job: ImportJob);

    /// Snapshot of one job, if known.
    async fn get(&self, job_id: &str) -> Option<ImportJob>;

    /// Snapshots of every known job.
    async fn list(&self) -> Vec<ImportJob>;
}

/// Default registry held in process memory.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, ImportJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, job: ImportJob) {
        self.jobs.write().await.insert(job.job_id.clone(), job);
    }

    async fn get(&self, job_id: &str) -> Option<ImportJob> {
        self.jobs.read().await.get(job_id).cloned()
    }

    async fn list(&self) -> Vec<ImportJob> {
        self.jobs.read().await.values().cloned().collect()
    }
}
