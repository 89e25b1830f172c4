//! Curriculum import pipeline.
//!
//! Two orchestrators share the same collaborators: the bulk variant wipes
//! the store and reimports every tab, the resume variant fills in whatever
//! the store is still missing, in rate-limited batches with per-row retry.
//! Collaborators are injected through [`ImportContext`] so tests can swap
//! fakes in for the spreadsheet and the store.

mod bulk;
mod mapper;
mod resume;
mod retry;

pub use bulk::*;
pub use mapper::*;
pub use resume::*;
pub use retry::*;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::jobs::JobStore;
use crate::models::{Level, NewTopic, Topic};
use crate::sheets::SheetRowSource;

/// Store gateway the import pipeline writes through.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Insert one topic; duplicates fail with [`AppError::Constraint`].
    async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, AppError>;

    /// Remove every topic. Bulk-reset only.
    async fn delete_all_topics(&self) -> Result<u64, AppError>;

    /// Remove every exercise. Bulk-reset only, must precede the topic wipe.
    async fn delete_all_exercises(&self) -> Result<u64, AppError>;

    /// Number of stored topics.
    async fn count_topics(&self) -> Result<i64, AppError>;

    /// `(name, level)` pairs already stored, for the resume diff.
    async fn existing_topic_keys(&self) -> Result<HashSet<(String, Level)>, AppError>;

    /// Whether one `(name, level)` pair is already stored.
    async fn topic_exists(&self, name: &str, level: Level) -> Result<bool, AppError>;
}

/// Collaborators handed to an import run.
#[derive(Clone)]
pub struct ImportContext {
    pub store: Arc<dyn TopicStore>,
    pub rows: Arc<dyn SheetRowSource>,
    pub jobs: Arc<dyn JobStore>,
}
