//! Incremental, retry-aware import of missing topics.
//!
//! Never deletes anything: the spreadsheet is scanned for `(name, level)`
//! pairs the store does not have yet, and only those are written, in
//! fixed-size batches with a sleep in between to stay under upstream rate
//! limits.

use std::time::Duration;

use crate::errors::AppError;
use crate::models::{ImportJob, Level, NewTopic, ResumeSettings, SheetRow};
use crate::sheets::level_tabs;

use super::{map_row, retry, ImportContext, RetryPolicy, RowOutcome, EXPECTED_COLUMNS};

struct RemainingRow {
    level: Level,
    sheet_name: &'static str,
    row_number: usize,
    row: SheetRow,
}

/// Run a resume import to completion, publishing progress through the job
/// store.
pub async fn run_resume_import(ctx: ImportContext, mut job: ImportJob, settings: ResumeSettings) {
    tracing::info!(
        "Resume import {} starting (batch size {}, delay {} ms, max retries {}, skip existing {})",
        job.job_id,
        settings.batch_size,
        settings.delay_between_batches,
        settings.max_retries,
        settings.skip_existing
    );

    job.mark_running();
    ctx.jobs.put(job.clone()).await;

    match import_remaining(&ctx, &mut job, settings).await {
        Ok(()) => {
            job.complete();
            tracing::info!(
                "Resume import {} completed: {} imported, {} failed",
                job.job_id,
                job.successful_items,
                job.failed_items
            );
        }
        Err(err) => {
            tracing::error!("Resume import {} failed: {}", job.job_id, err);
            job.fail(err.message());
        }
    }
    ctx.jobs.put(job).await;
}

async fn import_remaining(
    ctx: &ImportContext,
    job: &mut ImportJob,
    settings: ResumeSettings,
) -> Result<(), AppError> {
    ctx.rows.ensure_credentials().await?;

    let existing = ctx.store.existing_topic_keys().await?;
    let mut next_order_index = ctx.store.count_topics().await?;

    // Scan phase: everything the store does not have yet.
    let mut remaining: Vec<RemainingRow> = Vec::new();
    for tab in level_tabs() {
        let raw = match ctx.rows.fetch_rows(&tab).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Tab '{}' yields no rows: {}", tab.sheet_name, err);
                job.add_error(format!("Tab '{}': {}", tab.sheet_name, err.message()));
                ctx.jobs.put(job.clone()).await;
                continue;
            }
        };

        for (index, cells) in raw.iter().enumerate() {
            let row_number = index + 2;
            match map_row(cells) {
                RowOutcome::BlankTopic => {}
                RowOutcome::UnexpectedShape { cells } => {
                    job.record_failure(format!(
                        "Tab '{}' row {}: expected at most {} cells, found {}",
                        tab.sheet_name, row_number, EXPECTED_COLUMNS, cells
                    ));
                    ctx.jobs.put(job.clone()).await;
                }
                RowOutcome::Mapped(row) => {
                    let key = (row.topic.trim().to_string(), tab.level);
                    if !existing.contains(&key) {
                        remaining.push(RemainingRow {
                            level: tab.level,
                            sheet_name: tab.sheet_name,
                            row_number,
                            row,
                        });
                    }
                }
            }
        }
    }

    job.set_total(job.processed_items + remaining.len() as u64);
    ctx.jobs.put(job.clone()).await;
    tracing::info!(
        "Resume import {}: {} rows remaining after diff",
        job.job_id,
        remaining.len()
    );

    let policy = RetryPolicy::new(settings.max_retries);
    let batch_size = settings.batch_size.max(1);
    let batch_count = remaining.len().div_ceil(batch_size);

    for (batch_index, batch) in remaining.chunks(batch_size).enumerate() {
        for item in batch {
            let name = item.row.topic.trim().to_string();

            if settings.skip_existing {
                match ctx.store.topic_exists(&name, item.level).await {
                    // Usually a row that appears twice in the same sheet;
                    // the first occurrence already landed this run.
                    Ok(true) => {
                        job.record_success();
                        ctx.jobs.put(job.clone()).await;
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        tracing::warn!(
                            "Existence check for '{}' ({}) failed, attempting write: {}",
                            name,
                            item.level,
                            err
                        );
                    }
                }
            }

            next_order_index += 1;
            let topic = NewTopic::from_sheet_row(item.level, &item.row, next_order_index);
            match retry(policy, || ctx.store.create_topic(&topic)).await {
                Ok(_) => job.record_success(),
                Err(err) => job.record_failure(format!(
                    "Tab '{}' row {} ('{}'): {}",
                    item.sheet_name,
                    item.row_number,
                    name,
                    err.message()
                )),
            }
            ctx.jobs.put(job.clone()).await;
        }

        if batch_index + 1 < batch_count {
            tracing::debug!(
                "Batch {} of {} done, sleeping {} ms",
                batch_index + 1,
                batch_count,
                settings.delay_between_batches
            );
            tokio::time::sleep(Duration::from_millis(settings.delay_between_batches)).await;
        }
    }

    Ok(())
}
