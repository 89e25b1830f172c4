//! Full wipe-and-reimport of the curriculum.

use crate::errors::AppError;
use crate::models::{BulkImportOptions, ImportJob, NewTopic};
use crate::sheets::level_tabs;

use super::{map_row, ImportContext, RowOutcome, EXPECTED_COLUMNS};

/// Run a bulk import to completion, publishing progress through the job
/// store.
///
/// Credentials are verified before the reset so a misconfigured environment
/// cannot destroy data. Row and tab failures are recorded on the job and
/// the run keeps going; the job only ends `failed` when a step before the
/// per-row loop gives out.
pub async fn run_bulk_import(ctx: ImportContext, mut job: ImportJob, options: BulkImportOptions) {
    tracing::info!("Bulk import {} starting with options {:?}", job.job_id, options);
    if options.download_media || options.extract_audio || options.generate_thumbnails {
        tracing::info!(
            "Bulk import {}: media options recorded for the media pipeline",
            job.job_id
        );
    }
    if options.skip_existing {
        tracing::info!(
            "Bulk import {}: skipExisting has no effect, the store is reset first",
            job.job_id
        );
    }

    job.mark_running();
    ctx.jobs.put(job.clone()).await;

    match import_all_tabs(&ctx, &mut job).await {
        Ok(()) => {
            job.complete();
            tracing::info!(
                "Bulk import {} completed: {} imported, {} failed",
                job.job_id,
                job.successful_items,
                job.failed_items
            );
        }
        Err(err) => {
            tracing::error!("Bulk import {} failed: {}", job.job_id, err);
            job.fail(err.message());
        }
    }
    ctx.jobs.put(job).await;
}

async fn import_all_tabs(ctx: &ImportContext, job: &mut ImportJob) -> Result<(), AppError> {
    ctx.rows.ensure_credentials().await?;

    // Destructive phase, reached only with working credentials. Exercises
    // first to keep the foreign key satisfied.
    let exercises_cleared = ctx.store.delete_all_exercises().await?;
    let topics_cleared = ctx.store.delete_all_topics().await?;
    tracing::info!(
        "Bulk import {} cleared {} exercises and {} topics",
        job.job_id,
        exercises_cleared,
        topics_cleared
    );

    let mut order_index: i64 = 0;
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

        let outcomes: Vec<(usize, RowOutcome)> = raw
            .iter()
            .enumerate()
            .map(|(index, cells)| (index + 2, map_row(cells)))
            .collect();
        let attempted = outcomes
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, RowOutcome::BlankTopic))
            .count();
        job.set_total(job.total_items + attempted as u64);
        ctx.jobs.put(job.clone()).await;
        tracing::info!(
            "Importing {} rows from tab '{}' as level {}",
            attempted,
            tab.sheet_name,
            tab.level
        );

        for (row_number, outcome) in outcomes {
            match outcome {
                RowOutcome::BlankTopic => {}
                RowOutcome::UnexpectedShape { cells } => {
                    job.record_failure(format!(
                        "Tab '{}' row {}: expected at most {} cells, found {}",
                        tab.sheet_name, row_number, EXPECTED_COLUMNS, cells
                    ));
                    ctx.jobs.put(job.clone()).await;
                }
                RowOutcome::Mapped(row) => {
                    order_index += 1;
                    let topic = NewTopic::from_sheet_row(tab.level, &row, order_index);
                    match ctx.store.create_topic(&topic).await {
                        Ok(_) => job.record_success(),
                        Err(err) => job.record_failure(format!(
                            "Tab '{}' row {} ('{}'): {}",
                            tab.sheet_name,
                            row_number,
                            topic.name,
                            err.message()
                        )),
                    }
                    ctx.jobs.put(job.clone()).await;
                }
            }
        }
    }

    Ok(())
}
