//! Optional in-process schedule for the accrual batch
//!
//! The authoritative trigger is the external HTTP call to the jobs endpoint;
//! this schedule exists for deployments without an external clock. Both paths
//! run the same idempotent batch, so overlap is harmless.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::accrual::AccrualService;

/// Start a cron-driven accrual schedule. The returned scheduler must be kept
/// alive for the jobs to fire.
pub async fn spawn_accrual_schedule(
    cron: &str,
    accrual_service: Arc<AccrualService>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;

    let job = Job::new_async(cron, move |_job_id, _scheduler| {
        let accrual_service = accrual_service.clone();
        Box::pin(async move {
            tracing::info!("Scheduled accrual run starting");
            match accrual_service.run_daily_accrual(Utc::now()).await {
                Ok(report) => {
                    tracing::info!(
                        credited = report.credited,
                        skipped = report.skipped,
                        failed = report.failed,
                        "Scheduled accrual run finished"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Scheduled accrual run failed");
                }
            }
        })
    })
    .with_context(|| format!("Invalid accrual cron expression '{}'", cron))?;

    scheduler.add(job).await.context("Failed to add accrual job")?;
    scheduler.start().await.context("Failed to start job scheduler")?;

    tracing::info!(schedule = cron, "Accrual schedule started");

    Ok(scheduler)
}
