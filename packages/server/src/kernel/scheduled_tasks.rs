//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Hourly removal of expired browser sessions

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::auth::SessionStore;

/// Start all scheduled tasks
pub async fn start_scheduler(sessions: SessionStore) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Session cleanup - runs every hour
    let cleanup_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let sessions = sessions.clone();
        Box::pin(async move {
            let removed = sessions.cleanup_expired().await;
            tracing::debug!(removed, "Expired sessions cleaned up");
        })
    })?;

    scheduler.add(cleanup_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (session cleanup every hour)");
    Ok(scheduler)
}
