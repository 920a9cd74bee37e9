//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Verification expires codes lazily, only when a key is touched again. The
//! sweep here reclaims memory for codes nobody comes back for.
//!
//! ```text
//! Scheduler (every minute by default)
//!     │
//!     └─► OtpStore::cleanup_expired()
//! ```

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::otp::OtpStore;

/// Start the expired-OTP sweep on the given cron schedule (with seconds field).
pub async fn start_scheduler(store: OtpStore, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_job = Job::new_async(schedule, move |_uuid, _lock| {
        let store = store.clone();
        Box::pin(async move {
            run_otp_sweep(&store).await;
        })
    })
    .with_context(|| format!("Invalid OTP sweep schedule: {schedule}"))?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "Scheduled tasks started (expired OTP sweep)");
    Ok(scheduler)
}

/// Remove expired entries once.
pub async fn run_otp_sweep(store: &OtpStore) -> usize {
    let removed = store.cleanup_expired().await;

    if removed > 0 {
        tracing::info!(removed, "Swept expired OTP entries");
    } else {
        tracing::debug!("OTP sweep found nothing to remove");
    }

    removed
}
