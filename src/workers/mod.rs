use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::session::SessionStore;

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    sessions: Arc<SessionStore>,
    config: SessionConfig,
}

impl WorkerManager {
    pub async fn new(sessions: Arc<SessionStore>, config: SessionConfig) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            sessions,
            config,
        })
    }

    pub async fn start(&self) -> Result<(), WorkerError> {
        let scheduler = self.scheduler.lock().await;

        let sessions = Arc::clone(&self.sessions);
        let idle_ttl = self.config.idle_ttl;
        let job = Job::new(self.config.sweep_schedule.as_str(), move |_uuid, _lock| {
            sweep_sessions(&sessions, idle_ttl);
        })?;
        scheduler.add(job).await?;
        info!(
            schedule = %self.config.sweep_schedule,
            idle_ttl_secs = idle_ttl.as_secs(),
            "session sweeper scheduled"
        );

        scheduler.start().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping workers...");
        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Error shutting down scheduler");
        }
        info!("Workers stopped");
    }
}

fn sweep_sessions(sessions: &SessionStore, idle_ttl: Duration) -> usize {
    let swept = sessions.sweep_idle(idle_ttl);
    if swept > 0 {
        info!(swept, remaining = sessions.len(), "idle sessions swept");
    } else {
        debug!(remaining = sessions.len(), "no idle sessions to sweep");
    }
    swept
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}
