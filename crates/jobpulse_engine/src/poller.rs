use std::sync::Arc;
use std::time::Duration;

use jobpulse_core::{JobHandle, JobStatus, ScrapeJob};
use pulse_logging::{pulse_debug, pulse_info, pulse_warn};
use tokio_util::sync::CancellationToken;

use crate::{ApiError, ApiErrorKind, DashboardApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Fixed delay before every status read.
    pub interval: Duration,
    /// Give up after this many reads; `None` polls until a terminal status.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: Some(450),
        }
    }
}

/// Receives the non-terminal snapshots seen while polling.
pub trait StatusSink: Send + Sync {
    fn observed(&self, job_id: &str, status: JobStatus);
}

/// Sink for callers that only care about the final snapshot.
pub struct IgnoreStatus;

impl StatusSink for IgnoreStatus {
    fn observed(&self, _job_id: &str, _status: JobStatus) {}
}

/// Drives one scrape job from submission to a terminal snapshot.
#[derive(Clone)]
pub struct JobPoller {
    api: Arc<dyn DashboardApi>,
    settings: PollSettings,
}

impl JobPoller {
    pub fn new(api: Arc<dyn DashboardApi>, settings: PollSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Submits the scrape. Does not wait for the job to make progress.
    pub async fn submit(&self, sources: &[String]) -> Result<JobHandle, ApiError> {
        let handle = self.api.submit_scrape(sources).await?;
        pulse_info!("Scrape {} submitted for {:?}", handle.job_id, sources);
        Ok(handle)
    }

    /// Polls until the job reports `completed` or `failed`.
    ///
    /// Any request error ends polling immediately; nothing is retried. No
    /// read is issued after cancellation or after the terminal snapshot.
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
        sink: &dyn StatusSink,
    ) -> Result<ScrapeJob, ApiError> {
        let mut attempts: u32 = 0;
        loop {
            if let Some(max) = self.settings.max_attempts {
                if attempts >= max {
                    pulse_warn!("Scrape {} gave up after {} polls", handle.job_id, attempts);
                    return Err(ApiError::new(
                        ApiErrorKind::PollTimeout { attempts },
                        format!("job {} did not finish", handle.job_id),
                    ));
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    pulse_info!("Scrape {} polling cancelled", handle.job_id);
                    return Err(ApiError::new(ApiErrorKind::Cancelled, "cancelled by user"));
                }
                _ = tokio::time::sleep(self.settings.interval) => {}
            }

            attempts += 1;
            let snapshot = self.api.scrape_status(handle).await?;
            pulse_debug!(
                "Scrape {} poll #{}: {}",
                handle.job_id,
                attempts,
                snapshot.status.label()
            );
            if snapshot.status.is_terminal() {
                return Ok(snapshot);
            }
            sink.observed(&handle.job_id, snapshot.status);
        }
    }
}
