#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use jobpulse_core::{
    JobHandle, JobStatus, Listing, ListingPage, ListingQuery, ScrapeJob, TrendSnapshot,
};
use jobpulse_engine::{ApiError, ApiErrorKind, DashboardApi, HealthReport};

/// In-memory backend that replays a fixed status script.
pub struct ScriptedApi {
    pub statuses: Mutex<VecDeque<Result<JobStatus, ApiError>>>,
    pub submit_error: Option<ApiError>,
    pub status_reads: AtomicUsize,
    pub listing_delay: Duration,
    pub listings_error: Option<ApiError>,
}

impl ScriptedApi {
    pub fn new(script: Vec<Result<JobStatus, ApiError>>) -> Self {
        Self {
            statuses: Mutex::new(script.into()),
            submit_error: None,
            status_reads: AtomicUsize::new(0),
            listing_delay: Duration::ZERO,
            listings_error: None,
        }
    }

    pub fn statuses(script: &[JobStatus]) -> Self {
        Self::new(script.iter().copied().map(Ok).collect())
    }

    pub fn failing_submit(error: ApiError) -> Self {
        Self {
            submit_error: Some(error),
            ..Self::new(Vec::new())
        }
    }

    pub fn reads(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }
}

pub fn transport_error(message: &str) -> ApiError {
    ApiError {
        kind: ApiErrorKind::Transport,
        message: message.to_string(),
    }
}

#[async_trait::async_trait]
impl DashboardApi for ScriptedApi {
    async fn submit_scrape(&self, _sources: &[String]) -> Result<JobHandle, ApiError> {
        match &self.submit_error {
            Some(err) => Err(err.clone()),
            None => Ok(JobHandle {
                job_id: "job-1".to_string(),
            }),
        }
    }

    async fn scrape_status(&self, job: &JobHandle) -> Result<ScrapeJob, ApiError> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        let next = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(JobStatus::Running));
        next.map(|status| ScrapeJob {
            job_id: job.job_id.clone(),
            status,
            created_at: None,
            completed_at: None,
            error: None,
            result: None,
        })
    }

    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage, ApiError> {
        tokio::time::sleep(self.listing_delay).await;
        if let Some(err) = &self.listings_error {
            return Err(err.clone());
        }
        Ok(ListingPage {
            listings: vec![Listing {
                title: "Rust Engineer".to_string(),
                company: "Acme".to_string(),
                ..Listing::default()
            }],
            total: 1,
            page: query.page,
            limit: Some(query.limit),
        })
    }

    async fn trends(&self) -> Result<TrendSnapshot, ApiError> {
        Ok(TrendSnapshot::default())
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        Ok(HealthReport {
            ok: true,
            active_jobs: 0,
        })
    }
}
