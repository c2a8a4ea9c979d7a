use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use jobpulse_core::{JobStatus, ListingQuery, ScrapeJob};
use pulse_logging::pulse_debug;
use tokio_util::sync::CancellationToken;

use crate::poller::{JobPoller, PollSettings, StatusSink};
use crate::{ApiError, ApiErrorKind, ApiSettings, DashboardApi, EngineEvent, ReqwestApi};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub poll: PollSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("api client: {0}")]
    Api(#[from] ApiError),
    #[error("async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    StartScrape { sources: Vec<String> },
    CancelScrape,
    FetchListings { generation: u64, query: ListingQuery },
    FetchTrends { generation: u64 },
    ClearStatusAfter { token: u64, delay: Duration },
    CheckHealth,
}

/// Handle to the background thread that performs all network I/O.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApi::new(settings.api)?);
        Ok(Self::with_api(api, settings.poll)?)
    }

    pub fn with_api(api: Arc<dyn DashboardApi>, poll: PollSettings) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let poller = JobPoller::new(api.clone(), poll);

        thread::spawn(move || {
            let mut current_scrape: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartScrape { sources } => {
                        let cancel = CancellationToken::new();
                        current_scrape = Some(cancel.clone());
                        runtime.spawn(run_scrape(
                            poller.clone(),
                            sources,
                            cancel,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::CancelScrape => {
                        if let Some(cancel) = current_scrape.take() {
                            cancel.cancel();
                        }
                    }
                    other => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), other, event_tx).await;
                        });
                    }
                }
            }
            pulse_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn start_scrape(&self, sources: Vec<String>) {
        self.send(EngineCommand::StartScrape { sources });
    }

    pub fn cancel_scrape(&self) {
        self.send(EngineCommand::CancelScrape);
    }

    pub fn fetch_listings(&self, generation: u64, query: ListingQuery) {
        self.send(EngineCommand::FetchListings { generation, query });
    }

    pub fn fetch_trends(&self, generation: u64) {
        self.send(EngineCommand::FetchTrends { generation });
    }

    pub fn clear_status_after(&self, token: u64, delay: Duration) {
        self.send(EngineCommand::ClearStatusAfter { token, delay });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Disconnected` means the
    /// engine thread is gone and no event will ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        let rx = self
            .event_rx
            .lock()
            .map_err(|_| RecvTimeoutError::Disconnected)?;
        rx.recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

struct ChannelStatusSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl StatusSink for ChannelStatusSink {
    fn observed(&self, job_id: &str, status: JobStatus) {
        let _ = self.tx.send(EngineEvent::ScrapeStatus {
            job_id: job_id.to_string(),
            status,
        });
    }
}

async fn run_scrape(
    poller: JobPoller,
    sources: Vec<String>,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = submit_and_poll(&poller, &sources, &cancel, &event_tx).await;
    let _ = event_tx.send(EngineEvent::ScrapeFinished { result });
}

async fn submit_and_poll(
    poller: &JobPoller,
    sources: &[String],
    cancel: &CancellationToken,
    event_tx: &mpsc::Sender<EngineEvent>,
) -> Result<ScrapeJob, ApiError> {
    let handle = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return Err(ApiError::new(ApiErrorKind::Cancelled, "cancelled before submission"));
        }
        submitted = poller.submit(sources) => submitted?,
    };
    let _ = event_tx.send(EngineEvent::ScrapeSubmitted {
        job_id: handle.job_id.clone(),
    });
    let sink = ChannelStatusSink {
        tx: event_tx.clone(),
    };
    poller.await_completion(&handle, cancel, &sink).await
}

async fn handle_command(
    api: &dyn DashboardApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchListings { generation, query } => EngineEvent::ListingsLoaded {
            generation,
            result: api.listings(&query).await,
        },
        EngineCommand::FetchTrends { generation } => EngineEvent::TrendsLoaded {
            generation,
            result: api.trends().await,
        },
        EngineCommand::ClearStatusAfter { token, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::StatusClearDue { token }
        }
        EngineCommand::CheckHealth => EngineEvent::Health {
            result: api.health().await,
        },
        EngineCommand::StartScrape { .. } | EngineCommand::CancelScrape => return,
    };
    let _ = event_tx.send(event);
}
