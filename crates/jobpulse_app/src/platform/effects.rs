use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use jobpulse_core::{Effect, JobStatus, Msg, ScrapeJob};
use jobpulse_engine::{EngineEvent, EngineHandle};
use pulse_logging::{pulse_debug, pulse_info, pulse_warn};

use super::app::AppEvent;

const EVENT_WAIT: Duration = Duration::from_millis(100);

/// Executes effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(events);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitScrape { sources } => {
                    pulse_info!("SubmitScrape sources={}", sources.join(","));
                    self.engine.start_scrape(sources);
                }
                Effect::CancelScrape => {
                    pulse_info!("CancelScrape");
                    self.engine.cancel_scrape();
                }
                Effect::FetchListings { generation, query } => {
                    pulse_debug!("FetchListings generation={} query={:?}", generation, query);
                    self.engine.fetch_listings(generation, query);
                }
                Effect::FetchTrends { generation } => {
                    pulse_debug!("FetchTrends generation={}", generation);
                    self.engine.fetch_trends(generation);
                }
                Effect::ClearStatusAfter { token, delay } => {
                    self.engine.clear_status_after(token, delay);
                }
            }
        }
    }

    fn spawn_event_loop(&self, events: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || pump_events(|| engine.recv_timeout(EVENT_WAIT), &events));
    }
}

/// Forwards engine events until the engine or the main loop goes away.
fn pump_events(
    mut recv: impl FnMut() -> Result<EngineEvent, RecvTimeoutError>,
    events: &mpsc::Sender<AppEvent>,
) {
    loop {
        let event = match recv() {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                pulse_warn!("Engine event channel closed");
                return;
            }
        };
        if let Some(msg) = map_event(event) {
            if events.send(AppEvent::Msg(msg)).is_err() {
                return;
            }
        }
    }
}

/// Translates an engine event into a controller message, logging failures.
/// Health replies are only logged.
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::ScrapeSubmitted { job_id } => {
            pulse_info!("Scrape accepted job_id={}", job_id);
            Msg::ScrapeSubmitted { job_id }
        }
        EngineEvent::ScrapeStatus { job_id, status } => {
            pulse_debug!("Scrape {} is {}", job_id, status.label());
            Msg::ScrapeStatusObserved { job_id, status }
        }
        EngineEvent::ScrapeFinished { result } => {
            match &result {
                Ok(job) => log_scrape_outcome(job),
                Err(err) => pulse_warn!("Scrape abandoned: {}", err),
            }
            Msg::ScrapeFinished {
                result: result.map_err(|err| err.to_string()),
            }
        }
        EngineEvent::ListingsLoaded { generation, result } => {
            if let Err(err) = &result {
                pulse_warn!("Listings request {} failed: {}", generation, err);
            }
            Msg::ListingsLoaded {
                generation,
                result: result.map_err(|err| err.to_string()),
            }
        }
        EngineEvent::TrendsLoaded { generation, result } => {
            if let Err(err) = &result {
                pulse_warn!("Trends request {} failed: {}", generation, err);
            }
            Msg::TrendsLoaded {
                generation,
                result: result.map_err(|err| err.to_string()),
            }
        }
        EngineEvent::StatusClearDue { token } => Msg::StatusClearElapsed { token },
        EngineEvent::Health { result } => {
            match result {
                Ok(report) if report.ok => {
                    pulse_info!("Backend reachable, {} active jobs", report.active_jobs)
                }
                Ok(_) => pulse_warn!("Backend reports unhealthy"),
                Err(err) => pulse_warn!("Backend health check failed: {}", err),
            }
            return None;
        }
    };
    Some(msg)
}

fn log_scrape_outcome(job: &ScrapeJob) {
    if job.status == JobStatus::Failed {
        pulse_warn!(
            "Scrape {} failed: {}",
            job.job_id,
            job.error.as_deref().unwrap_or("no reason given")
        );
    }
    for (source, outcome) in job.source_outcomes() {
        match outcome.status.as_str() {
            "completed" => pulse_info!(
                "  {}: +{} -{} total={} quality={:?}",
                source,
                outcome.added.unwrap_or(0),
                outcome.removed.unwrap_or(0),
                outcome.total.unwrap_or(0),
                outcome.quality_score
            ),
            "skipped" => pulse_info!(
                "  {}: skipped ({})",
                source,
                outcome.reason.as_deref().unwrap_or("-")
            ),
            other => pulse_warn!(
                "  {}: {} ({})",
                source,
                other,
                outcome.error.as_deref().unwrap_or("-")
            ),
        }
    }
}
