mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{transport_error, ScriptedApi};
use jobpulse_core::JobStatus;
use jobpulse_engine::{ApiErrorKind, IgnoreStatus, JobPoller, PollSettings, StatusSink};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct RecordingSink {
    seen: Mutex<Vec<JobStatus>>,
}

impl StatusSink for RecordingSink {
    fn observed(&self, _job_id: &str, status: JobStatus) {
        self.seen.lock().unwrap().push(status);
    }
}

fn fast(max_attempts: Option<u32>) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(1),
        max_attempts,
    }
}

#[tokio::test]
async fn polls_until_completed_and_stops() {
    pulse_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::statuses(&[
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Running,
    ]));
    let poller = JobPoller::new(api.clone(), fast(None));
    let sink = RecordingSink::default();

    let handle = poller
        .submit(&["remoteok".to_string(), "arbeitnow".to_string()])
        .await
        .expect("submitted");
    let job = poller
        .await_completion(&handle, &CancellationToken::new(), &sink)
        .await
        .expect("terminal snapshot");

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(api.reads(), 3);
    assert_eq!(
        *sink.seen.lock().unwrap(),
        vec![JobStatus::Queued, JobStatus::Running]
    );
}

#[tokio::test]
async fn failed_status_is_returned_not_raised() {
    let api = Arc::new(ScriptedApi::statuses(&[JobStatus::Running, JobStatus::Failed]));
    let poller = JobPoller::new(api.clone(), fast(Some(10)));
    let handle = poller.submit(&[]).await.unwrap();

    let job = poller
        .await_completion(&handle, &CancellationToken::new(), &IgnoreStatus)
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(api.reads(), 2);
}

#[tokio::test]
async fn poll_error_aborts_without_retry() {
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(JobStatus::Running),
        Err(transport_error("connection reset")),
        Ok(JobStatus::Completed),
    ]));
    let poller = JobPoller::new(api.clone(), fast(None));
    let handle = poller.submit(&[]).await.unwrap();

    let err = poller
        .await_completion(&handle, &CancellationToken::new(), &IgnoreStatus)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert!(err.is_transport());
    assert_eq!(api.reads(), 2);
}

#[tokio::test]
async fn gives_up_after_attempt_budget() {
    let api = Arc::new(ScriptedApi::statuses(&[]));
    let poller = JobPoller::new(api.clone(), fast(Some(3)));
    let handle = poller.submit(&[]).await.unwrap();

    let err = poller
        .await_completion(&handle, &CancellationToken::new(), &IgnoreStatus)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::PollTimeout { attempts: 3 });
    assert!(!err.is_transport());
    assert_eq!(api.reads(), 3);
}

#[tokio::test]
async fn cancelled_token_stops_before_next_read() {
    let api = Arc::new(ScriptedApi::statuses(&[]));
    let poller = JobPoller::new(
        api.clone(),
        PollSettings {
            interval: Duration::from_secs(60),
            max_attempts: None,
        },
    );
    let handle = poller.submit(&[]).await.unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = poller
        .await_completion(&handle, &cancel, &IgnoreStatus)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Cancelled);
    assert_eq!(api.reads(), 0);
}

#[tokio::test]
async fn submit_failure_is_surfaced() {
    let api = Arc::new(ScriptedApi::failing_submit(transport_error("refused")));
    let poller = JobPoller::new(api.clone(), fast(None));

    let err = poller.submit(&["remoteok".to_string()]).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert_eq!(api.reads(), 0);
}
