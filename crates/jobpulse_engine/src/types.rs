use std::fmt;

use jobpulse_core::{JobStatus, ListingPage, ScrapeJob, TrendSnapshot};
use serde::Deserialize;

/// Events reported by the engine thread back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ScrapeSubmitted {
        job_id: String,
    },
    ScrapeStatus {
        job_id: String,
        status: JobStatus,
    },
    /// Terminal snapshot, or why submission/polling was abandoned.
    ScrapeFinished {
        result: Result<ScrapeJob, ApiError>,
    },
    ListingsLoaded {
        generation: u64,
        result: Result<ListingPage, ApiError>,
    },
    TrendsLoaded {
        generation: u64,
        result: Result<TrendSnapshot, ApiError>,
    },
    StatusClearDue {
        token: u64,
    },
    Health {
        result: Result<HealthReport, ApiError>,
    },
}

/// Reply of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub ok: bool,
    #[serde(default)]
    pub active_jobs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Decode failures are handled exactly like transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ApiErrorKind::Transport
                | ApiErrorKind::HttpStatus(_)
                | ApiErrorKind::Timeout
                | ApiErrorKind::TooLarge { .. }
                | ApiErrorKind::Decode
                | ApiErrorKind::InvalidUrl
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Transport,
    /// The poller gave up after its attempt budget.
    PollTimeout { attempts: u32 },
    Cancelled,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "request timeout"),
            ApiErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ApiErrorKind::Decode => write!(f, "unexpected response shape"),
            ApiErrorKind::Transport => write!(f, "network error"),
            ApiErrorKind::PollTimeout { attempts } => {
                write!(f, "job still running after {attempts} polls")
            }
            ApiErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
