//! JobPulse engine: REST client, job poller and the effect-executing thread.
mod api;
mod engine;
mod poller;
mod types;

pub use api::{ApiSettings, DashboardApi, ReqwestApi};
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use poller::{IgnoreStatus, JobPoller, PollSettings, StatusSink};
pub use types::{ApiError, ApiErrorKind, EngineEvent, HealthReport};
