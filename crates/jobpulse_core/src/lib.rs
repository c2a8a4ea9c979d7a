//! JobPulse core: pure dashboard controller, renderers and formatting.
mod effect;
pub mod format;
mod model;
mod msg;
mod query;
mod render;
mod state;
mod ui;
mod update;

pub use effect::Effect;
pub use model::{
    CompanyCount, JobHandle, JobStatus, Listing, ListingPage, SalaryBucket, ScrapeHistoryEntry,
    ScrapeJob, SourceCount, SourceOutcome, TagCount, TrendSnapshot,
};
pub use msg::Msg;
pub use query::{build_query, max_page, FilterInputs, ListingQuery, PAGE_SIZE};
pub use render::{render_listings, render_trends, ViewState, GRID_COLOR, MAX_TAGS, TICK_COLOR};
pub use state::{AppState, DashboardSettings, ScrapePhase, DEFAULT_SOURCES, STATUS_DISPLAY};
pub use ui::{
    ChartHandle, ChartKind, ChartOptions, ChartSlot, ChartSpec, Control, Dataset, IndexAxis,
    ListingRow, StatusIndicator, UiCommand,
};
pub use update::update;
