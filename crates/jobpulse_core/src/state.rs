use std::time::Duration;

use crate::query::build_query;
use crate::render::ViewState;
use crate::ui::{Control, StatusIndicator, UiCommand};
use crate::{Effect, FilterInputs, JobStatus};

/// Sources scraped when the trigger is pressed.
pub const DEFAULT_SOURCES: [&str; 2] = ["remoteok", "arbeitnow"];

/// How long the done/failed badge stays up.
pub const STATUS_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub sources: Vec<String>,
    pub status_display: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            status_display: STATUS_DISPLAY,
        }
    }
}

/// Where the scrape trigger currently is in its cycle.
///
/// While `Refreshing`, each field holds the generation of the refresh fetch
/// that has not settled yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrapePhase {
    #[default]
    Idle,
    Submitting,
    Polling {
        job_id: String,
        last_status: JobStatus,
    },
    Refreshing {
        listings: Option<u64>,
        trends: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    settings: DashboardSettings,
    view: ViewState,
    filters: FilterInputs,
    phase: ScrapePhase,
    listings_generation: u64,
    trends_generation: u64,
    /// Page of the latest listing request until that request settles.
    pending_page: Option<u32>,
    status: StatusIndicator,
    status_token: u64,
    ui: Vec<UiCommand>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DashboardSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> &ScrapePhase {
        &self.phase
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn filters(&self) -> &FilterInputs {
        &self.filters
    }

    pub fn status(&self) -> StatusIndicator {
        self.status
    }

    /// Page navigation starts from: the one in flight, else the one shown.
    pub fn target_page(&self) -> u32 {
        self.pending_page.unwrap_or_else(|| self.view.page())
    }

    /// The trigger is only usable between scrape cycles.
    pub fn scrape_enabled(&self) -> bool {
        self.phase == ScrapePhase::Idle
    }

    /// Drains the UI commands accumulated since the last call.
    pub fn take_ui_commands(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.ui)
    }

    pub(crate) fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub(crate) fn set_phase(&mut self, phase: ScrapePhase) {
        self.phase = phase;
    }

    pub(crate) fn phase_mut(&mut self) -> &mut ScrapePhase {
        &mut self.phase
    }

    pub(crate) fn set_filters(&mut self, filters: FilterInputs) {
        self.filters = filters;
    }

    pub(crate) fn is_latest_listings(&self, generation: u64) -> bool {
        generation == self.listings_generation
    }

    pub(crate) fn is_latest_trends(&self, generation: u64) -> bool {
        generation == self.trends_generation
    }

    /// Issues a listing fetch for the current filters and target page.
    pub(crate) fn issue_listings(&mut self) -> (u64, Effect) {
        let page = self.target_page();
        self.issue_listings_at(page)
    }

    /// Issues a listing fetch for `page`. The shown page only changes once
    /// the response is rendered.
    pub(crate) fn issue_listings_at(&mut self, page: u32) -> (u64, Effect) {
        self.listings_generation += 1;
        let generation = self.listings_generation;
        self.pending_page = Some(page);
        let query = build_query(&self.filters, page);
        (generation, Effect::FetchListings { generation, query })
    }

    /// Called once any listing response is handled, rendered or not.
    pub(crate) fn settle_listings(&mut self, generation: u64) {
        if self.is_latest_listings(generation) {
            self.pending_page = None;
        }
    }

    pub(crate) fn issue_trends(&mut self) -> (u64, Effect) {
        self.trends_generation += 1;
        let generation = self.trends_generation;
        (generation, Effect::FetchTrends { generation })
    }

    pub(crate) fn push_ui(&mut self, commands: impl IntoIterator<Item = UiCommand>) {
        self.ui.extend(commands);
    }

    pub(crate) fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.ui.push(UiCommand::SetControlEnabled { control, enabled });
    }

    /// Shows `status`. Any clear timer scheduled for an earlier status goes stale.
    pub(crate) fn set_status(&mut self, status: StatusIndicator) {
        self.status = status;
        self.status_token += 1;
        self.ui.push(UiCommand::SetStatus { status });
    }

    pub(crate) fn clear_status_if_current(&mut self, token: u64) {
        if token == self.status_token && self.status != StatusIndicator::Hidden {
            self.set_status(StatusIndicator::Hidden);
        }
    }

    /// Leaves the scrape cycle: trigger back on, badge scheduled to clear.
    pub(crate) fn finish_scrape_cycle(&mut self) -> Effect {
        self.phase = ScrapePhase::Idle;
        self.set_enabled(Control::ScrapeButton, true);
        self.set_enabled(Control::CancelButton, false);
        Effect::ClearStatusAfter {
            token: self.status_token,
            delay: self.settings.status_display,
        }
    }
}
