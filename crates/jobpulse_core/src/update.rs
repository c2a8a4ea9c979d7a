use crate::query::{max_page, PAGE_SIZE};
use crate::render::{render_listings, render_trends};
use crate::ui::{Control, StatusIndicator};
use crate::{AppState, Effect, JobStatus, Msg, ScrapePhase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Rendering output is queued on the state; drain it with
/// [`AppState::take_ui_commands`].
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Startup => {
            state.set_enabled(Control::ScrapeButton, state.scrape_enabled());
            state.set_enabled(Control::CancelButton, false);
            state.set_enabled(Control::PrevButton, false);
            state.set_enabled(Control::NextButton, false);
            let (_, listings) = state.issue_listings();
            let (_, trends) = state.issue_trends();
            vec![listings, trends]
        }
        Msg::FiltersSubmitted(filters) => {
            // A narrower result set may not reach the current page.
            state.set_filters(filters);
            let (_, listings) = state.issue_listings_at(1);
            vec![listings]
        }
        Msg::PrevPageClicked => {
            let page = state.target_page();
            if page > 1 {
                let (_, listings) = state.issue_listings_at(page - 1);
                vec![listings]
            } else {
                Vec::new()
            }
        }
        Msg::NextPageClicked => {
            let page = state.target_page();
            let last = state
                .view_state()
                .total()
                .map_or(1, |total| max_page(total, PAGE_SIZE));
            if page < last {
                let (_, listings) = state.issue_listings_at(page + 1);
                vec![listings]
            } else {
                Vec::new()
            }
        }
        Msg::ScrapeClicked => {
            if state.scrape_enabled() {
                state.set_phase(ScrapePhase::Submitting);
                state.set_enabled(Control::ScrapeButton, false);
                state.set_enabled(Control::CancelButton, true);
                state.set_status(StatusIndicator::Running);
                vec![Effect::SubmitScrape {
                    sources: state.settings().sources.clone(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::CancelScrapeClicked => match state.phase() {
            ScrapePhase::Submitting | ScrapePhase::Polling { .. } => vec![Effect::CancelScrape],
            _ => Vec::new(),
        },
        Msg::ScrapeSubmitted { job_id } => {
            if *state.phase() == ScrapePhase::Submitting {
                state.set_phase(ScrapePhase::Polling {
                    job_id,
                    last_status: JobStatus::Queued,
                });
            }
            Vec::new()
        }
        Msg::ScrapeStatusObserved { job_id, status } => {
            if let ScrapePhase::Polling {
                job_id: current,
                last_status,
            } = state.phase_mut()
            {
                if *current == job_id {
                    *last_status = status;
                }
            }
            Vec::new()
        }
        Msg::ScrapeFinished { result } => {
            if !matches!(
                state.phase(),
                ScrapePhase::Submitting | ScrapePhase::Polling { .. }
            ) {
                return (state, Vec::new());
            }
            match result {
                Ok(job) if job.status == JobStatus::Completed => {
                    state.set_status(StatusIndicator::Done);
                    state.set_enabled(Control::CancelButton, false);
                    let (listings_gen, listings) = state.issue_listings();
                    let (trends_gen, trends) = state.issue_trends();
                    state.set_phase(ScrapePhase::Refreshing {
                        listings: Some(listings_gen),
                        trends: Some(trends_gen),
                    });
                    vec![listings, trends]
                }
                Ok(_) | Err(_) => {
                    state.set_status(StatusIndicator::Failed);
                    vec![state.finish_scrape_cycle()]
                }
            }
        }
        Msg::ListingsLoaded { generation, result } => {
            if let Ok(page) = &result {
                if state.is_latest_listings(generation) {
                    let commands = render_listings(state.view_mut(), page);
                    state.push_ui(commands);
                }
            }
            state.settle_listings(generation);
            settle_refresh(&mut state, Some(generation), None)
        }
        Msg::TrendsLoaded { generation, result } => {
            if let Ok(snapshot) = &result {
                if state.is_latest_trends(generation) {
                    let commands = render_trends(state.view_mut(), snapshot);
                    state.push_ui(commands);
                }
            }
            settle_refresh(&mut state, None, Some(generation))
        }
        Msg::StatusClearElapsed { token } => {
            state.clear_status_if_current(token);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Marks refresh fetches as settled; the cycle ends once both have.
fn settle_refresh(
    state: &mut AppState,
    listings_done: Option<u64>,
    trends_done: Option<u64>,
) -> Vec<Effect> {
    let ScrapePhase::Refreshing { listings, trends } = state.phase_mut() else {
        return Vec::new();
    };
    if listings_done.is_some() && *listings == listings_done {
        *listings = None;
    }
    if trends_done.is_some() && *trends == trends_done {
        *trends = None;
    }
    if listings.is_none() && trends.is_none() {
        vec![state.finish_scrape_cycle()]
    } else {
        Vec::new()
    }
}
