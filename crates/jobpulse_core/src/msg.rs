use crate::{FilterInputs, JobStatus, ListingPage, ScrapeJob, TrendSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Dashboard opened; load listings and trends once.
    Startup,
    /// User submitted the filter form.
    FiltersSubmitted(FilterInputs),
    PrevPageClicked,
    NextPageClicked,
    /// User pressed the scrape trigger.
    ScrapeClicked,
    /// User asked to abandon the in-flight scrape.
    CancelScrapeClicked,
    /// Backend accepted the scrape and assigned an id.
    ScrapeSubmitted { job_id: String },
    /// A non-terminal status was observed while polling.
    ScrapeStatusObserved { job_id: String, status: JobStatus },
    /// The scrape left the submit/poll path: a terminal snapshot, or the
    /// reason submission or polling was aborted.
    ScrapeFinished { result: Result<ScrapeJob, String> },
    ListingsLoaded {
        generation: u64,
        result: Result<ListingPage, String>,
    },
    TrendsLoaded {
        generation: u64,
        result: Result<TrendSnapshot, String>,
    },
    /// Display timer for the status badge ran out.
    StatusClearElapsed { token: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
