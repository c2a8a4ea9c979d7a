use std::time::Duration;

use crate::ListingQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitScrape { sources: Vec<String> },
    CancelScrape,
    FetchListings { generation: u64, query: ListingQuery },
    FetchTrends { generation: u64 },
    ClearStatusAfter { token: u64, delay: Duration },
}
