use crate::format::{format_count, format_salary, safe_href, strip_control, PLACEHOLDER};
use crate::model::{Listing, ListingPage};
use crate::query::{max_page, PAGE_SIZE};
use crate::ui::{Control, ListingRow, UiCommand};

use super::ViewState;

/// Tags shown per row; the rest are dropped from the display only.
pub const MAX_TAGS: usize = 4;

/// Replaces the listing table and refreshes pagination from `page.total`.
pub fn render_listings(view: &mut ViewState, page: &ListingPage) -> Vec<UiCommand> {
    view.set_page(page.page);
    view.total = Some(page.total);

    let rows = page.listings.iter().map(listing_row).collect();
    let last_page = max_page(page.total, PAGE_SIZE);
    let current = view.page();

    vec![
        UiCommand::PopulateListings { rows },
        UiCommand::SetText {
            control: Control::PageLabel,
            text: format!("Page {current} of {last_page}"),
        },
        UiCommand::SetControlEnabled {
            control: Control::PrevButton,
            enabled: current > 1,
        },
        UiCommand::SetControlEnabled {
            control: Control::NextButton,
            enabled: current < last_page,
        },
        UiCommand::SetText {
            control: Control::TotalCountLabel,
            text: format_count(page.total),
        },
    ]
}

fn listing_row(listing: &Listing) -> ListingRow {
    let location = listing
        .location
        .as_deref()
        .map(strip_control)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    ListingRow {
        title: strip_control(&listing.title),
        href: listing.url.as_deref().and_then(safe_href),
        company: strip_control(&listing.company),
        location,
        salary: format_salary(
            listing.salary_min,
            listing.salary_max,
            listing.currency.as_deref(),
        ),
        tags: listing
            .tags
            .iter()
            .take(MAX_TAGS)
            .map(|tag| strip_control(tag))
            .collect(),
        source: strip_control(&listing.source),
    }
}
