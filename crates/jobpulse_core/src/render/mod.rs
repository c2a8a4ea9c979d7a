//! Listing and trend renderers. Both take the view state explicitly so they
//! can be exercised without a controller.
mod listings;
mod trends;

use std::collections::BTreeMap;

pub use listings::{render_listings, MAX_TAGS};
pub use trends::{render_trends, GRID_COLOR, TICK_COLOR};

use crate::ui::{ChartHandle, ChartSlot, ChartSpec, UiCommand};

/// Mutable view state for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    page: u32,
    total: Option<u64>,
    charts: BTreeMap<ChartSlot, ChartHandle>,
    next_handle: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            total: None,
            charts: BTreeMap::new(),
            next_handle: 1,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Total from the last rendered listing page, if any.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn chart(&self, slot: ChartSlot) -> Option<ChartHandle> {
        self.charts.get(&slot).copied()
    }

    pub fn live_chart_count(&self) -> usize {
        self.charts.len()
    }

    /// Destroys whatever occupies `slot`, then creates a chart from `spec`.
    fn replace_chart(&mut self, slot: ChartSlot, spec: ChartSpec, out: &mut Vec<UiCommand>) {
        if let Some(previous) = self.charts.remove(&slot) {
            out.push(UiCommand::DestroyChart { handle: previous });
        }
        let handle = ChartHandle(self.next_handle);
        self.next_handle += 1;
        self.charts.insert(slot, handle);
        out.push(UiCommand::CreateChart { handle, slot, spec });
    }
}
