use crate::format::format_short_datetime;
use crate::model::TrendSnapshot;
use crate::ui::{
    ChartKind, ChartOptions, ChartSlot, ChartSpec, Control, Dataset, IndexAxis, UiCommand,
};

use super::ViewState;

pub const TICK_COLOR: &str = "#94a3b8";
pub const GRID_COLOR: &str = "#1e293b";

/// Rebuilds all four charts from `snapshot` and updates the summary labels.
///
/// Charts are never updated in place: the previous instance in each slot is
/// destroyed before its replacement is created.
pub fn render_trends(view: &mut ViewState, snapshot: &TrendSnapshot) -> Vec<UiCommand> {
    let mut out = Vec::with_capacity(12);

    for slot in ChartSlot::ALL {
        let spec = chart_for(slot, snapshot);
        view.replace_chart(slot, spec, &mut out);
    }

    out.push(UiCommand::SetText {
        control: Control::SourceCountLabel,
        text: snapshot.sources_breakdown.len().to_string(),
    });

    if let Some(latest) = snapshot.scrape_history.first() {
        out.push(UiCommand::SetText {
            control: Control::LatestScrapeLabel,
            text: format_short_datetime(&latest.date),
        });
    }

    out
}

fn chart_for(slot: ChartSlot, snapshot: &TrendSnapshot) -> ChartSpec {
    match slot {
        ChartSlot::TopTags => bar_chart(
            IndexAxis::Y,
            "Listings",
            snapshot
                .top_tags
                .iter()
                .map(|t| (t.tag.clone(), count(t.count))),
        ),
        ChartSlot::SalaryDistribution => bar_chart(
            IndexAxis::X,
            "Listings",
            snapshot
                .salary_distribution
                .iter()
                .map(|b| (b.range.clone(), count(b.count))),
        ),
        ChartSlot::TopCompanies => bar_chart(
            IndexAxis::Y,
            "Listings",
            snapshot
                .top_companies
                .iter()
                .map(|c| (c.company.clone(), count(c.count))),
        ),
        ChartSlot::ScrapeHistory => history_chart(snapshot),
    }
}

fn bar_chart(
    index_axis: IndexAxis,
    label: &str,
    points: impl Iterator<Item = (String, i64)>,
) -> ChartSpec {
    let (labels, data): (Vec<_>, Vec<_>) = points.unzip();
    ChartSpec {
        kind: ChartKind::Bar,
        labels,
        datasets: vec![Dataset {
            label: label.to_string(),
            data,
            fill: false,
        }],
        options: shared_options(index_axis),
    }
}

/// Added/removed over time. The feed is newest-first, the axis oldest-first.
fn history_chart(snapshot: &TrendSnapshot) -> ChartSpec {
    let chronological: Vec<_> = snapshot.scrape_history.iter().rev().collect();

    ChartSpec {
        kind: ChartKind::Line,
        labels: chronological
            .iter()
            .map(|entry| format_short_datetime(&entry.date))
            .collect(),
        datasets: vec![
            Dataset {
                label: "Added".to_string(),
                data: chronological
                    .iter()
                    .map(|entry| entry.added.unwrap_or(0))
                    .collect(),
                fill: true,
            },
            Dataset {
                label: "Removed".to_string(),
                data: chronological
                    .iter()
                    .map(|entry| entry.removed.unwrap_or(0))
                    .collect(),
                fill: true,
            },
        ],
        options: ChartOptions {
            legend: true,
            ..shared_options(IndexAxis::X)
        },
    }
}

fn shared_options(index_axis: IndexAxis) -> ChartOptions {
    ChartOptions {
        index_axis,
        legend: false,
        tick_color: TICK_COLOR,
        grid_color: GRID_COLOR,
    }
}

fn count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
