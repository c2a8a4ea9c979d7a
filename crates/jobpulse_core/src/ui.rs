//! Surface-independent UI vocabulary produced by the renderers.
use serde::Serialize;

use crate::format::escape_html;

/// Controls the dashboard addresses by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    ScrapeButton,
    CancelButton,
    PrevButton,
    NextButton,
    PageLabel,
    TotalCountLabel,
    SourceCountLabel,
    LatestScrapeLabel,
}

/// Transient scrape badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    #[default]
    Hidden,
    Running,
    Done,
    Failed,
}

impl StatusIndicator {
    pub fn label(self) -> &'static str {
        match self {
            StatusIndicator::Hidden => "",
            StatusIndicator::Running => "Scraping...",
            StatusIndicator::Done => "Done",
            StatusIndicator::Failed => "Failed",
        }
    }
}

/// The four chart positions on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartSlot {
    TopTags,
    SalaryDistribution,
    TopCompanies,
    ScrapeHistory,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::TopTags,
        ChartSlot::SalaryDistribution,
        ChartSlot::TopCompanies,
        ChartSlot::ScrapeHistory,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartSlot::TopTags => "Top tags",
            ChartSlot::SalaryDistribution => "Salary distribution",
            ChartSlot::TopCompanies => "Top companies",
            ChartSlot::ScrapeHistory => "Scrape history",
        }
    }
}

/// Identity of one live chart instance. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Which axis carries the categories; `Y` gives horizontal bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAxis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<i64>,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub index_axis: IndexAxis,
    pub legend: bool,
    pub tick_color: &'static str,
    pub grid_color: &'static str,
}

/// Full description of a chart, serializable into a chart-library config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

/// One table row as display text. Control characters are already removed;
/// markup is not escaped until [`ListingRow::to_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub title: String,
    /// Only http(s) links survive rendering.
    pub href: Option<String>,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub tags: Vec<String>,
    pub source: String,
}

impl ListingRow {
    /// Page-facing `<tr>` for this row. Every field is escaped here.
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let title = match &self.href {
            Some(href) => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{title}</a>",
                escape_html(href)
            ),
            None => title,
        };
        let tags: String = self
            .tags
            .iter()
            .map(|tag| format!("<span class=\"tag\">{}</span>", escape_html(tag)))
            .collect();
        format!(
            "<tr><td>{title}</td><td>{}</td><td>{}</td><td>{}</td><td>{tags}</td><td>{}</td></tr>",
            escape_html(&self.company),
            escape_html(&self.location),
            escape_html(&self.salary),
            escape_html(&self.source)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SetControlEnabled { control: Control, enabled: bool },
    SetText { control: Control, text: String },
    SetStatus { status: StatusIndicator },
    PopulateListings { rows: Vec<ListingRow> },
    DestroyChart { handle: ChartHandle },
    CreateChart {
        handle: ChartHandle,
        slot: ChartSlot,
        spec: ChartSpec,
    },
}
