//! Terminal rendition of the dashboard.
//!
//! Applies [`UiCommand`]s in order and keeps the bookkeeping a real page
//! would: which charts are alive and which controls are enabled. The last
//! table and the live charts can be exported as an HTML page.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use chrono::Local;
use jobpulse_core::format::strip_control;
use jobpulse_core::{
    ChartHandle, ChartSlot, ChartSpec, Control, ListingRow, StatusIndicator, UiCommand,
};
use pulse_logging::pulse_warn;

pub struct TerminalSurface<W: Write> {
    out: W,
    charts: BTreeMap<ChartHandle, (ChartSlot, ChartSpec)>,
    disabled: BTreeSet<Control>,
    rows: Vec<ListingRow>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            charts: BTreeMap::new(),
            disabled: BTreeSet::new(),
            rows: Vec::new(),
        }
    }

    pub fn live_charts(&self) -> usize {
        self.charts.len()
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        !self.disabled.contains(&control)
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn apply(&mut self, command: &UiCommand) -> io::Result<()> {
        match command {
            UiCommand::SetControlEnabled { control, enabled } => {
                if *enabled {
                    self.disabled.remove(control);
                } else {
                    self.disabled.insert(*control);
                }
                if matches!(control, Control::ScrapeButton | Control::CancelButton) {
                    self.write_controls()?;
                }
            }
            UiCommand::SetText { control, text } => {
                writeln!(self.out, "{}: {}", control_label(*control), strip_control(text))?;
            }
            UiCommand::SetStatus { status } => self.write_status(*status)?,
            UiCommand::PopulateListings { rows } => {
                self.write_rows(rows)?;
                self.rows = rows.clone();
            }
            UiCommand::DestroyChart { handle } => {
                if self.charts.remove(handle).is_none() {
                    pulse_warn!("Destroy for unknown chart {:?}", handle);
                }
            }
            UiCommand::CreateChart { handle, slot, spec } => {
                if let Some((old, _)) = self.charts.iter().find(|(_, (s, _))| s == slot) {
                    pulse_warn!("Chart {:?} still alive in slot {:?}", old, slot);
                }
                self.write_chart(*handle, *slot, spec)?;
                self.charts.insert(*handle, (*slot, spec.clone()));
            }
        }
        self.out.flush()
    }

    fn write_controls(&mut self) -> io::Result<()> {
        let scrape = if self.is_enabled(Control::ScrapeButton) {
            "available"
        } else {
            "busy"
        };
        let cancel = if self.is_enabled(Control::CancelButton) {
            " (cancel available)"
        } else {
            ""
        };
        writeln!(self.out, "scrape: {scrape}{cancel}")
    }

    fn write_status(&mut self, status: StatusIndicator) -> io::Result<()> {
        let stamp = Local::now().format("%H:%M:%S");
        match status {
            StatusIndicator::Hidden => writeln!(self.out, "[{stamp}] status cleared"),
            shown => writeln!(self.out, "[{stamp}] status: {}", shown.label()),
        }
    }

    fn write_rows(&mut self, rows: &[ListingRow]) -> io::Result<()> {
        writeln!(self.out, "--- listings ({}) ---", rows.len())?;
        for row in rows {
            let tags: Vec<String> = row.tags.iter().map(|tag| strip_control(tag)).collect();
            writeln!(
                self.out,
                "{} | {} | {} | {} | {} | {}",
                strip_control(&row.title),
                strip_control(&row.company),
                strip_control(&row.location),
                strip_control(&row.salary),
                tags.join(", "),
                strip_control(&row.source)
            )?;
            if let Some(href) = &row.href {
                writeln!(self.out, "    {}", strip_control(href))?;
            }
        }
        Ok(())
    }

    fn write_chart(&mut self, handle: ChartHandle, slot: ChartSlot, spec: &ChartSpec) -> io::Result<()> {
        writeln!(self.out, "--- {} (chart #{}) ---", slot.title(), handle.0)?;
        for dataset in &spec.datasets {
            let points: Vec<String> = spec
                .labels
                .iter()
                .zip(&dataset.data)
                .map(|(label, value)| format!("{}={value}", strip_control(label)))
                .collect();
            writeln!(
                self.out,
                "{}: {}",
                strip_control(&dataset.label),
                points.join(", ")
            )?;
        }
        Ok(())
    }

    /// Writes the last listing table and every live chart as a standalone
    /// HTML page. Chart configs are embedded as JSON for a chart library.
    pub fn write_snapshot(&self, mut page: impl Write) -> io::Result<()> {
        writeln!(page, "<!DOCTYPE html>")?;
        writeln!(page, "<html><head><meta charset=\"utf-8\"><title>JobPulse</title></head><body>")?;
        writeln!(
            page,
            "<table><thead><tr><th>Title</th><th>Company</th><th>Location</th><th>Salary</th><th>Tags</th><th>Source</th></tr></thead><tbody>"
        )?;
        for row in &self.rows {
            writeln!(page, "{}", row.to_html())?;
        }
        writeln!(page, "</tbody></table>")?;
        for (handle, (slot, spec)) in &self.charts {
            let config = serde_json::to_string(spec).map_err(io::Error::other)?;
            writeln!(page, "<h2>{}</h2>", slot.title())?;
            writeln!(
                page,
                "<script type=\"application/json\" id=\"chart-{}\">{}</script>",
                handle.0,
                // Keeps label text from closing the script element.
                config.replace("</", "<\\/")
            )?;
        }
        writeln!(page, "</body></html>")?;
        page.flush()
    }
}

fn control_label(control: Control) -> &'static str {
    match control {
        Control::ScrapeButton => "scrape",
        Control::CancelButton => "cancel",
        Control::PrevButton => "prev",
        Control::NextButton => "next",
        Control::PageLabel => "page",
        Control::TotalCountLabel => "total listings",
        Control::SourceCountLabel => "sources",
        Control::LatestScrapeLabel => "latest scrape",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobpulse_core::{
        render_listings, render_trends, Listing, ListingPage, ScrapeHistoryEntry, TagCount,
        TrendSnapshot, ViewState,
    };

    fn snapshot() -> TrendSnapshot {
        TrendSnapshot {
            top_tags: vec![TagCount {
                tag: "rust".to_string(),
                count: 9,
            }],
            scrape_history: vec![ScrapeHistoryEntry {
                date: "2024-03-03T10:00:00".to_string(),
                source: Some("remoteok".to_string()),
                added: Some(3),
                removed: Some(1),
                total: Some(40),
                retained: Some(37),
                quality_score: Some(90.0),
            }],
            ..TrendSnapshot::default()
        }
    }

    #[test]
    fn repeated_trend_renders_keep_four_charts() {
        let mut view = ViewState::new();
        let mut surface = TerminalSurface::new(Vec::new());

        for _ in 0..2 {
            for command in render_trends(&mut view, &snapshot()) {
                surface.apply(&command).unwrap();
            }
        }

        assert_eq!(surface.live_charts(), 4);
        let text = String::from_utf8(surface.out).unwrap();
        assert!(text.contains("Top tags"));
        assert!(text.contains("rust=9"));
    }

    #[test]
    fn disabled_controls_are_tracked() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface
            .apply(&UiCommand::SetControlEnabled {
                control: Control::ScrapeButton,
                enabled: false,
            })
            .unwrap();
        assert!(!surface.is_enabled(Control::ScrapeButton));
        assert!(surface.is_enabled(Control::NextButton));
        let text = String::from_utf8(surface.out).unwrap();
        assert!(text.contains("scrape: busy"));
    }

    fn hostile_row() -> ListingRow {
        ListingRow {
            title: "\u{1b}]0;owned\u{7}\u{1b}[2JDev".to_string(),
            href: None,
            company: "AT&T\u{7}".to_string(),
            location: "-".to_string(),
            salary: "-".to_string(),
            tags: vec!["ru\u{1b}[0mst".to_string()],
            source: "remoteok".to_string(),
        }
    }

    #[test]
    fn control_sequences_never_reach_the_terminal() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface
            .apply(&UiCommand::PopulateListings {
                rows: vec![hostile_row()],
            })
            .unwrap();
        surface
            .apply(&UiCommand::SetText {
                control: Control::LatestScrapeLabel,
                text: "not a date\u{1b}[5m".to_string(),
            })
            .unwrap();

        let text = String::from_utf8(surface.out).unwrap();
        assert!(!text.contains('\u{1b}'));
        assert!(!text.contains('\u{7}'));
        assert!(text.contains("]0;owned[2JDev | AT&T | - | - | ru[0mst | remoteok"));
    }

    #[test]
    fn snapshot_holds_escaped_rows_and_live_charts() {
        let mut view = ViewState::new();
        let mut surface = TerminalSurface::new(Vec::new());
        let page = ListingPage {
            listings: vec![Listing {
                title: "<b>Rust</b> Dev".to_string(),
                company: "AT&T".to_string(),
                url: Some("https://example.com/1".to_string()),
                ..Listing::default()
            }],
            total: 1,
            page: 1,
            limit: None,
        };
        let commands = render_listings(&mut view, &page)
            .into_iter()
            .chain(render_trends(&mut view, &snapshot()))
            .chain(render_trends(&mut view, &snapshot()));
        for command in commands {
            surface.apply(&command).unwrap();
        }

        let mut html = Vec::new();
        surface.write_snapshot(&mut html).unwrap();
        let html = String::from_utf8(html).unwrap();

        assert!(html.contains("&lt;b&gt;Rust"));
        assert!(html.contains("AT&amp;T"));
        assert!(!html.contains("<b>Rust"));
        assert_eq!(html.matches("<script type=\"application/json\"").count(), 4);
        assert!(html.contains("\"type\":\"line\""));
    }
}
