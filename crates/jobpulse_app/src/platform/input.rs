use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use jobpulse_core::{FilterInputs, Msg};

use super::app::AppEvent;

pub const DEFAULT_SNAPSHOT: &str = "jobpulse.html";

pub const HELP: &str = "\
commands:
  scrape                  start a scrape of the configured sources
  cancel                  stop waiting for the running scrape
  next | prev             move between listing pages
  filter key=value ...    set filters and reload (keys: role, location, salary, source)
  filter                  resubmit the current filters
  clear                   drop all filters and reload
  snapshot [path]         write the table and charts as HTML (default jobpulse.html)
  help                    show this text
  quit";

/// What one line typed by the user asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    Msg(Msg),
    Snapshot(PathBuf),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Reads stdin line by line until it closes.
pub fn spawn_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if events.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}

/// Parses a command line. Filter edits start from `current` so that unnamed
/// fields keep their value.
pub fn parse_command(line: &str, current: &FilterInputs) -> AppInput {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => AppInput::Empty,
        "scrape" => AppInput::Msg(Msg::ScrapeClicked),
        "cancel" => AppInput::Msg(Msg::CancelScrapeClicked),
        "next" | "n" => AppInput::Msg(Msg::NextPageClicked),
        "prev" | "p" => AppInput::Msg(Msg::PrevPageClicked),
        "clear" => AppInput::Msg(Msg::FiltersSubmitted(FilterInputs::default())),
        "filter" | "f" => match parse_filters(rest, current.clone()) {
            Ok(filters) => AppInput::Msg(Msg::FiltersSubmitted(filters)),
            Err(reason) => AppInput::Invalid(reason),
        },
        "snapshot" => AppInput::Snapshot(PathBuf::from(if rest.is_empty() {
            DEFAULT_SNAPSHOT
        } else {
            rest
        })),
        "help" | "?" => AppInput::Help,
        "quit" | "q" | "exit" => AppInput::Quit,
        other => AppInput::Invalid(format!("unknown command `{other}`, try `help`")),
    }
}

/// `role=senior rust engineer location=berlin`: words without `=` extend
/// the value of the preceding key.
fn parse_filters(text: &str, mut filters: FilterInputs) -> Result<FilterInputs, String> {
    let mut current: Option<&mut String> = None;
    for word in text.split_whitespace() {
        if let Some((key, value)) = word.split_once('=') {
            let field = match key.to_ascii_lowercase().as_str() {
                "role" => &mut filters.role,
                "location" => &mut filters.location,
                "salary" | "salary_min" => &mut filters.salary_min,
                "source" => &mut filters.source,
                other => return Err(format!("unknown filter `{other}`")),
            };
            field.clear();
            field.push_str(value);
            current = Some(field);
        } else {
            match current.as_deref_mut() {
                Some(field) => {
                    if !field.is_empty() {
                        field.push(' ');
                    }
                    field.push_str(word);
                }
                None => return Err(format!("expected key=value, got `{word}`")),
            }
        }
    }
    Ok(filters)
}
