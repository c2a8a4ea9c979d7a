#![deny(missing_docs)]
//! Shared logging utilities for the JobPulse workspace.
//!
//! Every crate that logs goes through the `pulse_*` macros so the records
//! share one target and can be filtered as a group.

use log::LevelFilter;

/// Log target used by all `pulse_*` macros.
pub const TARGET: &str = "jobpulse";

/// Parses a level name from configuration (`"info"`, `"DEBUG"`, `"off"`, ...).
pub fn level_from_name(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Logs a trace-level message under the JobPulse target.
#[macro_export]
macro_rules! pulse_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the JobPulse target.
#[macro_export]
macro_rules! pulse_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the JobPulse target.
#[macro_export]
macro_rules! pulse_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the JobPulse target.
#[macro_export]
macro_rules! pulse_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the JobPulse target.
#[macro_export]
macro_rules! pulse_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test: a second initialization is ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names_case_insensitively() {
        assert_eq!(level_from_name("info"), Some(LevelFilter::Info));
        assert_eq!(level_from_name(" DEBUG "), Some(LevelFilter::Debug));
        assert_eq!(level_from_name("off"), Some(LevelFilter::Off));
        assert_eq!(level_from_name("loud"), None);
    }

    #[test]
    fn macros_expand_after_init() {
        initialize_for_tests();
        initialize_for_tests();
        pulse_debug!("debug {}", 1);
        pulse_info!("info {}", 2);
    }
}
