//! Display formatting for raw field values. Every function here is pure.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "-";

/// Escapes text for insertion into markup.
pub fn escape_html(raw: &str) -> String {
    v_htmlescape::escape(raw).to_string()
}

/// Drops control characters (ESC, BEL, CR, ...) from scraped text so it can
/// be shown on a terminal as well as in markup.
pub fn strip_control(raw: &str) -> String {
    raw.chars().filter(|ch| !ch.is_control()).collect()
}

/// `120000` -> `120k`. Rounds to the nearest thousand.
pub fn abbreviate_thousands(value: i64) -> String {
    let thousands = (value as f64 / 1000.0).round() as i64;
    format!("{thousands}k")
}

pub fn currency_symbol(code: Option<&str>) -> &'static str {
    match code.map(str::trim) {
        Some(c) if c.eq_ignore_ascii_case("EUR") => "€",
        Some(c) if c.eq_ignore_ascii_case("GBP") => "£",
        _ => "$",
    }
}

/// Formats a salary range for the listing table.
///
/// Bounds that differ once abbreviated render as a range. A single bound, or
/// bounds that abbreviate alike, render as one value; no bounds as
/// [`PLACEHOLDER`].
pub fn format_salary(min: Option<i64>, max: Option<i64>, currency: Option<&str>) -> String {
    let symbol = currency_symbol(currency);
    match (min.map(abbreviate_thousands), max.map(abbreviate_thousands)) {
        (None, None) => PLACEHOLDER.to_string(),
        (Some(lo), Some(hi)) if lo != hi => format!("{symbol}{lo} - {symbol}{hi}"),
        (Some(value), _) | (None, Some(value)) => format!("{symbol}{value}"),
    }
}

/// Groups digits in threes: `1234567` -> `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short human date/time such as `Mar 3, 14:05`.
///
/// Accepts RFC 3339, naive ISO date-times and plain dates. Anything else is
/// returned unchanged.
pub fn format_short_datetime(raw: &str) -> String {
    const OUTPUT: &str = "%b %-d, %H:%M";
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(OUTPUT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format(OUTPUT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map_or_else(
            || raw.to_string(),
            |dt| dt.format(OUTPUT).to_string(),
        );
    }
    raw.to_string()
}

/// Returns the URL only if it is an absolute http(s) link.
pub fn safe_href(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}
