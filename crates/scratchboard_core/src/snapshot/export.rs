//! Export bundle naming.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Encoded snapshot ready to be handed to a download/save surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

/// Builds the export file name.
///
/// - Without override: `<timestamp><suffix>`, timestamp rendered with
///   `timestamp_format` (strftime syntax).
/// - With override: the trimmed override, suffixed unless it already ends
///   with `suffix`. A blank override falls back to the timestamp.
pub fn export_file_name<Tz>(
    name_override: Option<&str>,
    now: &DateTime<Tz>,
    timestamp_format: &str,
    suffix: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match name_override.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) if name.ends_with(suffix) => name.to_string(),
        Some(name) => format!("{name}{suffix}"),
        None => format!("{}{suffix}", now.format(timestamp_format)),
    }
}
