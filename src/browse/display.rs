//! Presentation helpers
//!
//! The engine returns listings unsorted and file content untruncated. These
//! helpers apply the display policy a front end is expected to use.

use std::cmp::Ordering;

use crate::remote::search::SearchResult;
use crate::remote::types::FileEntry;

/// Default number of trailing bytes kept for display (about 100 KB)
pub const DISPLAY_LIMIT: usize = 100_000;

pub const NO_MATCHES_TEXT: &str = "No matches found.";

/// Directories first, then by name
pub fn sort_for_display(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
}

/// Content as text, keeping only the last `max_bytes` bytes.
///
/// When truncated, a marker line is prepended. The cut is moved forward to
/// the next character boundary so no partial UTF-8 sequence is shown.
pub fn tail_for_display(content: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(content);
    if text.len() <= max_bytes {
        return text.into_owned();
    }

    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }

    format!(
        "[Truncated... showing last {}KB]\n{}",
        max_bytes / 1000,
        &text[start..]
    )
}

/// One `path:line` per match, or the no-matches text
pub fn render_search_result(result: &SearchResult) -> String {
    match result {
        SearchResult::NoMatches => NO_MATCHES_TEXT.to_string(),
        SearchResult::Matches(lines) => lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Human-readable size: `512 B`, `1.5 KB`, `3.2 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
