//! Directory listing
//!
//! Runs `ls -lA --time-style=+%s` so the date is a single epoch column no
//! matter the remote locale. A line then reads:
//!
//! ```text
//! drwxr-xr-x 2 root root 4096 1700000000 archive
//! -rw-r--r-- 1 app  app   120 1700000123 a.log
//! ```
//!
//! Field 0 carries the type marker, field 4 the size, fields 6.. the name.

use tracing::{debug, warn};

use super::command::RemoteCommand;
use super::types::FileEntry;
use crate::ssh::{CommandRunner, SshError};

/// Minimum number of whitespace-separated fields in an entry line
const MIN_FIELDS: usize = 7;
const SIZE_FIELD: usize = 4;
const NAME_FIELD: usize = 6;
const DIR_MARKER: char = 'd';

/// The listing command for `path`
pub fn listing_command(path: &str) -> RemoteCommand {
    RemoteCommand::new("ls")
        .arg("-lA")
        .arg("--time-style=+%s")
        .arg("--")
        .quoted(path)
}

/// List the immediate children of `path`.
///
/// Order is whatever the remote printed; callers sort for display.
pub async fn list_dir<R>(runner: &R, path: &str) -> Result<Vec<FileEntry>, SshError>
where
    R: CommandRunner + ?Sized,
{
    let command = listing_command(path);
    let output = runner.run(&command).await?;

    if !output.success() {
        let err = output.into_error(&command);
        warn!("Failed to list directory {}: {}", path, err);
        return Err(err);
    }

    let entries = parse_listing(&String::from_utf8_lossy(&output.stdout));
    debug!("Found {} entries in {}", entries.len(), path);
    Ok(entries)
}

/// Parse long-format listing output into entries.
///
/// Blank lines, the `total` line and lines with fewer than seven fields are
/// skipped. An unparsable size becomes 0. `.` and `..` are dropped.
pub fn parse_listing(output: &str) -> Vec<FileEntry> {
    output.lines().filter_map(parse_entry_line).collect()
}

fn parse_entry_line(line: &str) -> Option<FileEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("total") {
        return None;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    // Runs of spaces inside a name collapse to one
    let name = fields[NAME_FIELD..].join(" ");
    if name == "." || name == ".." {
        return None;
    }

    Some(FileEntry {
        name,
        is_dir: fields[0].starts_with(DIR_MARKER),
        size: fields[SIZE_FIELD].parse().unwrap_or(0),
    })
}
