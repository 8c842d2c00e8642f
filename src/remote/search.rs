//! Remote log search
//!
//! One pipeline per request:
//!
//! ```text
//! find '<root>'... -type f ( -name '*.log' -o -name '*.log.gz' ) \
//!     -exec sh -c 'zgrep -H -e "$0" "$@"; [ $? -le 1 ]' "<pattern>" {} +
//! ```
//!
//! find collapses every failing `-exec` batch into its own status 1, so
//! zgrep's "nothing found" (1) and its real failures (2: bad regex,
//! unreadable file, corrupt archive) cannot be told apart from outside.
//! The inline script settles it per batch: status 1 is accepted as no
//! matches, anything higher fails the batch. The pipeline then exits 0
//! when the search ran, whether or not anything matched, and non-zero when
//! a batch or find itself (e.g. a missing root) failed.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::command::RemoteCommand;
use crate::ssh::{CommandRunner, SshError};

/// Name globs of files worth searching: plain and archived logs
pub const LOG_FILE_PATTERNS: &[&str] = &["*.log", "*.log.gz"];

/// Exit status zgrep uses for "ran fine, matched nothing"
pub const NO_MATCHES_EXIT_STATUS: u32 = 1;

/// Per-batch wrapper run by `find -exec`; the pattern arrives as `$0`
fn batch_script() -> String {
    format!(
        "zgrep -H -e \"$0\" \"$@\"; [ $? -le {} ]",
        NO_MATCHES_EXIT_STATUS
    )
}

/// Roots to search and the regular expression to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    paths: BTreeSet<String>,
    pattern: String,
}

impl SearchRequest {
    /// Both the path set and the pattern must be non-empty
    pub fn new<I, S>(paths: I, pattern: impl Into<String>) -> Result<Self, SshError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: BTreeSet<String> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        let pattern = pattern.into();

        if paths.is_empty() {
            return Err(SshError::InvalidRequest(
                "select at least one file or folder to search".to_string(),
            ));
        }
        if pattern.is_empty() {
            return Err(SshError::InvalidRequest(
                "search pattern must not be empty".to_string(),
            ));
        }

        Ok(Self { paths, pattern })
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The find + zgrep pipeline for this request
    pub fn to_command(&self) -> RemoteCommand {
        let mut command = RemoteCommand::new("find");
        for path in &self.paths {
            command = command.quoted(path);
        }

        command = command.arg("-type").arg("f").arg("\\(");
        for (i, glob) in LOG_FILE_PATTERNS.iter().enumerate() {
            if i > 0 {
                command = command.arg("-o");
            }
            command = command.arg("-name").quoted(glob);
        }

        command
            .arg("\\)")
            .arg("-exec")
            .arg("sh")
            .arg("-c")
            .quoted(&batch_script())
            .pattern(&self.pattern)
            .arg("{}")
            .arg("+")
    }
}

/// One matched line, as printed by `zgrep -H`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLine {
    /// File the line came from; `None` if the output line had no prefix
    pub path: Option<String>,
    pub line: String,
}

impl MatchLine {
    /// Split `path:line` at the first colon
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((path, line)) if !path.is_empty() => Self {
                path: Some(path.to_string()),
                line: line.to_string(),
            },
            _ => Self {
                path: None,
                line: raw.to_string(),
            },
        }
    }
}

impl fmt::Display for MatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}", path, self.line),
            None => f.write_str(&self.line),
        }
    }
}

/// Outcome of a search that ran; both variants are successes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchResult {
    Matches(Vec<MatchLine>),
    NoMatches,
}

impl SearchResult {
    fn from_lines(lines: Vec<MatchLine>) -> Self {
        if lines.is_empty() {
            SearchResult::NoMatches
        } else {
            SearchResult::Matches(lines)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchResult::NoMatches)
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn lines(&self) -> &[MatchLine] {
        match self {
            SearchResult::Matches(lines) => lines,
            SearchResult::NoMatches => &[],
        }
    }
}

/// Parse zgrep output, one `MatchLine` per non-empty line
pub fn parse_matches(output: &str) -> Vec<MatchLine> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(MatchLine::parse)
        .collect()
}

/// Run a search request.
///
/// Exit 0 means every batch ran; no printed lines is `NoMatches`. Any other
/// status, or none at all, is a `Command` error carrying find/zgrep's stderr.
pub async fn search<R>(runner: &R, request: &SearchRequest) -> Result<SearchResult, SshError>
where
    R: CommandRunner + ?Sized,
{
    let command = request.to_command();
    info!(
        "Searching {} path(s) for {:?}",
        request.paths.len(),
        request.pattern
    );

    let output = runner.run(&command).await?;

    if !output.success() {
        let err = output.into_error(&command);
        warn!("Search failed: {}", err);
        return Err(err);
    }

    let lines = parse_matches(&String::from_utf8_lossy(&output.stdout));
    debug!("Search finished: matches={}", lines.len());
    if !output.stderr.is_empty() {
        debug!("Search stderr: {}", output.stderr_lossy().trim());
    }
    Ok(SearchResult::from_lines(lines))
}
