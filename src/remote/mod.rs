//! Remote log access operations
//!
//! Each operation turns one request into one remote shell command, runs it
//! on its own channel through a `CommandRunner`, and parses the text that
//! comes back.

pub mod command;
pub mod content;
pub mod listing;
pub mod search;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use command::{escape_pattern, shell_quote, RemoteCommand};
pub use content::{decompress_gzip, is_archive, read_file, ARCHIVE_SUFFIX};
pub use listing::{list_dir, parse_listing};
pub use search::{search, MatchLine, SearchRequest, SearchResult, LOG_FILE_PATTERNS};
pub use types::FileEntry;
