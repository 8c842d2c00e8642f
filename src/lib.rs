//! logsearch: browse and search log files on a remote host over SSH.
//!
//! No agent runs on the remote side. Every operation becomes a standard
//! POSIX command (`ls`, `cat`, `find` + `zgrep`) on its own exec channel,
//! and the text output is parsed into structured results.
//!
//! ```no_run
//! use logsearch::browse::{sort_for_display, tail_for_display, DISPLAY_LIMIT};
//! use logsearch::Session;
//!
//! # fn main() -> Result<(), logsearch::SshError> {
//! let session = Session::connect("logs.internal", 22, "ops", "", "/home/ops/.ssh/id_ed25519")?;
//!
//! let mut entries = session.list_dir("/var/log/app")?;
//! sort_for_display(&mut entries);
//!
//! let content = session.read_file("/var/log/app/old.log.gz")?;
//! println!("{}", tail_for_display(&content, DISPLAY_LIMIT));
//!
//! let hits = session.search(["/var/log/app"], "ERROR")?;
//! println!("{} matching lines", hits.len());
//!
//! session.close();
//! # Ok(())
//! # }
//! ```
//!
//! Host keys are not verified; see [`ssh`].

pub mod blocking;
pub mod browse;
pub mod config;
pub mod remote;
pub mod ssh;

pub use blocking::Session;
pub use remote::{FileEntry, MatchLine, SearchRequest, SearchResult};
pub use ssh::{ConnectConfig, SshError, SshSession};
