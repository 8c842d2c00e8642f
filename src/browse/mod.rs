//! Caller-side browsing state and display policy
//!
//! Nothing here is used by the engine itself. Front ends own a
//! `DirectoryCache` per browsing view and pass it in explicitly.

pub mod cache;
pub mod display;
pub mod path;

pub use cache::{is_directory, DirectoryCache, DirectoryCheck, Resolution};
pub use display::{
    format_size, render_search_result, sort_for_display, tail_for_display, DISPLAY_LIMIT,
};
pub use path::{file_name, is_absolute_remote_path, join_remote_path, parent_path};
