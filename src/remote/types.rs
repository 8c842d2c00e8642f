//! Remote filesystem data types

use serde::{Deserialize, Serialize};

/// One object directly inside a listed directory, as seen at listing time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name (not full path); may contain spaces
    pub name: String,
    /// Listed with the directory type marker
    pub is_dir: bool,
    /// Size in bytes as reported by the listing; 0 when unparsable
    pub size: u64,
}

impl FileEntry {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size,
        }
    }

    pub fn dir(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            size,
        }
    }
}
