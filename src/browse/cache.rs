//! Directory cache (caller-owned)
//!
//! Remembers the first successful listing of each remote path. A cached
//! listing is never refreshed on its own; it goes stale if the remote
//! directory changes and is dropped only by `invalidate`/`clear`.
//! Concurrent writers race; the last insert of a *new* path wins.

use std::collections::HashMap;

use tracing::debug;

use super::path::{file_name, normalize_remote_path, parent_path, same_path};
use crate::remote::types::FileEntry;
use crate::ssh::SshError;

#[derive(Debug, Default, Clone)]
pub struct DirectoryCache {
    listings: HashMap<String, Vec<FileEntry>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &str) -> String {
        normalize_remote_path(path).to_string()
    }

    pub fn get(&self, path: &str) -> Option<&[FileEntry]> {
        self.listings.get(&Self::key(path)).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.listings.contains_key(&Self::key(path))
    }

    /// Store a listing unless one is already cached. Returns whether it was stored.
    pub fn insert(&mut self, path: &str, entries: Vec<FileEntry>) -> bool {
        let key = Self::key(path);
        if self.listings.contains_key(&key) {
            return false;
        }
        self.listings.insert(key, entries);
        true
    }

    /// Drop one path's listing. Returns whether anything was cached.
    pub fn invalidate(&mut self, path: &str) -> bool {
        self.listings.remove(&Self::key(path)).is_some()
    }

    /// Drop everything (e.g. on navigation reset)
    pub fn clear(&mut self) {
        self.listings.clear();
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Cached listing for `path`, fetching and storing it on a miss.
    ///
    /// Failed fetches are not cached.
    pub fn list_with<F>(&mut self, path: &str, fetch: F) -> Result<&[FileEntry], SshError>
    where
        F: FnOnce(&str) -> Result<Vec<FileEntry>, SshError>,
    {
        let key = Self::key(path);
        if self.listings.contains_key(&key) {
            debug!("Using cached entries for {}", key);
        } else {
            let entries = fetch(&key)?;
            debug!("Caching {} entries for {}", entries.len(), key);
            self.listings.insert(key.clone(), entries);
        }
        Ok(self.listings[&key].as_slice())
    }

    /// The entry for `path` inside its parent's cached listing
    pub fn lookup_entry(&self, path: &str) -> Option<&FileEntry> {
        let parent = parent_path(path)?;
        let name = file_name(path);
        self.get(&parent)?.iter().find(|entry| entry.name == name)
    }
}

/// How `is_directory` reached its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Parent's cached listing named the entry
    Cached,
    /// Path is the browsing root
    Root,
    /// Listing `path` was attempted
    Probed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryCheck {
    pub is_dir: bool,
    pub resolved_by: Resolution,
}

/// Decide whether `path` is a directory.
///
/// 1. The parent's cached listing, when it names the entry.
/// 2. The browsing `root` is always a directory.
/// 3. Otherwise list `path` with `probe`; success means directory.
pub fn is_directory<F>(cache: &DirectoryCache, root: &str, path: &str, probe: F) -> DirectoryCheck
where
    F: FnOnce(&str) -> Result<Vec<FileEntry>, SshError>,
{
    if let Some(entry) = cache.lookup_entry(path) {
        return DirectoryCheck {
            is_dir: entry.is_dir,
            resolved_by: Resolution::Cached,
        };
    }

    if same_path(path, root) {
        return DirectoryCheck {
            is_dir: true,
            resolved_by: Resolution::Root,
        };
    }

    let is_dir = probe(path).is_ok();
    debug!("Probed {}: directory={}", path, is_dir);
    DirectoryCheck {
        is_dir,
        resolved_by: Resolution::Probed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn app_listing() -> Vec<FileEntry> {
        vec![FileEntry::file("a.log", 120), FileEntry::dir("archive", 4096)]
    }

    #[test]
    fn test_insert_keeps_first_listing() {
        let mut cache = DirectoryCache::new();
        assert!(cache.insert("/var/log/app", app_listing()));
        assert!(!cache.insert("/var/log/app/", vec![]));
        assert_eq!(cache.get("/var/log/app").unwrap().len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_list_with_fetches_once() {
        let mut cache = DirectoryCache::new();
        let calls = Cell::new(0);
        let fetch = |_: &str| {
            calls.set(calls.get() + 1);
            Ok::<_, SshError>(app_listing())
        };

        assert_eq!(cache.list_with("/var/log/app", fetch).unwrap().len(), 2);
        assert_eq!(cache.list_with("/var/log/app", fetch).unwrap().len(), 2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_fetch_not_cached() {
        let mut cache = DirectoryCache::new();
        let result = cache.list_with("/var/log/locked", |p| {
            Err(SshError::channel(format!("ls {}", p), "permission denied"))
        });
        assert!(result.is_err());
        assert!(!cache.contains("/var/log/locked"));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = DirectoryCache::new();
        cache.insert("/var/log/app", app_listing());
        cache.insert("/var/log", vec![FileEntry::dir("app", 4096)]);

        assert!(cache.invalidate("/var/log/app"));
        assert!(!cache.invalidate("/var/log/app"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_is_directory_prefers_cached_parent() {
        let mut cache = DirectoryCache::new();
        cache.insert("/var/log/app", app_listing());

        let check = is_directory(&cache, "/var/log/app", "/var/log/app/archive", |_| {
            panic!("cache hit must not probe")
        });
        assert_eq!(
            check,
            DirectoryCheck {
                is_dir: true,
                resolved_by: Resolution::Cached
            }
        );

        let check = is_directory(&cache, "/var/log/app", "/var/log/app/a.log", |_| {
            panic!("cache hit must not probe")
        });
        assert!(!check.is_dir);
    }

    #[test]
    fn test_is_directory_root_without_probe() {
        let cache = DirectoryCache::new();
        let check = is_directory(&cache, "/var/log/app", "/var/log/app/", |_| {
            panic!("root must not probe")
        });
        assert_eq!(check.resolved_by, Resolution::Root);
        assert!(check.is_dir);
    }

    #[test]
    fn test_is_directory_falls_back_to_probe() {
        let cache = DirectoryCache::new();
        let check = is_directory(&cache, "/var/log", "/srv/logs", |_| Ok(vec![]));
        assert_eq!(
            check,
            DirectoryCheck {
                is_dir: true,
                resolved_by: Resolution::Probed
            }
        );

        let check = is_directory(&cache, "/var/log", "/srv/missing", |p| {
            Err(SshError::channel(p, "No such file or directory"))
        });
        assert!(!check.is_dir);
    }
}
