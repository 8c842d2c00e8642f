//! Remote path utilities
//!
//! Remote paths always use `/`, whatever the local OS.

/// Check if a remote path is absolute.
pub fn is_absolute_remote_path(path: &str) -> bool {
    path.starts_with('/')
}

/// Join remote path components using `/` separator.
pub fn join_remote_path(base: &str, component: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, component)
    } else {
        format!("{}/{}", base, component)
    }
}

/// Strip trailing slashes, keeping `/` itself
pub fn normalize_remote_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Parent directory of a remote path; `None` for `/` and bare names.
pub fn parent_path(path: &str) -> Option<String> {
    let path = normalize_remote_path(path);
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => None,
    }
}

/// Last component of a remote path (`/` for the root).
pub fn file_name(path: &str) -> &str {
    let path = normalize_remote_path(path);
    if path == "/" {
        return path;
    }
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Compare two remote paths ignoring trailing slashes
pub fn same_path(a: &str, b: &str) -> bool {
    normalize_remote_path(a) == normalize_remote_path(b)
}
