//! End-to-end engine behavior against a scripted remote host.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;

use logsearch::browse::{
    is_directory, render_search_result, sort_for_display, DirectoryCache, Resolution,
};
use logsearch::remote::{self, RemoteCommand, SearchRequest, SearchResult};
use logsearch::ssh::{CommandOutput, CommandRunner};
use logsearch::{FileEntry, Session, SshError};

/// Answers by rendered command line; anything unknown exits 2 like a missing path
#[derive(Default)]
struct FakeHost {
    replies: HashMap<String, CommandOutput>,
    seen: Mutex<Vec<String>>,
}

impl FakeHost {
    fn on(mut self, command: RemoteCommand, exit_status: u32, stdout: impl Into<Vec<u8>>) -> Self {
        self.replies.insert(
            command.render(),
            CommandOutput {
                stdout: stdout.into(),
                stderr: Vec::new(),
                exit_status: Some(exit_status),
            },
        );
        self
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for FakeHost {
    async fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, SshError> {
        let line = command.render();
        self.seen.lock().unwrap().push(line.clone());
        Ok(self.replies.get(&line).cloned().unwrap_or(CommandOutput {
            stdout: Vec::new(),
            stderr: b"No such file or directory\n".to_vec(),
            exit_status: Some(2),
        }))
    }
}

fn ls(path: &str) -> RemoteCommand {
    remote::listing::listing_command(path)
}

fn cat(path: &str) -> RemoteCommand {
    remote::content::read_command(path)
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

const APP_LISTING: &str = "total 12\n\
-rw-r--r-- 1 app app 120 1700000000 a.log\n\
drwxr-xr-x 2 app app 4096 1700000100 archive\n";

fn host() -> FakeHost {
    FakeHost::default()
        .on(ls("/var/log/app"), 0, APP_LISTING)
        .on(ls("/var/log/app/archive"), 0, "total 0\n")
        .on(cat("/var/log/app/old.log.gz"), 0, gzip(b"hello\n"))
        .on(cat("/var/log/app/a.log"), 0, "ERROR boom\n")
}

#[tokio::test]
async fn test_list_dir_parses_entries() {
    let host = host();
    let mut entries = remote::list_dir(&host, "/var/log/app").await.unwrap();
    sort_for_display(&mut entries);
    assert_eq!(
        entries,
        vec![FileEntry::dir("archive", 4096), FileEntry::file("a.log", 120)]
    );
}

#[tokio::test]
async fn test_list_missing_dir_is_command_error() {
    let err = remote::list_dir(&host(), "/var/log/nope").await.unwrap_err();
    assert!(err.is_command());
    assert!(err.to_string().contains("No such file or directory"));
}

#[tokio::test]
async fn test_read_archive_is_decompressed() {
    let host = host();
    let content = remote::read_file(&host, "/var/log/app/old.log.gz").await.unwrap();
    assert_eq!(content, b"hello\n");

    let plain = remote::read_file(&host, "/var/log/app/a.log").await.unwrap();
    assert_eq!(plain, b"ERROR boom\n");
}

#[tokio::test]
async fn test_search_without_matches() {
    let request = SearchRequest::new(["/var/log/app"], "NOPE").unwrap();
    let host = FakeHost::default().on(request.to_command(), 0, "");

    let result = remote::search(&host, &request).await.unwrap();
    assert_eq!(result, SearchResult::NoMatches);
    assert_eq!(render_search_result(&result), "No matches found.");
}

#[tokio::test]
async fn test_search_returns_matching_lines() {
    let request = SearchRequest::new(["/var/log/app"], "ERROR").unwrap();
    let host = FakeHost::default().on(
        request.to_command(),
        0,
        "/var/log/app/a.log:ERROR boom\n/var/log/app/b.log.gz:ERROR again\n",
    );

    let result = remote::search(&host, &request).await.unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.lines()[1].path.as_deref(), Some("/var/log/app/b.log.gz"));
    assert_eq!(result.lines()[1].line, "ERROR again");
}

#[tokio::test]
async fn test_search_failure_is_command_error() {
    let request = SearchRequest::new(["/var/log/nope"], "ERROR").unwrap();
    let host = FakeHost::default().on(request.to_command(), 1, "");

    let err = remote::search(&host, &request).await.unwrap_err();
    assert!(err.is_command());
}

#[test]
fn test_cache_avoids_repeat_listings() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let host = host();
    let list = |path: &str| runtime.block_on(remote::list_dir(&host, path));

    let mut cache = DirectoryCache::new();
    cache.list_with("/var/log/app", list).unwrap();
    cache.list_with("/var/log/app", list).unwrap();
    assert_eq!(host.calls(), 1);

    let check = is_directory(&cache, "/var/log", "/var/log/app/archive", list);
    assert!(check.is_dir);
    assert_eq!(check.resolved_by, Resolution::Cached);
    assert_eq!(host.calls(), 1);

    let check = is_directory(&cache, "/var/log", "/var/log/app/archive/x.log", list);
    assert!(!check.is_dir);
    assert_eq!(check.resolved_by, Resolution::Probed);
    assert_eq!(host.calls(), 2);
}

#[test]
fn test_connect_without_credentials() {
    let err = Session::connect("192.0.2.1", 22, "ops", "", "").err().unwrap();
    assert!(matches!(err, SshError::Auth(_)));
}
