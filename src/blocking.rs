//! Blocking session API
//!
//! The engine is async underneath. `Session` owns a small multi-thread
//! tokio runtime and exposes every operation as a plain blocking call, so a
//! front end can run them on its own worker threads. `Session` is
//! `Send + Sync`: concurrent calls from several threads each open their own
//! channel.
//!
//! Do not call these methods from inside an async runtime; use
//! [`SshSession`] there instead.

use tokio::runtime::Runtime;
use tracing::info;

use crate::remote::search::{SearchRequest, SearchResult};
use crate::remote::types::FileEntry;
use crate::ssh::{ConnectConfig, SshClient, SshError, SshSession};

const RUNTIME_WORKERS: usize = 2;

pub struct Session {
    // Field order matters: the session must drop (and disconnect) before the runtime
    inner: SshSession,
    runtime: Runtime,
}

impl Session {
    /// Connect with discrete parameters. Empty `password`/`key_path` mean
    /// "not provided"; if both are empty this fails with `Auth` before any
    /// socket is opened.
    pub fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        key_path: &str,
    ) -> Result<Self, SshError> {
        let config = ConnectConfig::new(host, port, user)
            .with_password(password)
            .with_key(key_path, None);
        Self::open(config)
    }

    /// Connect using a full configuration
    pub fn open(config: ConnectConfig) -> Result<Self, SshError> {
        // Fail fast on missing credentials without paying for a runtime
        config.auth_methods()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKERS)
            .thread_name("logsearch-ssh")
            .enable_all()
            .build()
            .map_err(|e| SshError::Network(format!("failed to start I/O runtime: {}", e)))?;

        let inner = runtime.block_on(SshClient::new(config).connect())?;
        info!("Connected to {} (session {})", inner.target(), inner.id());

        Ok(Self { inner, runtime })
    }

    /// Release the connection. Safe to call repeatedly.
    pub fn close(&self) {
        self.runtime.block_on(self.inner.close());
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// List the immediate children of `path` (unsorted)
    pub fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SshError> {
        self.runtime.block_on(self.inner.list_dir(path))
    }

    /// Read `path`, decompressing `.gz` archives
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>, SshError> {
        self.runtime.block_on(self.inner.read_file(path))
    }

    /// Search `paths` for `pattern`
    pub fn search<I, S>(&self, paths: I, pattern: &str) -> Result<SearchResult, SshError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = SearchRequest::new(paths, pattern)?;
        self.search_request(&request)
    }

    pub fn search_request(&self, request: &SearchRequest) -> Result<SearchResult, SshError> {
        self.runtime.block_on(self.inner.search(request))
    }

    /// The async session underneath
    pub fn as_async(&self) -> &SshSession {
        &self.inner
    }
}
