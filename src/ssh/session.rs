//! SSH Session management

use async_trait::async_trait;
use parking_lot::RwLock;
use russh::client::Handle;
use tracing::{debug, info};

use super::client::ClientHandler;
use super::error::SshError;
use super::exec::{CommandOutput, CommandRunner};
use super::handle_owner::{spawn_handle_owner_task, HandleController};
use crate::remote::command::RemoteCommand;
use crate::remote::search::{SearchRequest, SearchResult};
use crate::remote::types::FileEntry;
use crate::remote::{content, listing, search};

/// One authenticated connection to one `(host, port, user)`
///
/// Safe to share between tasks: each operation clones the controller and
/// opens its own channel. After `close()` every operation fails with a
/// `Command` error.
pub struct SshSession {
    id: String,
    target: String,
    controller: RwLock<Option<HandleController>>,
}

impl SshSession {
    /// Spawn the Handle Owner Task for an authenticated handle
    pub fn start(handle: Handle<ClientHandler>, target: String) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        info!("Starting session {} for {}", id, target);
        let controller = spawn_handle_owner_task(handle, id.clone());
        Self::from_controller(id, target, controller)
    }

    /// Build a session around an existing controller
    pub fn from_controller(id: String, target: String, controller: HandleController) -> Self {
        Self {
            id,
            target,
            controller: RwLock::new(Some(controller)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `host:port` this session is connected to
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_closed(&self) -> bool {
        self.controller
            .read()
            .as_ref()
            .map_or(true, |c| !c.is_connected())
    }

    fn controller(&self) -> Option<HandleController> {
        self.controller.read().clone()
    }

    /// Release the connection. Calling it again is a no-op.
    pub async fn close(&self) {
        let controller = self.controller.write().take();
        match controller {
            Some(controller) => {
                info!("Closing session {} ({})", self.id, self.target);
                controller.disconnect().await;
            }
            None => debug!("Session {} already closed", self.id),
        }
    }

    /// List the immediate children of `path`
    pub async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SshError> {
        listing::list_dir(self, path).await
    }

    /// Fetch `path`, decompressing archived logs
    pub async fn read_file(&self, path: &str) -> Result<Vec<u8>, SshError> {
        content::read_file(self, path).await
    }

    /// Search log files under the request's roots
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SshError> {
        search::search(self, request).await
    }
}

#[async_trait]
impl CommandRunner for SshSession {
    async fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, SshError> {
        let controller = self
            .controller()
            .ok_or_else(|| SshError::channel(command.render(), "session closed"))?;
        controller.run(command).await
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.get_mut().take() {
            debug!("Dropping open session {}", self.id);
            controller.try_disconnect();
        }
    }
}
