//! Handle Owner Task
//!
//! Only one task owns the `Handle<ClientHandler>`. Every engine operation
//! talks to it through a cloneable `HandleController`, which sends commands
//! over an mpsc channel. This lets any number of callers open command
//! channels concurrently without sharing the `Handle` behind a lock.
//!
//! ```ignore
//! let controller = spawn_handle_owner_task(handle, session_id);
//! let channel = controller.open_session_channel().await?;
//! ```

use russh::client::{Handle, Msg};
use russh::Channel;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::client::ClientHandler;

/// Why a command channel could not be opened
#[derive(Error, Debug)]
pub enum ChannelOpenError {
    #[error("session closed")]
    Disconnected,

    #[error("channel open rejected: {0}")]
    Rejected(String),
}

/// Commands sent to the Handle Owner Task
pub enum HandleCommand {
    /// Open a session channel (one remote command runs on it)
    ChannelOpenSession {
        reply_tx: oneshot::Sender<Result<Channel<Msg>, russh::Error>>,
    },

    /// Disconnect the SSH connection
    Disconnect,
}

/// Controller for sending commands to the Handle Owner Task
///
/// Cloning is cheap (copies the sender). Any holder can open channels or
/// disconnect the whole session.
#[derive(Clone)]
pub struct HandleController {
    cmd_tx: mpsc::Sender<HandleCommand>,
}

impl HandleController {
    /// Wrap a raw sender. Production code uses `spawn_handle_owner_task`.
    pub fn new(cmd_tx: mpsc::Sender<HandleCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Open a session channel
    pub async fn open_session_channel(&self) -> Result<Channel<Msg>, ChannelOpenError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(HandleCommand::ChannelOpenSession { reply_tx })
            .await
            .map_err(|_| ChannelOpenError::Disconnected)?;
        reply_rx
            .await
            .map_err(|_| ChannelOpenError::Disconnected)?
            .map_err(|e| match e {
                russh::Error::Disconnect => ChannelOpenError::Disconnected,
                other => ChannelOpenError::Rejected(other.to_string()),
            })
    }

    /// Disconnect the SSH connection. Harmless if already disconnected.
    pub async fn disconnect(&self) {
        let _ = self.cmd_tx.send(HandleCommand::Disconnect).await;
    }

    /// Non-async disconnect for `Drop` paths
    pub fn try_disconnect(&self) {
        let _ = self.cmd_tx.try_send(HandleCommand::Disconnect);
    }

    /// Check if the Handle Owner Task is still running
    pub fn is_connected(&self) -> bool {
        !self.cmd_tx.is_closed()
    }
}

/// Spawn the Handle Owner Task
///
/// Consumes the Handle and returns a `HandleController`. Must be called
/// within a tokio runtime; the task lives on that runtime until
/// `Disconnect` arrives or every controller is dropped.
pub fn spawn_handle_owner_task(
    handle: Handle<ClientHandler>,
    session_id: String,
) -> HandleController {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<HandleCommand>(64);

    tokio::spawn(async move {
        let handle = handle;

        info!("Handle owner task started for session {}", session_id);

        loop {
            match cmd_rx.recv().await {
                Some(HandleCommand::ChannelOpenSession { reply_tx }) => {
                    let result = handle.channel_open_session().await;
                    if reply_tx.send(result).is_err() {
                        // Channel is dropped here; the server closes it
                        warn!("Caller dropped before receiving channel_open_session result");
                    }
                }
                Some(HandleCommand::Disconnect) => {
                    info!("Disconnect requested for session {}", session_id);
                    break;
                }
                None => {
                    info!("All controllers dropped for session {}", session_id);
                    break;
                }
            }
        }

        drain_pending_commands(&mut cmd_rx);

        let _ = handle
            .disconnect(russh::Disconnect::ByApplication, "Session closed", "en")
            .await;
        info!("Handle owner task terminated for session {}", session_id);
    });

    HandleController { cmd_tx }
}

/// Drain all pending commands, returning Disconnect to each waiting caller
pub(crate) fn drain_pending_commands(cmd_rx: &mut mpsc::Receiver<HandleCommand>) {
    cmd_rx.close();

    while let Ok(cmd) = cmd_rx.try_recv() {
        match cmd {
            HandleCommand::ChannelOpenSession { reply_tx } => {
                let _ = reply_tx.send(Err(russh::Error::Disconnect));
            }
            HandleCommand::Disconnect => {
                debug!("Duplicate disconnect ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_fails_when_owner_gone() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let controller = HandleController::new(cmd_tx);
        drop(cmd_rx);

        assert!(!controller.is_connected());
        match controller.open_session_channel().await {
            Err(ChannelOpenError::Disconnected) => {}
            _ => panic!("expected Disconnected"),
        }
    }

    #[tokio::test]
    async fn test_drain_answers_pending_opens_with_disconnect() {
        let (cmd_tx, mut cmd_rx) = mpsc::channel(4);
        let controller = HandleController::new(cmd_tx);

        let opener = tokio::spawn(async move { controller.open_session_channel().await });

        // Wait until the request is queued, then drain as the owner task would
        while cmd_rx.is_empty() {
            tokio::task::yield_now().await;
        }
        drain_pending_commands(&mut cmd_rx);

        match opener.await.unwrap() {
            Err(ChannelOpenError::Disconnected) => {}
            _ => panic!("expected Disconnected"),
        }
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_harmless() {
        let (cmd_tx, mut cmd_rx) = mpsc::channel(4);
        let controller = HandleController::new(cmd_tx);

        controller.disconnect().await;
        drop(cmd_rx.recv().await);
        cmd_rx.close();

        controller.disconnect().await;
        controller.try_disconnect();
        assert!(!controller.is_connected());
    }
}
