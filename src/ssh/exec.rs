//! Exec channels
//!
//! Each remote command gets its own short-lived session channel: open,
//! exec, drain until the server closes it, drop. Channels are never reused.

use async_trait::async_trait;
use russh::ChannelMsg;
use tracing::debug;

use super::error::SshError;
use super::handle_owner::HandleController;
use crate::remote::command::RemoteCommand;

/// Everything a finished remote command produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the server closed the channel without reporting one
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Turn this output into the `Command` error for `command`
    pub fn into_error(self, command: &RemoteCommand) -> SshError {
        SshError::Command {
            command: command.render(),
            exit_status: self.exit_status,
            stderr: self.stderr_lossy(),
        }
    }
}

/// Runs one remote command to completion
///
/// The engine operations are written against this trait so they can be
/// exercised without a server.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, SshError>;
}

#[async_trait]
impl CommandRunner for HandleController {
    async fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, SshError> {
        let line = command.render();

        let mut channel = self
            .open_session_channel()
            .await
            .map_err(|e| SshError::channel(&line, e.to_string()))?;

        debug!("exec: {}", line);

        channel
            .exec(true, line.as_str())
            .await
            .map_err(|e| SshError::channel(&line, format!("exec request failed: {}", e)))?;

        let mut output = CommandOutput::default();

        // Exit status usually arrives after EOF, so drain until Close
        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    output.stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext: 1 }) => {
                    output.stderr.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    output.exit_status = Some(exit_status);
                }
                Some(ChannelMsg::Close) | None => break,
                Some(_) => {}
            }
        }

        debug!(
            "exec completed: exit={:?} stdout_len={} stderr_len={}",
            output.exit_status,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(output)
    }
}
