//! Scripted `CommandRunner` for unit tests

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::remote::command::RemoteCommand;
use crate::ssh::{CommandOutput, CommandRunner, SshError};

/// Replays canned outputs in order and records every rendered command
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Result<CommandOutput, SshError>>>,
    pub commands: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, exit_status: u32, stdout: impl Into<Vec<u8>>, stderr: &str) -> Self {
        self.replies.lock().push_back(Ok(CommandOutput {
            stdout: stdout.into(),
            stderr: stderr.as_bytes().to_vec(),
            exit_status: Some(exit_status),
        }));
        self
    }

    pub fn reply_output(self, output: CommandOutput) -> Self {
        self.replies.lock().push_back(Ok(output));
        self
    }

    pub fn fail(self, err: SshError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    pub fn last_command(&self) -> String {
        self.commands.lock().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, SshError> {
        self.commands.lock().push(command.render());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SshError::channel(command.render(), "no scripted reply")))
    }
}
