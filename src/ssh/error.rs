//! SSH Error types
//!
//! Every engine failure is returned to the caller as one of these variants.
//! Nothing here is retried by the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshError {
    /// No usable credentials, unreadable/unparsable key, or rejected by the server
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Address resolution, dial, handshake or connect timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Remote command exited with an unexpected status, or its channel failed
    #[error("Command failed: {command}: {}", describe_failure(.exit_status, .stderr))]
    Command {
        command: String,
        exit_status: Option<u32>,
        stderr: String,
    },

    /// Archived payload is corrupt or truncated
    #[error("Decompression failed: {0}")]
    Decompress(String),

    /// Request rejected before touching the session
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SshError {
    /// Channel-level failure (open, exec, session closed) for `command`
    pub fn channel(command: impl Into<String>, reason: impl Into<String>) -> Self {
        SshError::Command {
            command: command.into(),
            exit_status: None,
            stderr: reason.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, SshError::Auth(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, SshError::Network(_))
    }

    pub fn is_command(&self) -> bool {
        matches!(self, SshError::Command { .. })
    }

    pub fn is_decompress(&self) -> bool {
        matches!(self, SshError::Decompress(_))
    }
}

fn describe_failure(exit_status: &Option<u32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    match (*exit_status, stderr.is_empty()) {
        (Some(code), true) => format!("exit status {}", code),
        (Some(code), false) => format!("exit status {}: {}", code, stderr),
        (None, true) => "no exit status".to_string(),
        (None, false) => stderr.to_string(),
    }
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Network(err.to_string())
    }
}

impl From<russh::keys::Error> for SshError {
    fn from(err: russh::keys::Error) -> Self {
        SshError::Auth(err.to_string())
    }
}

// Lets a front end ship the error as plain text
impl serde::Serialize for SshError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
