//! SSH Configuration

use serde::{Deserialize, Serialize};

use super::error::SshError;

/// SSH connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Remote host address
    pub host: String,

    /// SSH port (default: 22)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for authentication
    pub username: String,

    /// Password; empty counts as not provided
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Path to a private key file; empty counts as not provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,

    /// Optional passphrase for an encrypted key
    #[serde(default, skip_serializing)]
    pub key_passphrase: Option<String>,

    /// Dial + handshake timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Authentication methods, in the order they are attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Password authentication
    Password { password: String },

    /// SSH key authentication
    Key {
        /// Path to private key file
        key_path: String,
        /// Optional passphrase for encrypted keys
        passphrase: Option<String>,
    },
}

impl ConnectConfig {
    pub fn new(host: impl Into<String>, port: u16, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_key(mut self, key_path: impl Into<String>, passphrase: Option<String>) -> Self {
        self.key_path = Some(key_path.into());
        self.key_passphrase = passphrase;
        self
    }

    /// `host:port` as dialed
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Collect the configured methods: password first, then key.
    ///
    /// Fails with `Auth` when neither is provided, before any network I/O.
    pub fn auth_methods(&self) -> Result<Vec<AuthMethod>, SshError> {
        let mut methods = Vec::new();

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            methods.push(AuthMethod::Password {
                password: password.to_string(),
            });
        }

        if let Some(key_path) = self.key_path.as_deref().filter(|p| !p.is_empty()) {
            methods.push(AuthMethod::Key {
                key_path: key_path.to_string(),
                passphrase: self.key_passphrase.clone().filter(|p| !p.is_empty()),
            });
        }

        if methods.is_empty() {
            return Err(SshError::Auth(
                "no authentication method provided".to_string(),
            ));
        }

        Ok(methods)
    }
}

fn default_port() -> u16 {
    22
}

fn default_timeout() -> u64 {
    5
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: String::new(),
            password: None,
            key_path: None,
            key_passphrase: None,
            timeout_secs: default_timeout(),
        }
    }
}
