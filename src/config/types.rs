//! Configuration file types

use serde::{Deserialize, Serialize};

use crate::ssh::ConnectConfig;

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Where log files live on a typical Logstash host
pub const DEFAULT_LOG_PATH: &str = "/var/log/logstash";

/// Root of `~/.logsearch/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Profile used when none is named on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: Vec<HostProfile>,
}

/// A saved host. Passwords are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
    /// Directory browsing starts from
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ConfigFile {
    /// Profile by name, or the default profile when `name` is `None`
    pub fn profile(&self, name: Option<&str>) -> Option<&HostProfile> {
        let name = name.or(self.default_profile.as_deref())?;
        self.profiles.iter().find(|p| p.name == name)
    }
}

impl HostProfile {
    /// Connection settings for this profile; credentials are added by the caller
    pub fn to_connect_config(&self) -> ConnectConfig {
        let mut config = ConnectConfig::new(&self.host, self.port, &self.username);
        config.key_path = self.key_path.clone();
        config.timeout_secs = self.timeout_secs;
        config
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_port() -> u16 {
    22
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}

fn default_timeout() -> u64 {
    5
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_profile: None,
            profiles: Vec::new(),
        }
    }
}
