//! Configuration Storage
//!
//! Handles reading/writing the profile file on disk.
//! Config location: ~/.logsearch on macOS/Linux, %APPDATA%\logsearch on Windows

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::{ConfigFile, CONFIG_VERSION};

/// Configuration storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config version {found} is newer than supported {supported}")]
    VersionTooNew { found: u32, supported: u32 },
}

/// Get the logsearch configuration directory
pub fn config_dir() -> Result<PathBuf, StorageError> {
    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join("logsearch"));
        }
        dirs::home_dir()
            .map(|home| home.join(".logsearch"))
            .ok_or(StorageError::NoConfigDir)
    }

    #[cfg(not(windows))]
    {
        dirs::home_dir()
            .map(|home| home.join(".logsearch"))
            .ok_or(StorageError::NoConfigDir)
    }
}

/// Get the log directory for the application log
pub fn log_dir() -> Result<PathBuf, StorageError> {
    Ok(config_dir()?.join("logs"))
}

/// Get the profile file path
pub fn config_file() -> Result<PathBuf, StorageError> {
    Ok(config_dir()?.join("config.json"))
}

/// Configuration storage manager
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Create a new storage manager with default path
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            path: config_file()?,
        })
    }

    /// Create storage manager with custom path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load configuration from disk
    ///
    /// Returns defaults if the file doesn't exist. A corrupted file is
    /// backed up and replaced by defaults.
    pub fn load(&self) -> Result<ConfigFile, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default())
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        match serde_json::from_str::<ConfigFile>(&contents) {
            Ok(config) if config.version > CONFIG_VERSION => Err(StorageError::VersionTooNew {
                found: config.version,
                supported: CONFIG_VERSION,
            }),
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Config file corrupted: {}", e);
                match self.backup() {
                    Ok(backup_path) => tracing::warn!(
                        "Corrupted config backed up to {:?}, using defaults",
                        backup_path
                    ),
                    Err(backup_err) => {
                        tracing::error!("Failed to backup corrupted config: {}", backup_err)
                    }
                }
                Ok(ConfigFile::default())
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &ConfigFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(config)?;

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a backup of the current config
    pub fn backup(&self) -> Result<PathBuf, StorageError> {
        let backup_path = self.path.with_extension(format!(
            "json.backup.{}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ));

        if self.exists() {
            fs::copy(&self.path, &backup_path)?;
        }

        Ok(backup_path)
    }
}
