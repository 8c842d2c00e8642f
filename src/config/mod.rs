//! Configuration Management Module
//!
//! Saved host profiles (never passwords) and the application's on-disk locations.

pub mod storage;
pub mod types;

pub use storage::{config_dir, config_file, log_dir, ConfigStorage, StorageError};
pub use types::{ConfigFile, HostProfile, CONFIG_VERSION, DEFAULT_LOG_PATH};
