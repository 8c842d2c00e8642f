//! SSH module - secure remote session for the log access engine
//!
//! Built on russh.
//!
//! # Features
//! - Password and private-key authentication (password tried first)
//! - Bounded connect timeout
//! - One short-lived exec channel per remote command
//! - Concurrent channel opens through a single Handle owner task
//!
//! # Security caveat
//! Host keys are NOT verified. Every server key is accepted and its
//! fingerprint logged. Only use this on networks you trust.

mod client;
mod config;
mod error;
mod exec;
mod handle_owner;
mod session;

pub use client::{fingerprint, load_private_key, ClientHandler, SshClient};
pub use config::{AuthMethod, ConnectConfig};
pub use error::SshError;
pub use exec::{CommandOutput, CommandRunner};
pub use handle_owner::{spawn_handle_owner_task, ChannelOpenError, HandleCommand, HandleController};
pub use session::SshSession;
