//! Client configuration for GPTZator.
//!
//! A kubeconfig-style YAML file (`client.yaml`) holding named connection
//! contexts:
//! - `server`: platform API base URL
//! - `token-file`: where session tokens are persisted
//! - `timeout`: request timeout in seconds
//!
//! `current-context` selects the default; `defaults` fill in what a
//! context leaves out.

pub mod client;
pub mod error;
mod paths;

pub use client::{
    CLIENT_CONFIG_FILE, ClientConfig, ClientDefaults, Context, client_config_path,
    load_client_config, load_client_config_from, save_client_config, save_client_config_to,
};
pub use error::{ConfigError, Result};
pub use paths::{CONFIG_DIR_ENV, xdg_config_dir};
