mod types;

pub use types::*;

use crate::{Error, Result};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "qr-sender.yaml";

/// Loads configuration from `explicit`, then `CONFIG_PATH`, then the default
/// file name. Only the default file is allowed to be missing.
pub async fn load(explicit: Option<&Path>) -> Result<Config> {
    let (config_path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match env::var("CONFIG_PATH") {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        },
    };

    debug!("Loading configuration from: {}", config_path.display());

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => parse(&config_str)?,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
        Err(e) => {
            return Err(Error::config(format!(
                "Failed to read {}: {}",
                config_path.display(),
                e
            )));
        }
    };

    if let Ok(endpoint) = env::var("QR_ENDPOINT") {
        config.dispatcher.endpoint = endpoint;
    }

    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // serde_yaml rejects an empty document for a struct
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}
