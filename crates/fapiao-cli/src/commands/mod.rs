//! Subcommands and the helpers they share.

pub mod config;
pub mod process;
pub mod run;

use std::path::{Path, PathBuf};

use fapiao_core::credentials::{load_api_key, load_buyer_hint};
use fapiao_core::{FapiaoConfig, MoonshotGateway};
use tracing::debug;

/// Per-user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fapiao")
        .join("config.json")
}

/// Load the configuration for a command.
///
/// An explicit path must exist; otherwise the per-user file is used when
/// present, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FapiaoConfig> {
    if let Some(path) = config_path {
        return Ok(FapiaoConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        Ok(FapiaoConfig::from_file(&path)?)
    } else {
        Ok(FapiaoConfig::default())
    }
}

/// Read the API key and build the gateway client used for the whole run.
pub fn connect_gateway(config: &FapiaoConfig) -> anyhow::Result<MoonshotGateway> {
    let api_key = load_api_key(&config.gateway.api_key_file)?;
    let gateway = MoonshotGateway::new(
        api_key,
        &config.gateway.base_url,
        config.gateway.timeout(),
    )?;
    Ok(gateway)
}

/// Buyer hint text, when the configured file exists.
pub fn buyer_hint(config: &FapiaoConfig) -> Option<String> {
    config
        .extraction
        .buyer_hint_file
        .as_deref()
        .and_then(load_buyer_hint)
}
