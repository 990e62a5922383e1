//! Location and config resolution for the CLI.
//!
//! Flags win over the config file, which wins over platform defaults.

use anyhow::{Context, Result};
use notimirror_core::Config;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

const APP_DIR: &str = "notimirror";

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cache_path: PathBuf,
    pub cache_ttl: Duration,
    pub remote_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => dirs::config_dir()
                .context("Could not determine config directory")?
                .join(APP_DIR)
                .join("config.json"),
        };
        let config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        let cache_path = match cli.cache.clone().or(config.cache_path.clone()) {
            Some(path) => path,
            None => app_cache_dir()?.join("notifications.json"),
        };
        let log_dir = match config.log_dir.clone() {
            Some(dir) => dir,
            None => app_cache_dir()?.join("logs"),
        };
        let log_level = if cli.verbose {
            "debug".to_string()
        } else {
            config.log_level.clone()
        };

        Ok(Self {
            cache_path,
            cache_ttl: config.cache_ttl(),
            remote_path: cli.remote.clone().or(config.remote_path),
            log_level,
            log_dir,
        })
    }
}

fn app_cache_dir() -> Result<PathBuf> {
    Ok(dirs::cache_dir()
        .context("Could not determine cache directory")?
        .join(APP_DIR))
}
