//! Configuration file discovery and loading.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::{isha_window_warning, validate_config};
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Directory given with `--config`, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for this process. Fails if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of `athkari.toml`, honoring `--config`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration, writing a default file first if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
        log_block_start!("Created default configuration");
        log_indented!("{}", private_path(&config_path));
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load and validate the configuration at `path` without creating it.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    warn_about_lenient_values(&config);

    Ok(config)
}

// Values that load fine but may not do what the user expects
fn warn_about_lenient_values(config: &Config) {
    if let Some(name) = config.method.as_deref()
        && crate::prayer::CalculationMethod::from_name(name).is_none()
    {
        log_pipe!();
        log_warning!(
            "Unknown calculation method '{}', using {}",
            name,
            DEFAULT_METHOD.display_name()
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        log_pipe!();
        log_warning!("Only one of latitude and longitude is set, using the default location");
    }

    // Read the system clock directly so loading never installs the global time source
    let location = config.location();
    let today = chrono::Local::now()
        .with_timezone(&location.timezone)
        .date_naive();
    if let Some(message) = isha_window_warning(config, today) {
        log_pipe!();
        log_warning!("{}", message);
    }
}
