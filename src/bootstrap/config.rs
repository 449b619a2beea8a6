//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML configuration file into [`AppConfig`]. Sections and keys
//! left out of the file take the deployment defaults; a missing file means
//! "all defaults".

use std::path::{Path, PathBuf};

use anyhow::Context;
use vg_core::config::AppConfig;

use super::paths::AppPaths;

/// Overrides the configuration file location.
pub const CONFIG_ENV: &str = "VIDEOGATE_CONFIG";

pub fn resolve_config_path(paths: &AppPaths) -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => paths.config_path.clone(),
    }
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML for
/// [`AppConfig`].
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str::<AppConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Like [`load_config`], but a file that does not exist yields the defaults.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    load_config(config_path.to_path_buf())
}
