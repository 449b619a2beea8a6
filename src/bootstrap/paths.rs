use std::path::PathBuf;

use anyhow::Context;

const APP_DIR_NAME: &str = "videogate";

/// Appended to the data directory name so several profiles can coexist.
pub const PROFILE_ENV: &str = "VG_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub config_path: PathBuf,
    pub cache_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_data_root(data_root: PathBuf) -> Self {
        Self {
            config_path: data_root.join("config.toml"),
            cache_path: data_root.join(vg_infra::cache::DEFAULT_CACHE_FILE),
            logs_dir: data_root.join("logs"),
            data_root,
        }
    }

    /// Locations under the platform's local data directory.
    pub fn resolve() -> anyhow::Result<Self> {
        let base = dirs::data_local_dir().context("Local data directory is unavailable")?;
        Ok(Self::from_data_root(base.join(resolved_app_dir_name())))
    }
}
