use std::fs;
use std::path::{Path, PathBuf};

use dioxus_gallery::GalleryConfig;

use crate::error::AppError;

/// Environment variable pointing to an alternative configuration file
pub const CONFIG_ENV: &str = "GALLERY_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "gallery.toml";

/// Path of the configuration file
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Loads the gallery configuration
///
/// A missing file yields the defaults. Keys absent from the file keep
/// their default values.
pub fn load_config() -> Result<GalleryConfig, AppError> {
    #[cfg(target_arch = "wasm32")]
    {
        Ok(GalleryConfig::default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        load_config_from(&config_path())
    }
}

pub fn load_config_from(path: &Path) -> Result<GalleryConfig, AppError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(GalleryConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: GalleryConfig = toml::from_str(&content)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
