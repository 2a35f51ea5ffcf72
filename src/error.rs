use std::fmt;

use dioxus_gallery::GalleryError;

/// Central error types for the gallery app
#[derive(Debug)]
pub enum AppError {
    /// Configuration file could not be parsed
    Config(toml::de::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Invalid gallery setup
    Gallery(GalleryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Gallery(e) => write!(f, "Gallery error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<GalleryError> for AppError {
    fn from(e: GalleryError) -> Self {
        AppError::Gallery(e)
    }
}
