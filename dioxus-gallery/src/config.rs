use flickr_feed::{FeedConfig, FEED_URL};
use justified_layout::LayoutConfig;
use serde::{Deserialize, Serialize};

use crate::error::{validate_mount, GalleryError};

/// Configuration for the gallery and its progress bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Class of the element the gallery renders into
    pub gallery_mount: String,
    /// Class of the element the progress bar renders into
    pub progress_mount: String,
    pub feed_url: String,
    /// Feed request timeout in seconds, 0 disables it
    pub request_timeout_secs: u64,
    pub target_row_height: u32,
    pub max_row_height: u32,
    /// Horizontal space of the container not available to rows
    pub horizontal_padding: u32,
    /// Pause between the last image load and rendering, lets the progress
    /// bar finish its animation
    pub settle_delay_ms: u64,
    /// How long the progress bar stays hidden while resetting
    pub progress_reset_delay_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_mount: "flickr-gallery".to_string(),
            progress_mount: "progressbar".to_string(),
            feed_url: FEED_URL.to_string(),
            request_timeout_secs: 30,
            target_row_height: 200,
            max_row_height: 500,
            horizontal_padding: 40,
            settle_delay_ms: 50,
            progress_reset_delay_ms: 5,
        }
    }
}

impl GalleryConfig {
    /// Rejects configurations the gallery can not be mounted with
    pub fn validate(&self) -> Result<(), GalleryError> {
        validate_mount(&self.gallery_mount)?;
        validate_mount(&self.progress_mount)?;
        Ok(())
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            feed_url: self.feed_url.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    /// Layout parameters for a container of `container_width` pixels
    pub fn layout_config(&self, container_width: u32) -> LayoutConfig {
        LayoutConfig::new(
            container_width.saturating_sub(self.horizontal_padding),
            self.target_row_height,
            self.max_row_height,
        )
    }
}
