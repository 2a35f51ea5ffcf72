use flickr_feed::FeedError;

/// Error type for gallery operations
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryError {
    /// A controller or progress bar was created without a mount target
    EmptySelector,
    /// The feed answered without a payload
    NoData,
    /// Back navigation with nothing to go back to
    EmptyHistory,
    /// Fetching or decoding the feed failed
    Feed(FeedError),
    /// A single image could not be loaded
    ImageLoad(String),
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalleryError::EmptySelector => write!(f, "The mount selector can not be empty"),
            GalleryError::NoData => write!(f, "The feed returned no data"),
            GalleryError::EmptyHistory => write!(f, "There is no previous gallery state"),
            GalleryError::Feed(e) => write!(f, "Feed error: {}", e),
            GalleryError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
        }
    }
}

impl std::error::Error for GalleryError {}

impl From<FeedError> for GalleryError {
    fn from(err: FeedError) -> Self {
        GalleryError::Feed(err)
    }
}

/// Checks a mount selector and returns it without a leading `.` or `#`
pub fn validate_mount(selector: &str) -> Result<&str, GalleryError> {
    let mount = selector
        .trim()
        .trim_start_matches(['.', '#'])
        .trim();
    if mount.is_empty() {
        Err(GalleryError::EmptySelector)
    } else {
        Ok(mount)
    }
}
