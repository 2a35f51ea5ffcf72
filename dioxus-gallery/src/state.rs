use flickr_feed::{FeedItem, FeedPage};
use justified_layout::ImageSize;

/// A loaded image together with the feed item it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub size: ImageSize,
    pub item: FeedItem,
}

impl ImageRecord {
    pub fn new(size: ImageSize, item: FeedItem) -> Self {
        Self { size, item }
    }
}

/// Preload counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self { loaded: 0, total }
    }

    /// Rounded percentage of finished loads; an empty batch counts as done
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let loaded = self.loaded.min(self.total);
        ((loaded * 100 + self.total / 2) / self.total) as u8
    }

    pub fn is_done(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Everything needed to bring back a populated gallery without a request
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    pub filter: Option<String>,
    pub page: FeedPage,
    pub images: Vec<ImageRecord>,
}

/// Data owned by the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryState {
    /// Filter of the feed currently shown
    pub filter: Option<String>,
    /// Raw feed page currently shown
    pub page: Option<FeedPage>,
    /// Loaded images in feed order
    pub images: Vec<ImageRecord>,
    pub progress: LoadProgress,
    pub history: Vec<GallerySnapshot>,
}

impl GalleryState {
    /// Deep copy of the shown gallery, if there is one
    pub fn snapshot(&self) -> Option<GallerySnapshot> {
        self.page.as_ref().map(|page| GallerySnapshot {
            filter: self.filter.clone(),
            page: page.clone(),
            images: self.images.clone(),
        })
    }

    pub fn restore(&mut self, snapshot: GallerySnapshot) {
        self.progress = LoadProgress {
            loaded: snapshot.images.len(),
            total: snapshot.images.len(),
        };
        self.filter = snapshot.filter;
        self.page = Some(snapshot.page);
        self.images = snapshot.images;
    }
}
