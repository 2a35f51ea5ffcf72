//! Gallery state machine
//!
//! The controller never awaits anything itself. Every asynchronous step
//! (feed round-trip, image load, settle delay) is reported back through one
//! of the `on_*` methods, tagged with the request generation it belongs to.
//! Reports for a generation that is no longer current are dropped, so a late
//! response can never overwrite a newer state.

use flickr_feed::{FeedError, FeedItem, FeedPage};
use justified_layout::{compute_layout, ImageSize, LayoutResult};

use crate::config::GalleryConfig;
use crate::error::{validate_mount, GalleryError};
use crate::render::{build_gallery, RenderedGallery};
use crate::state::{GalleryState, ImageRecord, LoadProgress};

/// Signals emitted to the registered event handler
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// A new request started, the progress bar should rewind
    ResetProgress,
    /// Preload progress in percent
    Progress(u8),
    /// A fresh layout is ready to be shown
    Render(RenderedGallery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryPhase {
    Idle,
    /// Waiting for the feed
    Loading { generation: u64 },
    /// Feed received, images loading
    Preloading { generation: u64 },
    /// Images loaded and rendered
    Populated,
}

/// A feed request the caller has to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub generation: u64,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadTarget {
    /// Position in the preload batch, used to report the load back
    pub index: usize,
    pub url: String,
}

/// Images the caller has to load for a feed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadPlan {
    pub generation: u64,
    pub targets: Vec<PreloadTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadStatus {
    /// The batch was superseded, stop loading
    Stale,
    Pending,
    /// Every image reported back, settle and render next
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A new feed has to be fetched
    Load(FeedRequest),
    /// A previous gallery was restored from history
    Restored,
    /// Nothing to do
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Waiting,
    Loaded(ImageSize),
    Failed,
}

/// Feed response whose images are still loading
#[derive(Debug, Clone)]
struct PendingBatch {
    filter: Option<String>,
    page: FeedPage,
    items: Vec<FeedItem>,
    slots: Vec<Slot>,
}

pub type EventHandler = Box<dyn FnMut(GalleryEvent)>;

/// Orchestrates feed loading, preloading, history and layout
pub struct GalleryController {
    mount: String,
    config: GalleryConfig,
    phase: GalleryPhase,
    state: GalleryState,
    generation: u64,
    requested_filter: Option<String>,
    pending: Option<PendingBatch>,
    container_width: u32,
    /// Container width of the last render
    rendered_width: Option<u32>,
    handler: Option<EventHandler>,
}

impl GalleryController {
    /// Create a controller for the element matching `selector`
    pub fn new(selector: &str, config: GalleryConfig) -> Result<Self, GalleryError> {
        let mount = validate_mount(selector)?.to_string();
        Ok(Self {
            mount,
            config,
            phase: GalleryPhase::Idle,
            state: GalleryState::default(),
            generation: 0,
            requested_filter: None,
            pending: None,
            container_width: 0,
            rendered_width: None,
            handler: None,
        })
    }

    /// Register the handler that receives all [`GalleryEvent`]s
    ///
    /// A later registration replaces the previous handler.
    pub fn set_event_handler(&mut self, handler: impl FnMut(GalleryEvent) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn phase(&self) -> GalleryPhase {
        self.phase
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    /// Start loading the feed, optionally filtered by author id
    ///
    /// Any request still in flight becomes stale.
    pub fn load_feed(&mut self, filter: Option<String>) -> FeedRequest {
        self.generation += 1;
        self.phase = GalleryPhase::Loading {
            generation: self.generation,
        };
        self.requested_filter = filter.clone();
        self.pending = None;

        log::info!(
            "Loading feed (generation {}, filter {:?})",
            self.generation,
            filter
        );
        self.emit(GalleryEvent::ResetProgress);

        FeedRequest {
            generation: self.generation,
            filter,
        }
    }

    /// Accept the feed response of request `generation`
    ///
    /// Returns `Ok(None)` for a stale response and `Err(NoData)` for a
    /// response without payload; in both cases the shown gallery is kept.
    /// Items without an image URL are skipped.
    pub fn on_feed_response(
        &mut self,
        generation: u64,
        page: Option<FeedPage>,
    ) -> Result<Option<PreloadPlan>, GalleryError> {
        if self.phase != (GalleryPhase::Loading { generation }) {
            log::debug!("Dropping stale feed response (generation {})", generation);
            return Ok(None);
        }

        let Some(page) = page else {
            log::info!("Feed response without data, keeping current gallery");
            self.revert_phase();
            return Err(GalleryError::NoData);
        };

        let items: Vec<FeedItem> = page
            .items
            .iter()
            .filter(|item| item.image_url().is_some())
            .cloned()
            .collect();
        if items.len() < page.items.len() {
            log::warn!(
                "Skipping {} feed items without an image",
                page.items.len() - items.len()
            );
        }

        let targets: Vec<PreloadTarget> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.image_url().map(|url| PreloadTarget {
                    index,
                    url: url.to_string(),
                })
            })
            .collect();

        self.state.progress = LoadProgress::new(targets.len());
        self.pending = Some(PendingBatch {
            filter: self.requested_filter.clone(),
            page,
            slots: vec![Slot::Waiting; items.len()],
            items,
        });
        self.phase = GalleryPhase::Preloading { generation };

        log::debug!("Preloading {} images", targets.len());
        if targets.is_empty() {
            self.emit(GalleryEvent::Progress(100));
        }

        Ok(Some(PreloadPlan {
            generation,
            targets,
        }))
    }

    /// The feed request of `generation` failed; keep the current gallery
    ///
    /// Returns false if the request was already stale.
    pub fn on_feed_failed(&mut self, generation: u64, error: &FeedError) -> bool {
        if self.phase != (GalleryPhase::Loading { generation }) {
            return false;
        }
        log::warn!("Feed request failed: {}", error);
        self.revert_phase();
        true
    }

    /// Report a finished image load; `size` is `None` if it failed
    ///
    /// Failed images count towards progress but are left out of the layout.
    pub fn on_image_loaded(
        &mut self,
        generation: u64,
        index: usize,
        size: Option<ImageSize>,
    ) -> PreloadStatus {
        if self.phase != (GalleryPhase::Preloading { generation }) {
            return PreloadStatus::Stale;
        }
        let Some(pending) = self.pending.as_mut() else {
            return PreloadStatus::Stale;
        };

        match pending.slots.get_mut(index) {
            Some(slot) if *slot == Slot::Waiting => {
                *slot = size.map_or(Slot::Failed, Slot::Loaded);
            }
            Some(_) => {
                log::warn!("Image {} reported twice", index);
                return PreloadStatus::Pending;
            }
            None => {
                log::warn!("Image {} is not part of the batch", index);
                return PreloadStatus::Pending;
            }
        }

        self.state.progress.loaded += 1;
        let progress = self.state.progress;
        self.emit(GalleryEvent::Progress(progress.percent()));

        if progress.is_done() {
            PreloadStatus::Complete
        } else {
            PreloadStatus::Pending
        }
    }

    /// Commit a fully loaded batch and render it
    ///
    /// Returns false if the batch was superseded or is not complete yet.
    pub fn on_settled(&mut self, generation: u64) -> bool {
        if self.phase != (GalleryPhase::Preloading { generation }) || !self.state.progress.is_done() {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.state.images = pending
            .items
            .into_iter()
            .zip(pending.slots)
            .filter_map(|(item, slot)| match slot {
                Slot::Loaded(size) => Some(ImageRecord::new(size, item)),
                Slot::Waiting | Slot::Failed => None,
            })
            .collect();
        self.state.page = Some(pending.page);
        self.state.filter = pending.filter;
        self.phase = GalleryPhase::Populated;

        log::info!("Gallery populated with {} images", self.state.images.len());
        self.render();
        true
    }

    /// React to a change of the navigation token
    ///
    /// A non-empty token saves the shown gallery and loads the feed filtered
    /// by it. An empty token goes back to the previous gallery.
    pub fn on_navigation_change(&mut self, token: &str) -> NavigationOutcome {
        let token = token.trim();
        if !token.is_empty() {
            self.save_state();
            return NavigationOutcome::Load(self.load_feed(Some(token.to_string())));
        }

        match self.go_back() {
            Ok(()) => NavigationOutcome::Restored,
            Err(e) => {
                log::debug!("Back navigation ignored: {}", e);
                NavigationOutcome::Ignored
            }
        }
    }

    /// Restore the most recent history entry without a request
    pub fn go_back(&mut self) -> Result<(), GalleryError> {
        let snapshot = self.state.history.pop().ok_or(GalleryError::EmptyHistory)?;

        // invalidates whatever is still in flight
        self.generation += 1;
        self.pending = None;
        self.requested_filter = snapshot.filter.clone();
        self.state.restore(snapshot);
        self.phase = GalleryPhase::Populated;

        log::info!("Restored gallery {:?} from history", self.state.filter);
        self.emit(GalleryEvent::Progress(100));
        self.render();
        Ok(())
    }

    /// Store the container width and re-run the layout if populated
    ///
    /// Returns true if a render was emitted.
    pub fn on_resize(&mut self, width: u32) -> bool {
        self.container_width = width;
        if self.phase != GalleryPhase::Populated {
            return false;
        }
        self.render();
        true
    }

    /// Layout of the shown images at the current container width
    pub fn layout(&self) -> LayoutResult {
        let sizes: Vec<ImageSize> = self.state.images.iter().map(|image| image.size).collect();
        compute_layout(&sizes, &self.config.layout_config(self.container_width))
    }

    fn save_state(&mut self) {
        if self.phase != GalleryPhase::Populated {
            log::debug!("Nothing populated, history unchanged");
            return;
        }
        if let Some(snapshot) = self.state.snapshot() {
            self.state.history.push(snapshot);
        }
    }

    /// Return to the last settled phase after a request brought no gallery
    ///
    /// Widths stored by resizes during the request are laid out now.
    fn revert_phase(&mut self) {
        self.phase = self.settled_phase();
        if self.phase == GalleryPhase::Populated && self.rendered_width != Some(self.container_width) {
            self.render();
        }
    }

    fn settled_phase(&self) -> GalleryPhase {
        if self.state.page.is_some() {
            GalleryPhase::Populated
        } else {
            GalleryPhase::Idle
        }
    }

    fn render(&mut self) {
        self.rendered_width = Some(self.container_width);
        let gallery = build_gallery(&self.layout(), &self.state.images);
        self.emit(GalleryEvent::Render(gallery));
    }

    fn emit(&mut self, event: GalleryEvent) {
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }
}
