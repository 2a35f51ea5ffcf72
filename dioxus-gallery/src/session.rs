//! Async driver around [`GalleryController`]
//!
//! Everything runs on one logical thread: the controller sits in a
//! `RefCell` and is only borrowed between suspension points.

use std::cell::{Ref, RefCell};
use std::time::Duration;

use flickr_feed::{FeedError, FeedPage, FlickrFeedService};
use futures_util::stream::{FuturesUnordered, StreamExt};
use justified_layout::ImageSize;

use crate::controller::{FeedRequest, GalleryController, NavigationOutcome, PreloadPlan, PreloadStatus};
use crate::error::GalleryError;

/// Source of feed pages
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    /// `Ok(None)` means the source answered without a payload
    async fn fetch(&self, filter: Option<&str>) -> Result<Option<FeedPage>, FeedError>;
}

impl FeedSource for FlickrFeedService {
    async fn fetch(&self, filter: Option<&str>) -> Result<Option<FeedPage>, FeedError> {
        self.fetch_feed(filter).await
    }
}

/// Loads an image and reports its natural size
#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    async fn load(&self, url: &str) -> Result<ImageSize, GalleryError>;
}

pub struct GallerySession<F, L> {
    controller: RefCell<GalleryController>,
    feed: F,
    loader: L,
    settle_delay: Duration,
}

impl<F: FeedSource, L: ImageLoader> GallerySession<F, L> {
    pub fn new(controller: GalleryController, feed: F, loader: L) -> Self {
        let settle_delay = Duration::from_millis(controller.config().settle_delay_ms);
        Self {
            controller: RefCell::new(controller),
            feed,
            loader,
            settle_delay,
        }
    }

    pub fn controller(&self) -> Ref<'_, GalleryController> {
        self.controller.borrow()
    }

    /// Load, preload and render a feed
    ///
    /// Resolves once the gallery is rendered or the request was superseded.
    /// Only transport errors are returned; a response without data is
    /// logged and ignored.
    pub async fn load_feed(&self, filter: Option<String>) -> Result<(), GalleryError> {
        let request = self.controller.borrow_mut().load_feed(filter);
        self.run(request).await
    }

    /// Apply a navigation token, see [`GalleryController::on_navigation_change`]
    pub async fn navigate(&self, token: &str) -> Result<(), GalleryError> {
        let outcome = self.controller.borrow_mut().on_navigation_change(token);
        match outcome {
            NavigationOutcome::Load(request) => self.run(request).await,
            NavigationOutcome::Restored | NavigationOutcome::Ignored => Ok(()),
        }
    }

    /// Returns true if the gallery was laid out again
    pub fn resize(&self, width: u32) -> bool {
        self.controller.borrow_mut().on_resize(width)
    }

    async fn run(&self, request: FeedRequest) -> Result<(), GalleryError> {
        let response = self.feed.fetch(request.filter.as_deref()).await;

        let page = match response {
            Ok(page) => page,
            Err(e) => {
                let current = self
                    .controller
                    .borrow_mut()
                    .on_feed_failed(request.generation, &e);
                return if current { Err(e.into()) } else { Ok(()) };
            }
        };

        let accepted = self
            .controller
            .borrow_mut()
            .on_feed_response(request.generation, page);
        match accepted {
            Ok(Some(plan)) => {
                self.preload(plan).await;
                Ok(())
            }
            Ok(None) | Err(GalleryError::NoData) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn preload(&self, plan: PreloadPlan) {
        let generation = plan.generation;

        let mut loads: FuturesUnordered<_> = plan
            .targets
            .iter()
            .map(|target| async move { (target.index, self.loader.load(&target.url).await) })
            .collect();

        let mut complete = plan.targets.is_empty();
        while let Some((index, result)) = loads.next().await {
            let size = match result {
                Ok(size) => Some(size),
                Err(e) => {
                    log::warn!("Image {} failed to load: {}", index, e);
                    None
                }
            };

            let status = self
                .controller
                .borrow_mut()
                .on_image_loaded(generation, index, size);
            match status {
                PreloadStatus::Stale => {
                    log::debug!("Preload of generation {} superseded", generation);
                    return;
                }
                PreloadStatus::Pending => {}
                PreloadStatus::Complete => {
                    complete = true;
                    break;
                }
            }
        }

        if !complete {
            return;
        }

        crate::timer::sleep(self.settle_delay).await;
        self.controller.borrow_mut().on_settled(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;
    use crate::controller::{GalleryEvent, GalleryPhase};
    use flickr_feed::{FeedItem, FeedMedia};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Feed answering per filter after a fixed delay
    #[derive(Default)]
    struct ScriptedFeed {
        responses: HashMap<Option<String>, (u64, Result<Option<FeedPage>, FeedError>)>,
    }

    impl ScriptedFeed {
        fn with(mut self, filter: Option<&str>, delay_ms: u64, page: Option<FeedPage>) -> Self {
            self.responses
                .insert(filter.map(str::to_string), (delay_ms, Ok(page)));
            self
        }

        fn failing(mut self, filter: Option<&str>) -> Self {
            self.responses.insert(
                filter.map(str::to_string),
                (0, Err(FeedError::NetworkError("offline".to_string()))),
            );
            self
        }
    }

    impl FeedSource for ScriptedFeed {
        async fn fetch(&self, filter: Option<&str>) -> Result<Option<FeedPage>, FeedError> {
            let key = filter.map(str::to_string);
            let Some((delay, response)) = self.responses.get(&key) else {
                return Ok(None);
            };
            tokio::time::sleep(Duration::from_millis(*delay)).await;
            response.clone()
        }
    }

    /// Loader with per-image size and delay; unknown URLs fail
    #[derive(Default)]
    struct FakeLoader {
        images: HashMap<String, (u64, ImageSize)>,
    }

    impl ImageLoader for FakeLoader {
        async fn load(&self, url: &str) -> Result<ImageSize, GalleryError> {
            let Some((delay, size)) = self.images.get(url) else {
                return Err(GalleryError::ImageLoad(format!("404 {}", url)));
            };
            tokio::time::sleep(Duration::from_millis(*delay)).await;
            Ok(*size)
        }
    }

    fn url(name: &str) -> String {
        format!("https://img.example/{}.jpg", name)
    }

    fn page(names: &[&str]) -> FeedPage {
        FeedPage {
            items: names
                .iter()
                .map(|name| FeedItem {
                    title: name.to_string(),
                    media: FeedMedia { m: url(name) },
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Every known image loads as 300x200; earlier images take longer
    fn loader(names: &[&str]) -> FakeLoader {
        let count = names.len() as u64;
        FakeLoader {
            images: names
                .iter()
                .enumerate()
                .map(|(i, name)| (url(name), ((count - i as u64) * 3, ImageSize::new(300, 200))))
                .collect(),
        }
    }

    fn session(
        feed: ScriptedFeed,
        loader: FakeLoader,
    ) -> (GallerySession<ScriptedFeed, FakeLoader>, Rc<RefCell<Vec<GalleryEvent>>>) {
        let config = GalleryConfig {
            settle_delay_ms: 0,
            ..Default::default()
        };
        let mut controller = GalleryController::new("flickr-gallery", config).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        controller.set_event_handler(move |event| sink.borrow_mut().push(event));
        controller.on_resize(1040);
        (GallerySession::new(controller, feed, loader), events)
    }

    fn titles<F: FeedSource, L: ImageLoader>(session: &GallerySession<F, L>) -> Vec<String> {
        session
            .controller()
            .state()
            .images
            .iter()
            .map(|image| image.item.title.clone())
            .collect()
    }

    fn renders(events: &[GalleryEvent]) -> Vec<Vec<String>> {
        events
            .iter()
            .filter_map(|event| match event {
                GalleryEvent::Render(gallery) => Some(
                    gallery
                        .rows
                        .iter()
                        .flat_map(|row| row.tiles.iter().map(|tile| tile.title.clone()))
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_load_feed_renders_in_feed_order() {
        let names = ["a", "b", "c", "d"];
        let (session, events) = session(
            ScriptedFeed::default().with(None, 0, Some(page(&names))),
            loader(&names),
        );

        session.load_feed(None).await.unwrap();

        assert_eq!(session.controller().phase(), GalleryPhase::Populated);
        assert_eq!(titles(&session), vec!["a", "b", "c", "d"]);

        let events = events.borrow();
        assert_eq!(events[0], GalleryEvent::ResetProgress);
        assert!(events.contains(&GalleryEvent::Progress(25)));
        assert!(events.contains(&GalleryEvent::Progress(100)));
        assert_eq!(renders(&events), vec![vec!["a", "b", "c", "d"]]);
    }

    #[tokio::test]
    async fn test_newer_load_supersedes_slow_one() {
        let (session, events) = session(
            ScriptedFeed::default()
                .with(None, 40, Some(page(&["old"])))
                .with(Some("123"), 0, Some(page(&["new"]))),
            loader(&["old", "new"]),
        );

        let (first, second) = tokio::join!(session.load_feed(None), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            session.load_feed(Some("123".to_string())).await
        });
        first.unwrap();
        second.unwrap();

        assert_eq!(titles(&session), vec!["new"]);
        assert_eq!(session.controller().state().filter.as_deref(), Some("123"));
        assert_eq!(renders(&events.borrow()), vec![vec!["new"]]);
    }

    #[tokio::test]
    async fn test_navigate_and_back_restores_images() {
        let (session, events) = session(
            ScriptedFeed::default()
                .with(None, 0, Some(page(&["a", "b"])))
                .with(Some("123"), 0, Some(page(&["x"]))),
            loader(&["a", "b", "x"]),
        );

        session.load_feed(None).await.unwrap();
        let before = session.controller().state().snapshot().unwrap();

        session.navigate("123").await.unwrap();
        assert_eq!(titles(&session), vec!["x"]);

        session.navigate("").await.unwrap();
        assert_eq!(session.controller().state().snapshot().unwrap(), before);
        assert_eq!(
            renders(&events.borrow()).last().cloned(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn test_back_without_history_is_noop() {
        let (session, events) = session(ScriptedFeed::default(), FakeLoader::default());

        session.navigate("").await.unwrap();

        assert_eq!(session.controller().phase(), GalleryPhase::Idle);
        assert!(events.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_no_data_is_ignored() {
        let (session, _) = session(
            ScriptedFeed::default()
                .with(None, 0, Some(page(&["a"])))
                .with(Some("9"), 0, None),
            loader(&["a"]),
        );

        session.load_feed(None).await.unwrap();
        session.load_feed(Some("9".to_string())).await.unwrap();

        assert_eq!(session.controller().phase(), GalleryPhase::Populated);
        assert_eq!(titles(&session), vec!["a"]);
    }

    #[tokio::test]
    async fn test_feed_failure_is_reported() {
        let (session, _) = session(ScriptedFeed::default().failing(None), FakeLoader::default());

        let result = session.load_feed(None).await;

        assert!(matches!(result, Err(GalleryError::Feed(FeedError::NetworkError(_)))));
        assert_eq!(session.controller().phase(), GalleryPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_images_are_left_out() {
        let (session, events) = session(
            ScriptedFeed::default().with(None, 0, Some(page(&["a", "missing", "c"]))),
            loader(&["a", "c"]),
        );

        session.load_feed(None).await.unwrap();

        assert_eq!(titles(&session), vec!["a", "c"]);
        assert!(events.borrow().contains(&GalleryEvent::Progress(100)));
    }

    #[tokio::test]
    async fn test_resize_after_load_emits_render() {
        let names = ["a", "b", "c"];
        let (session, events) = session(
            ScriptedFeed::default().with(None, 0, Some(page(&names))),
            loader(&names),
        );

        assert!(!session.resize(800));
        session.load_feed(None).await.unwrap();
        assert!(session.resize(640));

        let events = events.borrow();
        let Some(GalleryEvent::Render(gallery)) = events.last() else {
            panic!("expected a render");
        };
        for row in &gallery.rows {
            assert_eq!(row.tiles.iter().map(|t| t.width).sum::<u32>(), 600);
        }
    }
}
