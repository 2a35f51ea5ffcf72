//! Dioxus UI components for the justified gallery
//!
//! The components only wire renderer events (resize, URL fragment changes,
//! image loads) into a [`GallerySession`] and turn the emitted
//! [`RenderedGallery`] into markup.

use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use flickr_feed::FlickrFeedService;
use justified_layout::ImageSize;

use crate::config::GalleryConfig;
use crate::controller::{GalleryController, GalleryEvent};
use crate::error::GalleryError;
use crate::progress::ProgressBar;
use crate::render::{GalleryRow, GalleryTile, RenderedGallery};
use crate::session::{GallerySession, ImageLoader};

type FlickrSession = GallerySession<FlickrFeedService, DomImageLoader>;

/// Reports the URL fragment (without `#`) on every change
const HASH_LISTENER: &str = r#"
    window.addEventListener('hashchange', () => {
        dioxus.send(window.location.hash.substring(1));
    });
    await new Promise(() => {});
"#;

const TOUCH_PROBE: &str = r#"
    return ('ontouchstart' in window) || navigator.maxTouchPoints > 0;
"#;

/// Loads images through the renderer so they land in its image cache
#[derive(Debug, Clone, Copy, Default)]
pub struct DomImageLoader;

impl ImageLoader for DomImageLoader {
    async fn load(&self, url: &str) -> Result<ImageSize, GalleryError> {
        let src = serde_json::to_string(url).map_err(|e| GalleryError::ImageLoad(e.to_string()))?;
        let script = format!(
            r#"
            return await new Promise((resolve) => {{
                const img = new Image();
                img.onload = () => resolve([img.naturalWidth, img.naturalHeight]);
                img.onerror = () => resolve(null);
                img.src = {src};
            }});
            "#
        );

        let size = document::eval(&script)
            .join::<Option<(u32, u32)>>()
            .await
            .map_err(|e| GalleryError::ImageLoad(format!("{}: {:?}", url, e)))?;

        let (width, height) =
            size.ok_or_else(|| GalleryError::ImageLoad(format!("{} could not be loaded", url)))?;
        Ok(ImageSize::new(width, height))
    }
}

/// Rewinds the progress bar once the reset delay has passed
async fn finish_progress_reset(mut progress: Signal<ProgressBar>, delay: Duration) {
    crate::timer::sleep(delay).await;
    progress.write().finish_reset();
}

fn mount_session(
    config: GalleryConfig,
    mut rendered: Signal<RenderedGallery>,
    mut progress: Signal<ProgressBar>,
) -> Result<Rc<FlickrSession>, GalleryError> {
    let reset_delay = Duration::from_millis(config.progress_reset_delay_ms);
    let feed = FlickrFeedService::new(config.feed_config())?;
    let selector = config.gallery_mount.clone();
    let mut controller = GalleryController::new(&selector, config)?;

    controller.set_event_handler(move |event| match event {
        GalleryEvent::ResetProgress => {
            progress.write().begin_reset();
            spawn(finish_progress_reset(progress, reset_delay));
        }
        GalleryEvent::Progress(percent) => progress.write().set_value(percent),
        GalleryEvent::Render(gallery) => rendered.set(gallery),
    });

    Ok(Rc::new(GallerySession::new(controller, feed, DomImageLoader)))
}

/// A justified photo gallery fed by the public photo feed
///
/// Loads the unfiltered feed on mount. Clicking an author sets the URL
/// fragment to the author id, which loads that author's photos; clearing
/// the fragment (e.g. with the back button) restores the previous gallery.
///
/// # Example
/// ```rust,ignore
/// let progress = use_signal(|| ProgressBar::new("progressbar").unwrap());
///
/// rsx! {
///     ProgressBarView { state: progress }
///     JustifiedGallery { config: GalleryConfig::default(), progress }
/// }
/// ```
#[component]
pub fn JustifiedGallery(
    /// Gallery configuration
    config: GalleryConfig,
    /// Progress bar driven by image preloading
    progress: Signal<ProgressBar>,
) -> Element {
    let rendered = use_signal(RenderedGallery::default);
    let session = use_hook(move || mount_session(config, rendered, progress));

    let load_session = session.clone();
    use_future(move || {
        let session = load_session.clone();
        async move {
            let Ok(session) = session else {
                return;
            };
            if let Err(e) = session.load_feed(None).await {
                log::error!("Failed to load feed: {}", e);
            }
        }
    });

    let hash_session = session.clone();
    use_future(move || {
        let session = hash_session.clone();
        async move {
            let Ok(session) = session else {
                return;
            };
            let mut listener = document::eval(HASH_LISTENER);
            while let Ok(token) = listener.recv::<String>().await {
                log::debug!("Navigation token changed: {:?}", token);
                let session = session.clone();
                spawn(async move {
                    if let Err(e) = session.navigate(&token).await {
                        log::error!("Navigation failed: {}", e);
                    }
                });
            }
        }
    });

    let touch = use_resource(|| async {
        document::eval(TOUCH_PROBE)
            .join::<bool>()
            .await
            .unwrap_or(false)
    });

    let session = match session {
        Ok(session) => session,
        Err(e) => {
            log::error!("Gallery could not be mounted: {}", e);
            return rsx! {
                div {
                    style: "padding: 24px; text-align: center; background: #f8d7da; border-radius: 8px; color: #721c24;",
                    "{e}"
                }
            };
        }
    };

    let mount = session.controller().mount().to_string();
    let class = if touch().unwrap_or(false) {
        format!("{} touch", mount)
    } else {
        mount
    };

    rsx! {
        div {
            class: "{class}",
            onresize: move |evt| {
                if let Ok(size) = evt.get_border_box_size() {
                    session.resize(size.width.max(0.0) as u32);
                }
            },
            for (i, row) in rendered().rows.into_iter().enumerate() {
                GalleryRowView { key: "{i}", row }
            }
        }
    }
}

/// Internal component for rendering a single row
#[component]
fn GalleryRowView(row: GalleryRow) -> Element {
    rsx! {
        div {
            class: "gallery-row",
            style: "height: {row.height}px;",
            for (i, tile) in row.tiles.into_iter().enumerate() {
                GalleryTileView { key: "{i}", tile }
            }
        }
    }
}

/// Internal component for rendering a single image with its caption
#[component]
fn GalleryTileView(tile: GalleryTile) -> Element {
    rsx! {
        div {
            class: "image-wrapper",
            style: "height: {tile.height}px;",
            a {
                class: "gallery-image",
                style: "width: {tile.width}px; height: {tile.height}px;",
                target: "_blank",
                title: "{tile.title}",
                href: "{tile.link}",
                img { src: "{tile.src}", alt: "{tile.title}" }
            }
            div { class: "image-author",
                div { class: "image-author-inner ellipsis",
                    "by "
                    a {
                        href: "#{tile.author_id}",
                        title: "@{tile.author_name} | {tile.title}",
                        "data-author-id": "{tile.author_id}",
                        "{tile.author_name}"
                    }
                }
            }
            if let Some(date) = tile.date {
                div { class: "image-date",
                    span { class: "image-date-inner ellipsis", "{date}" }
                }
            }
        }
    }
}

/// A linear progress bar
///
/// The inner indicator is shifted left by the missing percentage and hidden
/// while a reset is in progress.
#[component]
pub fn ProgressBarView(state: Signal<ProgressBar>) -> Element {
    let (mount, transform, display) = {
        let bar = state.read();
        let display = if bar.is_visible() { "block" } else { "none" };
        (bar.mount().to_string(), bar.transform(), display)
    };

    rsx! {
        div {
            class: "{mount}",
            div {
                class: "progressbar-value",
                style: "transform: {transform}; display: {display};",
            }
        }
    }
}
