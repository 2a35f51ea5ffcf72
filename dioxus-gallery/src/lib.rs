//! # Dioxus Gallery
//!
//! A justified-rows photo gallery fed by the public photo feed, with a
//! progress bar for image preloading.
//!
//! This crate provides:
//! - A renderer-independent gallery controller (feed requests, preload
//!   progress, navigation history, resize handling)
//! - An async session that drives the controller with a feed source and an
//!   image loader
//! - The presentation model the layout is turned into
//! - Dioxus components for the gallery and the progress bar (feature
//!   `components`)
//!
//! ## Request Supersession
//!
//! Every feed request carries a generation number. Responses and image
//! loads of anything but the latest generation are dropped, so a slow
//! response can never overwrite a newer gallery.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use dioxus::prelude::*;
//! use dioxus_gallery::{GalleryConfig, JustifiedGallery, ProgressBar, ProgressBarView};
//!
//! #[component]
//! fn App() -> Element {
//!     let progress = use_signal(|| ProgressBar::new("progressbar").unwrap());
//!
//!     rsx! {
//!         ProgressBarView { state: progress }
//!         JustifiedGallery { config: GalleryConfig::default(), progress }
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod progress;
pub mod render;
pub mod session;
pub mod state;
pub mod timer;

#[cfg(feature = "components")]
pub mod components;

pub use config::GalleryConfig;
pub use controller::{
    EventHandler, FeedRequest, GalleryController, GalleryEvent, GalleryPhase, NavigationOutcome,
    PreloadPlan, PreloadStatus, PreloadTarget,
};
pub use error::{validate_mount, GalleryError};
pub use progress::ProgressBar;
pub use render::{build_gallery, GalleryRow, GalleryTile, RenderedGallery};
pub use session::{FeedSource, GallerySession, ImageLoader};
pub use state::{GallerySnapshot, GalleryState, ImageRecord, LoadProgress};

#[cfg(feature = "components")]
pub use components::{DomImageLoader, JustifiedGallery, ProgressBarView};
