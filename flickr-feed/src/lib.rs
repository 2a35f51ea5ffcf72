//! # Flickr Feed
//!
//! Client and data model for the Flickr `photos_public` feed.
//!
//! This crate provides:
//! - The feed page and item model
//! - An async HTTP client with an optional author filter
//! - Body parsing for both plain JSON and the JSONP callback form
//! - Display helpers for author names and capture dates
//!
//! ## Separation of Concerns
//!
//! This crate only talks to the feed. It does **not**:
//! - Load or measure images (handled by the gallery)
//! - Keep history or decide which response is current (handled by the gallery)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use flickr_feed::{FeedConfig, FlickrFeedService};
//!
//! let service = FlickrFeedService::new(FeedConfig::default())?;
//! if let Some(page) = service.fetch_feed(Some("12345678@N00")).await? {
//!     for item in &page.items {
//!         println!("{} by {}", item.title, item.author_name());
//!     }
//! }
//! ```

pub mod models;
pub mod service;

pub use models::{FeedItem, FeedMedia, FeedPage};
pub use service::{parse_feed_body, FeedConfig, FeedError, FlickrFeedService, FEED_URL};
