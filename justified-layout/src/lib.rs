//! # Justified Layout
//!
//! Lays out a flat sequence of images with mixed aspect ratios into rows of
//! near-uniform height that fill a container exactly.
//!
//! This crate provides:
//! - Width normalization at a target row height
//! - Greedy row partitioning towards an ideal row width
//! - Per-row height fitting with an upper bound
//! - A pure-data correction pass that removes floor-rounding error
//!
//! All arithmetic is integer pixel arithmetic; there is no sub-pixel layout.
//!
//! ## Example Usage
//!
//! ```rust
//! use justified_layout::{compute_layout, ImageSize, LayoutConfig};
//!
//! let images = [ImageSize::new(400, 300), ImageSize::new(300, 300), ImageSize::new(500, 200)];
//! let config = LayoutConfig::new(600, 200, 500);
//!
//! let layout = compute_layout(&images, &config);
//! for row in layout.rows() {
//!     assert_eq!(row.width(), 600);
//! }
//! ```

pub mod engine;
pub mod models;

pub use engine::{compute_layout, correct_row_widths, fit_row, normalized_width, plan_rows};
pub use models::{ImageSize, LayoutConfig, LayoutResult, LayoutRow, PlacedImage, RowEntry, RowPlan};
