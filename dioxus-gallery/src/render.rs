//! Presentation model of a laid out gallery
//!
//! Pure data: the components only turn these values into markup.

use justified_layout::LayoutResult;

use crate::state::ImageRecord;

/// One image block of a row
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryTile {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub link: String,
    pub title: String,
    pub author_name: String,
    pub author_id: String,
    /// `DD-MM-YYYY`
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryRow {
    pub height: u32,
    pub tiles: Vec<GalleryTile>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedGallery {
    pub rows: Vec<GalleryRow>,
}

impl RenderedGallery {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn tile_count(&self) -> usize {
        self.rows.iter().map(|row| row.tiles.len()).sum()
    }
}

/// Combines a layout with the records it was computed from
pub fn build_gallery(layout: &LayoutResult, images: &[ImageRecord]) -> RenderedGallery {
    let rows = layout
        .rows()
        .iter()
        .map(|row| GalleryRow {
            height: row.height,
            tiles: row
                .images
                .iter()
                .filter_map(|placed| {
                    let record = images.get(placed.index)?;
                    Some(GalleryTile {
                        src: record.item.image_url().unwrap_or_default().to_string(),
                        width: placed.width,
                        height: placed.height,
                        link: record.item.link.clone(),
                        title: record.item.title.clone(),
                        author_name: record.item.author_name().to_string(),
                        author_id: record.item.author_id.clone(),
                        date: record.item.formatted_date(),
                    })
                })
                .collect(),
        })
        .filter(|row| !row.tiles.is_empty())
        .collect();

    RenderedGallery { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flickr_feed::{FeedItem, FeedMedia};
    use justified_layout::{compute_layout, ImageSize, LayoutConfig};

    fn record(width: u32, height: u32, title: &str) -> ImageRecord {
        ImageRecord::new(
            ImageSize::new(width, height),
            FeedItem {
                title: title.to_string(),
                link: format!("https://www.flickr.com/photos/x/{}/", title),
                media: FeedMedia {
                    m: format!("https://live.staticflickr.com/{}_m.jpg", title),
                },
                date_taken: "2018-07-09T12:00:00+02:00".to_string(),
                author: "nobody@flickr.com (\"ann\")".to_string(),
                author_id: "7@N02".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_build_gallery_maps_metadata() {
        let images = vec![record(400, 300, "a"), record(300, 300, "b"), record(500, 200, "c")];
        let sizes: Vec<ImageSize> = images.iter().map(|r| r.size).collect();
        let layout = compute_layout(&sizes, &LayoutConfig::new(600, 200, 500));

        let gallery = build_gallery(&layout, &images);

        assert_eq!(gallery.rows.len(), 2);
        assert_eq!(gallery.tile_count(), 3);

        let first = &gallery.rows[0].tiles[0];
        assert_eq!(first.title, "a");
        assert_eq!(first.src, "https://live.staticflickr.com/a_m.jpg");
        assert_eq!(first.author_name, "ann");
        assert_eq!(first.author_id, "7@N02");
        assert_eq!(first.date.as_deref(), Some("09-07-2018"));
        assert_eq!(first.height, gallery.rows[0].height);

        for row in &gallery.rows {
            assert_eq!(row.tiles.iter().map(|t| t.width).sum::<u32>(), 600);
        }
    }

    #[test]
    fn test_build_gallery_empty_layout() {
        let gallery = build_gallery(&LayoutResult::default(), &[]);
        assert!(gallery.is_empty());
    }
}
