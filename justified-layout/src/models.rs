use serde::{Deserialize, Serialize};

/// Natural pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// An image with a zero dimension cannot be scaled to a row height
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Parameters of a single layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width every row has to fill, in pixels
    pub container_width: u32,
    /// Height images are normalized to before rows are built
    pub target_row_height: u32,
    /// Upper bound for a fitted row height
    pub max_row_height: u32,
}

impl LayoutConfig {
    pub fn new(container_width: u32, target_row_height: u32, max_row_height: u32) -> Self {
        Self {
            container_width,
            target_row_height,
            max_row_height,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_width: 0,
            target_row_height: 200,
            max_row_height: 500,
        }
    }
}

/// An image assigned to a row, at its normalized width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEntry {
    /// Position of the image in the input sequence
    pub index: usize,
    /// Width at the target row height
    pub width: u32,
}

/// A row as produced by the partitioning step, before fitting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowPlan {
    pub total_width: u64,
    pub entries: Vec<RowEntry>,
}

impl RowPlan {
    pub fn push(&mut self, entry: RowEntry) {
        self.total_width += entry.width as u64;
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final render size of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Position of the image in the input sequence
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

/// A fitted and corrected row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub height: u32,
    pub images: Vec<PlacedImage>,
}

impl LayoutRow {
    /// Sum of the rendered widths in this row
    pub fn width(&self) -> u32 {
        self.images
            .iter()
            .fold(0u32, |width, image| width.saturating_add(image.width))
    }
}

/// Ordered rows of a layout pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutResult {
    rows: Vec<LayoutRow>,
}

impl LayoutResult {
    pub fn new(rows: Vec<LayoutRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<LayoutRow> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of images placed across all rows
    pub fn image_count(&self) -> usize {
        self.rows.iter().map(|row| row.images.len()).sum()
    }

    /// Input indices in placement order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.images.iter().map(|image| image.index))
    }
}
