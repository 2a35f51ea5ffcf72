//! Row partitioning, fitting and correction
//!
//! A layout pass runs in four steps:
//! 1. every image is scaled to the target row height ([`normalized_width`])
//! 2. the scaled images are split into rows that approximate an ideal row
//!    width ([`plan_rows`])
//! 3. every row gets the height that makes it fill the container
//!    ([`fit_row`])
//! 4. floor-rounding error is spread over the row until its width matches the
//!    container exactly ([`correct_row_widths`])

use crate::models::{ImageSize, LayoutConfig, LayoutResult, LayoutRow, PlacedImage, RowEntry, RowPlan};

/// Width of an image scaled to `target_row_height`, rounded down
///
/// Returns 0 for images with a zero dimension.
pub fn normalized_width(size: ImageSize, target_row_height: u32) -> u32 {
    if size.is_degenerate() {
        return 0;
    }
    if size.height == target_row_height {
        return size.width;
    }

    let scaled = size.width as u64 * target_row_height as u64 / size.height as u64;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Splits normalized images into rows
///
/// The ideal row width is `total / ceil(total / container_width)`. An image
/// joins the current row while the running total plus half of its width stays
/// within the budget of that row. Empty rows still consume a budget slot but
/// are not returned.
pub fn plan_rows(entries: &[RowEntry], container_width: u32) -> Vec<RowPlan> {
    let total: u64 = entries.iter().map(|entry| entry.width as u64).sum();
    if total == 0 || container_width == 0 {
        return Vec::new();
    }

    // budget products exceed u64 for huge images in narrow containers
    let rows_count = total.div_ceil(container_width as u64) as u128;
    let total = total as u128;
    let mut rows = Vec::new();
    let mut running = 0u128;
    let mut row_index = 0u128;
    let mut next = 0usize;

    while let Some(first) = entries.get(next) {
        // first row whose budget admits the next image, the ones before stay empty
        let needed = ((2 * running + first.width as u128) * rows_count).div_ceil(2 * total);
        if needed > row_index + 1 {
            log::trace!("Dropping {} empty rows", needed - row_index - 1);
            row_index = needed - 1;
        }

        let mut row = RowPlan::default();
        while let Some(entry) = entries.get(next) {
            let width = entry.width as u128;
            // running + width / 2 <= total / rows_count * (row_index + 1), kept in integers
            if (2 * running + width) * rows_count > 2 * total * (row_index + 1) {
                break;
            }
            running += width;
            row.push(*entry);
            next += 1;
        }

        row_index += 1;
        rows.push(row);
    }

    rows
}

/// Scales a planned row to fill `config.container_width`
///
/// The row height is bounded to `[1, max_row_height]`; widths are corrected
/// afterwards so the row still sums to the container width exactly.
pub fn fit_row(plan: &RowPlan, config: &LayoutConfig) -> LayoutRow {
    let target = config.target_row_height.max(1) as u64;
    let max_height = config.max_row_height.max(1) as u64;
    let total = plan.total_width.max(1);

    let height = (target * config.container_width as u64 / total).clamp(1, max_height);

    let mut widths: Vec<u32> = plan
        .entries
        .iter()
        .map(|entry| u32::try_from(entry.width as u64 * height / target).unwrap_or(u32::MAX))
        .collect();
    correct_row_widths(&mut widths, config.container_width);

    let height = height as u32;
    LayoutRow {
        height,
        images: plan
            .entries
            .iter()
            .zip(widths)
            .map(|(entry, width)| PlacedImage {
                index: entry.index,
                width,
                height,
            })
            .collect(),
    }
}

/// Nudges `widths` one pixel at a time until they sum to `row_width`
///
/// Pixels are handed out round-robin starting at the first image. When the
/// row is too wide, images that already reached zero are skipped.
pub fn correct_row_widths(widths: &mut [u32], row_width: u32) {
    if widths.is_empty() {
        return;
    }

    let target = row_width as u64;
    let current: u64 = widths.iter().map(|&width| width as u64).sum();
    let count = widths.len() as u64;

    if current < target {
        let missing = target - current;
        let share = missing / count;
        let extra = missing % count;
        for (i, width) in widths.iter_mut().enumerate() {
            let bonus = share + u64::from((i as u64) < extra);
            *width = u32::try_from(*width as u64 + bonus).unwrap_or(u32::MAX);
        }
        return;
    }

    // whole round-robin passes at once, then one partial pass
    let mut excess = current - target;
    while excess > 0 {
        let nonzero = widths.iter().filter(|&&width| width > 0).count() as u64;
        let smallest = widths.iter().copied().filter(|&width| width > 0).min().unwrap_or(0) as u64;
        let step = smallest.min(excess / nonzero.max(1));

        if step == 0 {
            for width in widths.iter_mut().filter(|width| **width > 0).take(excess as usize) {
                *width -= 1;
            }
            return;
        }

        for width in widths.iter_mut().filter(|width| **width > 0) {
            *width -= step as u32;
        }
        excess -= step * nonzero;
    }
}

/// Computes the justified layout for `images`
///
/// Images that cannot be displayed (a zero dimension, or too narrow to keep
/// a pixel of width at the target height) are left out; every other image
/// appears exactly once, in input order.
pub fn compute_layout(images: &[ImageSize], config: &LayoutConfig) -> LayoutResult {
    let target = config.target_row_height.max(1);
    let config = LayoutConfig {
        target_row_height: target,
        ..*config
    };

    let entries: Vec<RowEntry> = images
        .iter()
        .enumerate()
        .filter_map(|(index, size)| {
            let width = normalized_width(*size, target);
            (width > 0).then_some(RowEntry { index, width })
        })
        .collect();

    if entries.len() < images.len() {
        log::debug!(
            "Skipping {} images without a displayable size",
            images.len() - entries.len()
        );
    }

    let rows: Vec<LayoutRow> = plan_rows(&entries, config.container_width)
        .iter()
        .map(|plan| fit_row(plan, &config))
        .collect();

    log::debug!(
        "Laid out {} images in {} rows at {}px",
        entries.len(),
        rows.len(),
        config.container_width
    );

    LayoutResult::new(rows)
}
