//! Sample-count quantization and overlay geometry.
//!
//! The number of samples requested per timeline is derived from the pixel
//! width available to draw them, then snapped to a fixed ladder so that a
//! resize only triggers a refetch when it crosses a ladder step.

pub const TIME_SERIES_HEIGHT: u32 = 30;
pub const LAYOUT_SPACING_SM: u32 = 8;
pub const TIMELINE_HEIGHT: u32 = TIME_SERIES_HEIGHT + LAYOUT_SPACING_SM;
pub const TIMELINE_DRAGGABLE_HANDLE_WIDTH: u32 = 10;

/// Approximate pixel footprint of one rendered sample (3 x 1.4).
const SAMPLE_FOOTPRINT_PX: f64 = 3.0 * 1.4;

pub const SAMPLE_COUNT_LADDER: [u32; 13] =
    [4, 5, 8, 10, 16, 20, 25, 40, 50, 80, 100, 200, 400];

/// Quantized sample count for a timeline of the given pixel width.
///
/// Returns 0 for non-positive widths, which suppresses any fetch. Otherwise
/// the result is the smallest ladder member greater than or equal to
/// `round(width / 4.2)`, clamped to the ladder's ends.
pub fn sample_count_for_width(width_px: f64) -> u32 {
    if width_px <= 0.0 {
        return 0;
    }

    let estimate = (width_px / SAMPLE_FOOTPRINT_PX).round();
    let min = SAMPLE_COUNT_LADDER[0];
    let max = SAMPLE_COUNT_LADDER[SAMPLE_COUNT_LADDER.len() - 1];

    if estimate <= min as f64 {
        return min;
    }
    if estimate >= max as f64 {
        return max;
    }

    let estimate = estimate as u32;
    SAMPLE_COUNT_LADDER
        .iter()
        .copied()
        .find(|&count| count >= estimate)
        .unwrap_or(max)
}

/// Width available for the series themselves once the draggable edge handles
/// are reserved on both sides.
pub fn content_width(measured_width_px: f64) -> f64 {
    measured_width_px - (TIMELINE_DRAGGABLE_HANDLE_WIDTH * 2) as f64
}

/// Width of the selection overlay, spanning the content plus both handles.
pub fn overlay_width(content_width_px: f64) -> f64 {
    content_width_px + (TIMELINE_DRAGGABLE_HANDLE_WIDTH * 2) as f64
}

/// Overlay height reserves one extra track slot for the header/axis row.
pub fn overlay_height(track_count: usize) -> u32 {
    TIMELINE_HEIGHT * (track_count as u32 + 1)
}
