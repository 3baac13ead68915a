//! # Utility Module
//!
//! Helpers for converting between map coordinates and the 0-100 percentage
//! space room templates use for exact asset positions.
//!
//! A percentage of 50 is the center of the room's bounding box, 0 and 100 are
//! its two edges along that axis.

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Maps a coordinate to its percentage position inside a span of `dimension`
/// centered on `center`, rounded and clamped to `0..=100`.
///
/// # Examples
///
/// ```
/// use radial_rooms::utils::util::percent_offset;
///
/// assert_eq!(percent_offset(100.0, 100.0, 200.0), 50);
/// assert_eq!(percent_offset(150.0, 100.0, 200.0), 75);
/// assert_eq!(percent_offset(999.0, 100.0, 200.0), 100);
/// ```
pub fn percent_offset(value: f64, center: f64, dimension: f64) -> i32 {
    if dimension <= 0.0 {
        return 50;
    }
    let ep = ((value - center) / dimension * 100.0 + 50.0).round();
    clamp(ep, 0.0, 100.0) as i32
}

/// Inverse of [`percent_offset`]: the coordinate a percentage points at.
pub fn offset_from_percent(percent: i32, center: f64, dimension: f64) -> f64 {
    center + (percent as f64 - 50.0) / 100.0 * dimension
}
