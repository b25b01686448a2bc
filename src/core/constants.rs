//! Core constants for tile math, extents and highlight diffing.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Web Mercator sphere radius (EPSG:3857), in metres.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the Web Mercator square world ends.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Highest zoom accepted by the tile math. `2^zoom` stays exact and tile
/// indices still fit in a u32 up to here.
pub const MAX_TILE_ZOOM: u8 = 30;

/// Fraction of each axis' span added on both sides of an island extent so
/// panning does not stop dead at the last tile edge.
pub const EXTENT_PADDING_RATIO: f64 = 0.02;

/// Highlight colour for pixels whose ΔE exceeds the threshold.
pub const HIGHLIGHT_RGB: [u8; 3] = [255, 0, 0];

/// Alpha of highlighted pixels, kept below 255 so later compositing still
/// shows some of what lies beneath.
pub const HIGHLIGHT_ALPHA: u8 = 200;

/// Luma weights used to grey out unchanged pixels (R, G, B).
pub const LUMA_WEIGHTS: [f64; 3] = [0.3, 0.59, 0.11];

/// CIE D65 reference white used for XYZ → L*a*b*.
pub const D65_WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

/// Sensitivity slider bounds and resting position.
pub const SENSITIVITY_MIN: i32 = 0;
pub const SENSITIVITY_MAX: i32 = 100;
pub const DEFAULT_SENSITIVITY: i32 = 90;

/// Centre used when a park has neither a default view nor a usable extent (lon, lat).
pub const FALLBACK_CENTER: (f64, f64) = (-81.566575, 28.386606);

/// Park used when a requested park id is unknown.
pub const DEFAULT_PARK_ID: &str = "wdw";
