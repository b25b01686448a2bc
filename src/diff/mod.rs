//! Perceptual tile diffing for the "highlight" compare mode.

pub mod cache;
pub mod color;
pub mod highlight;
pub mod sensitivity;

pub use cache::{HighlightCache, HighlightKey};
pub use color::{lab_distance, rgb_to_lab, Lab};
pub use highlight::{
    compose_highlight, compose_highlight_tile, count_highlighted, diff_tile, diff_tile_with_style,
    ComposedTile, DiffStyle, RasterImage,
};
pub use sensitivity::{slider_to_threshold, Sensitivity, SensitivityRange};
