//! # parkmap
//!
//! Building blocks for a theme-park map viewer that compares historical
//! versions of official park maps.
//!
//! The crate covers tile addressing and the padded Web-Mercator extent a
//! park's tiles cover, a perceptual (CIE76) tile diff used by the highlight
//! compare mode, the park and map-version catalogs, the compare session that
//! drives the viewer, and moderation of user-submitted change reports.

pub mod core;
pub mod diff;
pub mod prelude;
pub mod reports;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::ProjectedExtent,
    config::{MapVersion, ParkCatalog, ParkConfig, VersionCatalog},
    geo::{tile_to_lon_lat, GeoBoundingBox, LatLng, Point, TileCoordinate, YScheme},
    session::{CompareSession, ViewMode},
};

pub use crate::diff::{diff_tile, rgb_to_lab, lab_distance, slider_to_threshold, Lab, RasterImage};

pub use crate::tiles::{compute_island_extent, TileIndexBounds, TileSource};

pub use crate::reports::{ChangeReport, ReportService, ReportStore};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid zoom level: {0}")]
    InvalidZoom(u8),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Tile dimensions differ: {before:?} vs {after:?}")]
    DimensionMismatch { before: (u32, u32), after: (u32, u32) },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error type alias for convenience
pub type Error = MapError;
