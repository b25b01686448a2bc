pub mod extent;
pub mod source;

// Re-exports for convenience
pub use extent::{
    compute_island_extent, compute_island_extent_with, ExtentOptions, TileIndexBounds, TileRange,
};
pub use source::{ProxySource, TemplateSource, TileSource, TimeOfDay};
