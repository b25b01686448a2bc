//! Prelude module for common parkmap types and traits
//!
//! Re-exports the most commonly used items for `use parkmap::prelude::*;`

pub use crate::core::{
    bounds::ProjectedExtent,
    config::{InitialView, MapVersion, ParkCatalog, ParkConfig, ParkLocation, VersionCatalog},
    geo::{tile_to_lon_lat, GeoBoundingBox, LatLng, Point, TileCoordinate, YScheme},
    session::{CompareSession, ViewMode},
};

pub use crate::diff::{
    compose_highlight_tile, diff_tile, diff_tile_with_style, lab_distance, rgb_to_lab, DiffStyle,
    HighlightCache, HighlightKey, Lab, RasterImage, Sensitivity, SensitivityRange,
};

pub use crate::tiles::{
    compute_island_extent, ProxySource, TemplateSource, TileIndexBounds, TileRange, TileSource,
    TimeOfDay,
};

pub use crate::reports::{
    AdminToken, ChangeReport, MemoryReportStore, NewReport, ReportEdit, ReportService,
    ReportStatus, ReportStore,
};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
