//! Island extents: the projected box covered by a tile source that only
//! publishes a rectangular patch of tiles per zoom level.

use crate::core::bounds::ProjectedExtent;
use crate::core::constants::{EXTENT_PADDING_RATIO, MAX_TILE_ZOOM};
use crate::core::geo::{tile_to_lon_lat, YScheme};
use serde::{Deserialize, Serialize};

/// Inclusive tile index ranges at one zoom, in the source's own Y scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileIndexBounds {
    pub zoom: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

/// Index ranges without the zoom, as stored in a per-zoom table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRange {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    pub fn at_zoom(&self, zoom: u8) -> TileIndexBounds {
        TileIndexBounds {
            zoom,
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
        }
    }
}

impl TileIndexBounds {
    /// Row range converted to XYZ. A TMS range flips and swaps its ends.
    pub fn xyz_rows(&self, scheme: YScheme) -> (u32, u32) {
        match scheme {
            YScheme::Xyz => (self.min_y, self.max_y),
            YScheme::Tms => (
                scheme.flip_row(self.max_y, self.zoom),
                scheme.flip_row(self.min_y, self.zoom),
            ),
        }
    }

    pub fn tile_count(&self) -> u64 {
        let cols = u64::from(self.max_x.saturating_sub(self.min_x)) + 1;
        let rows = u64::from(self.max_y.saturating_sub(self.min_y)) + 1;
        cols * rows
    }
}

/// Tunables for [`compute_island_extent_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentOptions {
    /// Outward padding, as a fraction of each axis' span
    pub padding_ratio: f64,
}

impl Default for ExtentOptions {
    fn default() -> Self {
        Self {
            padding_ratio: EXTENT_PADDING_RATIO,
        }
    }
}

/// Projected extent of a tile island, padded by [`EXTENT_PADDING_RATIO`].
///
/// Only the highest zoom in `bounds` is used since it gives the tightest box.
/// Returns `None` when there is nothing usable, in which case the map view
/// should fall back to its default centre and zoom.
pub fn compute_island_extent(
    bounds: &[TileIndexBounds],
    scheme: YScheme,
) -> Option<ProjectedExtent> {
    compute_island_extent_with(bounds, scheme, ExtentOptions::default())
}

pub fn compute_island_extent_with(
    bounds: &[TileIndexBounds],
    scheme: YScheme,
    options: ExtentOptions,
) -> Option<ProjectedExtent> {
    let finest = bounds
        .iter()
        .filter(|b| b.zoom <= MAX_TILE_ZOOM)
        .max_by_key(|b| b.zoom);

    let Some(finest) = finest else {
        if bounds.is_empty() {
            log::debug!("no tile bounds supplied, extent unavailable");
        } else {
            log::warn!("all {} tile bounds exceed zoom {}", bounds.len(), MAX_TILE_ZOOM);
        }
        return None;
    };

    let (min_row, max_row) = finest.xyz_rows(scheme);
    let left = f64::from(finest.min_x);
    let right = f64::from(finest.max_x) + 1.0;
    let top = f64::from(min_row);
    let bottom = f64::from(max_row) + 1.0;

    let corners = [(left, top), (right, top), (left, bottom), (right, bottom)]
        .into_iter()
        .map(|(x, y)| tile_to_lon_lat(x, y, finest.zoom).map(|ll| ll.to_mercator()))
        .collect::<crate::Result<Vec<_>>>();

    let corners = match corners {
        Ok(corners) => corners,
        Err(e) => {
            log::warn!("island extent at zoom {} failed: {}", finest.zoom, e);
            return None;
        }
    };

    let extent = ProjectedExtent::enclosing(corners).padded(options.padding_ratio);
    log::debug!(
        "island extent from zoom {} ({:?}): {:?}",
        finest.zoom,
        scheme,
        extent.to_array()
    );
    Some(extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::EARTH_RADIUS;
    use std::f64::consts::PI;

    const HALF_WORLD: f64 = PI * EARTH_RADIUS;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    fn single(zoom: u8) -> TileIndexBounds {
        TileIndexBounds {
            zoom,
            min_x: 0,
            max_x: 0,
            min_y: 0,
            max_y: 0,
        }
    }

    #[test]
    fn test_nw_quadrant_padded() {
        let extent = compute_island_extent(&[single(1)], YScheme::Xyz).unwrap();
        let pad = HALF_WORLD * 0.02;
        assert!(close(extent.min_x, -HALF_WORLD - pad));
        assert!(close(extent.max_x, pad));
        assert!(close(extent.min_y, -pad));
        assert!(close(extent.max_y, HALF_WORLD + pad));
    }

    #[test]
    fn test_tms_mirrors_to_south() {
        let xyz = compute_island_extent(&[single(1)], YScheme::Xyz).unwrap();
        let tms = compute_island_extent(&[single(1)], YScheme::Tms).unwrap();
        assert!(close(tms.min_x, xyz.min_x));
        assert!(close(tms.max_x, xyz.max_x));
        assert!(close(tms.min_y, -xyz.max_y));
        assert!(close(tms.max_y, -xyz.min_y));
    }

    #[test]
    fn test_highest_zoom_wins() {
        let coarse = TileIndexBounds {
            zoom: 11,
            min_x: 555,
            max_x: 564,
            min_y: 851,
            max_y: 859,
        };
        let fine = TileIndexBounds {
            zoom: 13,
            min_x: 2228,
            max_x: 2251,
            min_y: 3412,
            max_y: 3431,
        };
        let both = compute_island_extent(&[fine, coarse], YScheme::Xyz).unwrap();
        let only_fine = compute_island_extent(&[fine], YScheme::Xyz).unwrap();
        assert_eq!(both, only_fine);
    }

    #[test]
    fn test_empty_bounds_yield_none() {
        assert!(compute_island_extent(&[], YScheme::Xyz).is_none());
        assert!(compute_island_extent(&[single(40)], YScheme::Xyz).is_none());
    }

    #[test]
    fn test_padding_can_be_disabled() {
        let extent =
            compute_island_extent_with(
                &[single(1)],
                YScheme::Xyz,
                ExtentOptions { padding_ratio: 0.0 },
            )
                .unwrap();
        assert!(close(extent.min_x, -HALF_WORLD));
        assert!(close(extent.max_x, 0.0));
    }

    #[test]
    fn test_tms_rows_swap_ends() {
        let bounds = TileIndexBounds {
            zoom: 12,
            min_x: 825,
            max_x: 827,
            min_y: 220,
            max_y: 222,
        };
        assert_eq!(bounds.xyz_rows(YScheme::Tms), (4095 - 222, 4095 - 220));
        assert_eq!(bounds.tile_count(), 9);
    }
}
