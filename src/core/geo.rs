use crate::core::bounds::ProjectedExtent;
use crate::core::constants::{EARTH_RADIUS, MAX_LATITUDE, MAX_TILE_ZOOM};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a `(lon, lat)` pair, the order park configs use
    pub fn from_lon_lat((lng, lat): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the Web Mercator range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + self.lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Geographic bounding box in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The four corners, clockwise from north-west
    pub fn corners(&self) -> [LatLng; 4] {
        [
            LatLng::new(self.north, self.west),
            LatLng::new(self.north, self.east),
            LatLng::new(self.south, self.east),
            LatLng::new(self.south, self.west),
        ]
    }

    /// Checks if the box contains a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Projects all four corners to Web Mercator and returns their envelope.
    pub fn to_projected(&self) -> ProjectedExtent {
        ProjectedExtent::enclosing(self.corners().iter().map(LatLng::to_mercator))
    }
}

/// Direction of the tile Y axis used by a tile provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YScheme {
    /// Rows count from the top (slippy-map convention)
    #[default]
    Xyz,
    /// Rows count from the bottom
    Tms,
}

impl YScheme {
    /// Converts a row between this scheme and XYZ. The flip is its own
    /// inverse, so the same call works in both directions.
    pub fn flip_row(self, y: u32, zoom: u8) -> u32 {
        match self {
            Self::Xyz => y,
            Self::Tms => {
                let last = (1_u64 << zoom.min(MAX_TILE_ZOOM)) - 1;
                last.saturating_sub(u64::from(y)) as u32
            }
        }
    }

    /// Same as [`YScheme::flip_row`] for fractional rows.
    pub fn flip_row_f64(self, y: f64, zoom: u8) -> f64 {
        match self {
            Self::Xyz => y,
            Self::Tms => (2_f64.powi(i32::from(zoom)) - 1.0) - y,
        }
    }
}

/// A tile address in the XYZ convention (origin at the top-left of the world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoordinate {
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Builds an XYZ coordinate from a row expressed in `scheme`
    pub fn from_scheme(zoom: u8, x: u32, y: u32, scheme: YScheme) -> Self {
        Self::new(zoom, x, scheme.flip_row(y, zoom))
    }

    /// Row of this tile as a provider using `scheme` addresses it
    pub fn row_in(&self, scheme: YScheme) -> u32 {
        scheme.flip_row(self.y, self.zoom)
    }

    /// Tile containing `lat_lng` at `zoom`, latitude clamped to the Mercator limit
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Result<Self> {
        check_zoom(zoom)?;
        if !lat_lng.lat.is_finite() || !lat_lng.lng.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                lat_lng.lat, lat_lng.lng
            )));
        }
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let n = 2_f64.powi(i32::from(zoom));
        let max_index = n - 1.0;

        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index);

        Ok(Self::new(zoom, x as u32, y as u32))
    }

    /// North-west corner of the tile
    pub fn nw_corner(&self) -> Result<LatLng> {
        tile_to_lon_lat(f64::from(self.x), f64::from(self.y), self.zoom)
    }

    /// Geographic bounds of the tile
    pub fn geo_bounds(&self) -> Result<GeoBoundingBox> {
        let nw = self.nw_corner()?;
        let se = tile_to_lon_lat(
            f64::from(self.x) + 1.0,
            f64::from(self.y) + 1.0,
            self.zoom,
        )?;
        Ok(GeoBoundingBox::new(nw.lng, se.lat, se.lng, nw.lat))
    }

    /// Checks if the tile exists at its zoom level
    pub fn is_valid(&self) -> bool {
        if self.zoom > MAX_TILE_ZOOM {
            return false;
        }
        let max_coord = 1_u64 << self.zoom;
        u64::from(self.x) < max_coord && u64::from(self.y) < max_coord
    }
}

fn check_zoom(zoom: u8) -> Result<()> {
    if zoom > MAX_TILE_ZOOM {
        return Err(MapError::InvalidZoom(zoom));
    }
    Ok(())
}

/// Converts an XYZ tile position to the longitude/latitude of its north-west
/// corner. Fractional positions are allowed, which is how far tile edges are
/// addressed (`x + 1`, `y + 1`). TMS rows must be flipped by the caller.
pub fn tile_to_lon_lat(x: f64, y: f64, zoom: u8) -> Result<LatLng> {
    check_zoom(zoom)?;
    let n = 2_f64.powi(i32::from(zoom));
    let lng = x / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * y / n)).sinh().atan();
    Ok(LatLng::new(lat_rad.to_degrees(), lng))
}
